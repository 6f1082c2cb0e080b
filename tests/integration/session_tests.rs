//! Integration tests for full session lifecycles

use uuid::Uuid;

use cipherduel::{
    Address, CompletionReason, EngineConfig, EngineError, GameSessionManager, SessionStatus,
};

use crate::helpers::{
    attack_command, demolisher_roster, granite_rosters, player_one_roster, player_two_roster,
    PLAYER_ONE, PLAYER_TWO,
};

#[tokio::test]
async fn test_create_session() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    assert_eq!(session.player1, Address::new(PLAYER_ONE));
    assert_eq!(session.player2, Address::new(PLAYER_TWO));
    assert_eq!(session.turn_count, 0);
    assert_eq!(session.current_player, Address::new(PLAYER_ONE));
    assert!(session.status.can_accept_moves());
    assert_eq!(manager.session_count().await, 1);
}

#[tokio::test]
async fn test_session_hands_are_fully_encrypted() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    assert_eq!(session.player1_hand.len(), 5);
    assert_eq!(session.player2_hand.len(), 5);

    for card in session.player1_hand.iter().chain(session.player2_hand.iter()) {
        assert!(card.is_fully_encrypted());
    }

    // The engine's codec can still reveal the authored values on request.
    let first = &session.player1_hand[0];
    assert_eq!(manager.codec().decrypt(&first.attack).unwrap(), 100);
    assert_eq!(manager.codec().decrypt(&first.health).unwrap(), 120);
}

#[tokio::test]
async fn test_create_session_rejects_bad_rosters() {
    let manager = GameSessionManager::new();

    // Duplicate address
    let err = manager
        .create_session(&player_one_roster(), &player_one_roster())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPlayers { .. }));

    // Wrong hand size
    let mut short = player_two_roster();
    short.cards.pop();
    let err = manager
        .create_session(&player_one_roster(), &short)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPlayers { .. }));

    assert_eq!(manager.session_count().await, 0);
}

#[tokio::test]
async fn test_turn_alternation() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    let result1 = manager
        .play_card(attack_command(&session, PLAYER_ONE, "card-1", "card-6"))
        .await
        .unwrap();
    assert!(result1.success);
    assert_eq!(result1.turn_count, 1);
    assert_eq!(result1.current_player, Address::new(PLAYER_TWO));

    let result2 = manager
        .play_card(attack_command(&session, PLAYER_TWO, "card-6", "card-1"))
        .await
        .unwrap();
    assert!(result2.success);
    assert_eq!(result2.turn_count, 2);
    assert_eq!(result2.current_player, Address::new(PLAYER_ONE));
}

#[tokio::test]
async fn test_wrong_player_is_rejected_without_mutation() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    let err = manager
        .play_card(attack_command(&session, PLAYER_TWO, "card-6", "card-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotYourTurn { .. }));

    let state = manager.get_game_state(session.id).await.unwrap();
    assert_eq!(state.turn_count, 0);
    assert_eq!(state.current_player, Address::new(PLAYER_ONE));
    assert!(manager.get_game_history(session.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_damage_stays_encrypted() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    let result = manager
        .play_card(attack_command(&session, PLAYER_ONE, "card-1", "card-6"))
        .await
        .unwrap();

    assert!(result.damage_dealt.is_encrypted());
    // card-1 attack 100 against card-6 defense 85
    assert_eq!(manager.codec().decrypt(&result.damage_dealt).unwrap(), 15);
}

#[tokio::test]
async fn test_history_records_accepted_moves() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    manager
        .play_card(attack_command(&session, PLAYER_ONE, "card-1", "card-6"))
        .await
        .unwrap();

    let history = manager.get_game_history(session.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].player, Address::new(PLAYER_ONE));
    assert_eq!(history[0].card_id, "card-1");
    assert_eq!(history[0].target_id, "card-6");
    assert_eq!(history[0].turn_index, 0);
    assert!(history[0].damage_dealt.is_encrypted());
}

#[tokio::test]
async fn test_history_under_one_hundred_sequential_moves() {
    // Development config raises the turn limit above the move count.
    let manager = GameSessionManager::with_config(EngineConfig::development()).unwrap();
    let (roster1, roster2) = granite_rosters();
    let session = manager.create_session(&roster1, &roster2).await.unwrap();

    for i in 0..100u32 {
        let slot = (i as usize % 5) + 1;
        let command = if i % 2 == 0 {
            attack_command(
                &session,
                PLAYER_ONE,
                &format!("card-{}", slot),
                &format!("card-{}", slot + 5),
            )
        } else {
            attack_command(
                &session,
                PLAYER_TWO,
                &format!("card-{}", slot + 5),
                &format!("card-{}", slot),
            )
        };
        let outcome = manager.play_card(command).await.unwrap();
        assert_eq!(outcome.turn_count, i + 1);
    }

    let history = manager.get_game_history(session.id).await.unwrap();
    assert_eq!(history.len(), 100);
    for (i, entry) in history.iter().enumerate() {
        assert_eq!(entry.turn_index, i as u32);
    }
}

#[tokio::test]
async fn test_defeat_through_combat() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&demolisher_roster(), &player_two_roster())
        .await
        .unwrap();

    // Player one fells one card per turn; player two's counterattacks cannot
    // pierce the demolisher's defense.
    for fallen in 6..=10u32 {
        let target = format!("card-{}", fallen);
        manager
            .play_card(attack_command(&session, PLAYER_ONE, "card-1", &target))
            .await
            .unwrap();

        if fallen < 10 {
            let survivor = format!("card-{}", fallen + 1);
            manager
                .play_card(attack_command(&session, PLAYER_TWO, &survivor, "card-1"))
                .await
                .unwrap();
        }
    }

    let state = manager.get_game_state(session.id).await.unwrap();
    assert_eq!(state.status, SessionStatus::Completed);
    assert_eq!(state.winner, Some(Address::new(PLAYER_ONE)));
    assert_eq!(state.completion_reason, Some(CompletionReason::Defeat));
    assert!(state.player2_hand.is_empty());

    let err = manager
        .play_card(attack_command(&session, PLAYER_TWO, "card-6", "card-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SessionCompleted { .. }));
}

#[tokio::test]
async fn test_turn_limit_completes_session() {
    let mut config = EngineConfig::default();
    config.game.max_turns = 4;
    let manager = GameSessionManager::with_config(config).unwrap();
    let (roster1, roster2) = granite_rosters();
    let session = manager.create_session(&roster1, &roster2).await.unwrap();

    for i in 0..4u32 {
        let command = if i % 2 == 0 {
            attack_command(&session, PLAYER_ONE, "card-1", "card-6")
        } else {
            attack_command(&session, PLAYER_TWO, "card-6", "card-1")
        };
        manager.play_card(command).await.unwrap();
    }

    let state = manager.get_game_state(session.id).await.unwrap();
    assert_eq!(state.status, SessionStatus::Completed);
    assert_eq!(state.completion_reason, Some(CompletionReason::MaxTurnsReached));
    assert_eq!(state.winner, None);

    let err = manager
        .play_card(attack_command(&session, PLAYER_ONE, "card-1", "card-6"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SessionCompleted { .. }));
}

#[tokio::test]
async fn test_simulate_player_defeat() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    manager
        .simulate_player_defeat(session.id, &Address::new(PLAYER_ONE))
        .await
        .unwrap();

    let state = manager.get_game_state(session.id).await.unwrap();
    assert_eq!(state.status, SessionStatus::Completed);
    assert_eq!(state.winner, Some(Address::new(PLAYER_TWO)));
    assert_eq!(state.completion_reason, Some(CompletionReason::Defeat));
    assert!(state.player1_hand.is_empty());
}

#[tokio::test]
async fn test_simulate_max_turns_reached() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    manager.simulate_max_turns_reached(session.id).await.unwrap();

    let state = manager.get_game_state(session.id).await.unwrap();
    assert_eq!(state.status, SessionStatus::Completed);
    assert_eq!(state.completion_reason, Some(CompletionReason::MaxTurnsReached));
}

#[tokio::test]
async fn test_final_scores_only_after_completion() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    let err = manager.get_final_scores(session.id).await.unwrap_err();
    assert!(matches!(err, EngineError::GameNotCompleted { .. }));

    manager
        .end_game(session.id, &Address::new(PLAYER_ONE))
        .await
        .unwrap();

    let scores = manager.get_final_scores(session.id).await.unwrap();
    assert!(scores.player1_score.is_encrypted());
    assert!(scores.player2_score.is_encrypted());

    let codec = manager.codec();
    let winner_score = codec.decrypt(&scores.player1_score).unwrap();
    let loser_score = codec.decrypt(&scores.player2_score).unwrap();
    assert!(winner_score > loser_score);
}

#[tokio::test]
async fn test_reputation_updates_after_end_game() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    manager
        .end_game(session.id, &Address::new(PLAYER_ONE))
        .await
        .unwrap();

    let winner_rep = manager.get_player_reputation(&Address::new(PLAYER_ONE)).await;
    let loser_rep = manager.get_player_reputation(&Address::new(PLAYER_TWO)).await;
    assert!(winner_rep.is_encrypted());
    assert!(loser_rep.is_encrypted());

    let codec = manager.codec();
    let winner_total = codec.decrypt(&winner_rep).unwrap();
    let loser_total = codec.decrypt(&loser_rep).unwrap();
    assert!(winner_total >= loser_total);
}

#[tokio::test]
async fn test_disconnection_penalizes_below_plain_loss() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    manager
        .handle_player_disconnection(session.id, &Address::new(PLAYER_TWO))
        .await
        .unwrap();

    let state = manager.get_game_state(session.id).await.unwrap();
    assert_eq!(state.status, SessionStatus::Completed);
    assert_eq!(state.winner, Some(Address::new(PLAYER_ONE)));
    assert_eq!(state.completion_reason, Some(CompletionReason::Disconnection));

    let rep = manager.get_player_reputation(&Address::new(PLAYER_TWO)).await;
    assert!(rep.is_encrypted());

    // A plain loss would sit at loss_delta; the disconnect total must be
    // strictly below that baseline.
    let total = manager.codec().decrypt(&rep).unwrap();
    assert!(total < manager.config().reputation.loss_delta);
}

#[tokio::test]
async fn test_unknown_session_ids_fail() {
    let manager = GameSessionManager::new();
    let missing = Uuid::new_v4();
    let player = Address::new(PLAYER_ONE);

    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();
    let mut command = attack_command(&session, PLAYER_ONE, "card-1", "card-6");
    command.session_id = missing;

    assert!(matches!(
        manager.play_card(command).await.unwrap_err(),
        EngineError::SessionNotFound { .. }
    ));
    assert!(matches!(
        manager.get_game_state(missing).await.unwrap_err(),
        EngineError::SessionNotFound { .. }
    ));
    assert!(matches!(
        manager.get_game_history(missing).await.unwrap_err(),
        EngineError::SessionNotFound { .. }
    ));
    assert!(matches!(
        manager.end_game(missing, &player).await.unwrap_err(),
        EngineError::SessionNotFound { .. }
    ));
    assert!(matches!(
        manager.get_final_scores(missing).await.unwrap_err(),
        EngineError::SessionNotFound { .. }
    ));
    assert!(matches!(
        manager
            .handle_player_disconnection(missing, &player)
            .await
            .unwrap_err(),
        EngineError::SessionNotFound { .. }
    ));
}

#[tokio::test]
async fn test_cleanup_releases_sessions() {
    let manager = GameSessionManager::new();
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();
    assert_eq!(manager.session_count().await, 1);

    manager.cleanup().await;
    assert_eq!(manager.session_count().await, 0);
    assert!(matches!(
        manager.get_game_state(session.id).await.unwrap_err(),
        EngineError::SessionNotFound { .. }
    ));

    // Idempotent
    manager.cleanup().await;
    assert_eq!(manager.session_count().await, 0);
}
