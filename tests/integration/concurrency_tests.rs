//! Concurrency tests: parallel sessions, racing moves, consistent reads

use std::sync::Arc;

use cipherduel::{EngineError, GameSessionManager, SessionId};

use crate::helpers::{
    attack_command, granite_rosters, player_one_roster, player_two_roster, PLAYER_ONE, PLAYER_TWO,
};

#[tokio::test]
async fn test_ten_sessions_accept_concurrent_moves() {
    let manager = Arc::new(GameSessionManager::new());
    let num_sessions = 10;

    let mut sessions = Vec::new();
    for _ in 0..num_sessions {
        let session = manager
            .create_session(&player_one_roster(), &player_two_roster())
            .await
            .unwrap();
        sessions.push(session);
    }
    assert_eq!(manager.session_count().await, num_sessions);

    let mut handles = vec![];
    for session in &sessions {
        let manager_clone = Arc::clone(&manager);
        let command = attack_command(session, PLAYER_ONE, "card-1", "card-6");

        handles.push(tokio::spawn(async move {
            manager_clone.play_card(command).await
        }));
    }

    let mut session_ids: Vec<SessionId> = Vec::new();
    for (handle, session) in handles.into_iter().zip(&sessions) {
        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.turn_count, 1);
        session_ids.push(session.id);
    }

    // Sessions do not interfere: each one advanced exactly once.
    for session_id in session_ids {
        let state = manager.get_game_state(session_id).await.unwrap();
        assert_eq!(state.turn_count, 1);
        assert_eq!(manager.get_game_history(session_id).await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_racing_moves_on_one_session_are_ordered() {
    let manager = Arc::new(GameSessionManager::new());
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();

    // Both tasks submit player one's opening move; the per-session writer
    // lock orders them, so exactly one wins and the loser sees a turn error.
    let mut handles = vec![];
    for _ in 0..2 {
        let manager_clone = Arc::clone(&manager);
        let command = attack_command(&session, PLAYER_ONE, "card-1", "card-6");
        handles.push(tokio::spawn(async move {
            manager_clone.play_card(command).await
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(outcome) => {
                assert!(outcome.success);
                accepted += 1;
            }
            Err(EngineError::NotYourTurn { .. }) => rejected += 1,
            Err(other) => panic!("unexpected race outcome: {}", other),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(rejected, 1);

    let state = manager.get_game_state(session.id).await.unwrap();
    assert_eq!(state.turn_count, 1);
    assert_eq!(manager.get_game_history(session.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reads_see_consistent_snapshots_during_play() {
    let manager = Arc::new(GameSessionManager::new());
    let (roster1, roster2) = granite_rosters();
    let session = manager.create_session(&roster1, &roster2).await.unwrap();
    let session_id = session.id;

    let writer = {
        let manager = Arc::clone(&manager);
        let session = session.clone();
        tokio::spawn(async move {
            for i in 0..40u32 {
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
                manager.play_card(command).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    let mut readers = vec![];
    for _ in 0..4 {
        let manager = Arc::clone(&manager);
        readers.push(tokio::spawn(async move {
            for _ in 0..40 {
                let state = manager.get_game_state(session_id).await.unwrap();
                let history = manager.get_game_history(session_id).await.unwrap();

                // A snapshot is never torn: the turn counter and the history
                // length can only disagree across two separate reads.
                assert_eq!(state.turn_count as usize, state.history().len());
                assert!(history.len() <= 40);
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    let state = manager.get_game_state(session_id).await.unwrap();
    assert_eq!(state.turn_count, 40);
    assert_eq!(state.history().len(), 40);
}

#[tokio::test]
async fn test_parallel_reputation_reads() {
    let manager = Arc::new(GameSessionManager::new());
    let session = manager
        .create_session(&player_one_roster(), &player_two_roster())
        .await
        .unwrap();
    manager
        .end_game(session.id, &session.player1)
        .await
        .unwrap();

    let mut handles = vec![];
    for _ in 0..8 {
        let manager = Arc::clone(&manager);
        let winner = session.player1.clone();
        handles.push(tokio::spawn(async move {
            let rep = manager.get_player_reputation(&winner).await;
            assert!(rep.is_encrypted());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}
