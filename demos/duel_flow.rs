//! Complete duel demonstration
//!
//! This binary drives a full session from roster authoring to the final
//! encrypted scores: create, trade a few blows, end the game, and read the
//! reputation totals back as opaque handles.

use cipherduel::{
    Address, Card, GameSessionManager, MoveAction, MoveCommand, PlayerRoster,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    cipherduel::error::logging::init_from_env()?;

    let manager = GameSessionManager::new();

    let alice = PlayerRoster::new(
        Address::new("0x1234567890123456789012345678901234567890"),
        vec![
            Card::new("card-1", 100, 80, 120, 50),
            Card::new("card-2", 90, 90, 110, 60),
            Card::new("card-3", 110, 70, 130, 40),
            Card::new("card-4", 80, 100, 100, 70),
            Card::new("card-5", 120, 60, 140, 30),
        ],
    );
    let bob = PlayerRoster::new(
        Address::new("0x0987654321098765432109876543210987654321"),
        vec![
            Card::new("card-6", 95, 85, 115, 55),
            Card::new("card-7", 85, 95, 105, 65),
            Card::new("card-8", 105, 75, 125, 45),
            Card::new("card-9", 75, 105, 95, 75),
            Card::new("card-10", 115, 65, 135, 35),
        ],
    );

    let session = manager.create_session(&alice, &bob).await?;
    println!("session {} created, {} to move", session.id, session.current_player);

    let moves = [
        (alice.address.clone(), "card-1", "card-6"),
        (bob.address.clone(), "card-6", "card-1"),
        (alice.address.clone(), "card-3", "card-7"),
        (bob.address.clone(), "card-7", "card-3"),
    ];
    for (player, card_id, target_id) in moves {
        let outcome = manager
            .play_card(MoveCommand {
                session_id: session.id,
                player: player.clone(),
                card_id: card_id.to_string(),
                target_id: target_id.to_string(),
                action: MoveAction::Attack,
            })
            .await?;
        println!(
            "turn {}: {} hit {} with {} for {} (next up: {})",
            outcome.turn_count, player, target_id, card_id, outcome.damage_dealt, outcome.current_player
        );
    }

    manager.end_game(session.id, &alice.address).await?;
    let scores = manager.get_final_scores(session.id).await?;
    println!(
        "final scores stay opaque: {} vs {}",
        scores.player1_score, scores.player2_score
    );

    let history = manager.get_game_history(session.id).await?;
    println!("{} moves on record", history.len());

    let reputation = manager.get_player_reputation(&alice.address).await;
    println!("winner reputation handle: {}", reputation);

    manager.cleanup().await;
    Ok(())
}
