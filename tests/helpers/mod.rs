//! Shared roster builders and move helpers for engine tests

use cipherduel::{Address, Card, MoveAction, MoveCommand, PlayerRoster, Session};

pub const PLAYER_ONE: &str = "0x1234567890123456789012345678901234567890";
pub const PLAYER_TWO: &str = "0x0987654321098765432109876543210987654321";

pub fn player_one_roster() -> PlayerRoster {
    PlayerRoster::new(
        Address::new(PLAYER_ONE),
        vec![
            Card::new("card-1", 100, 80, 120, 50),
            Card::new("card-2", 90, 90, 110, 60),
            Card::new("card-3", 110, 70, 130, 40),
            Card::new("card-4", 80, 100, 100, 70),
            Card::new("card-5", 120, 60, 140, 30),
        ],
    )
}

pub fn player_two_roster() -> PlayerRoster {
    PlayerRoster::new(
        Address::new(PLAYER_TWO),
        vec![
            Card::new("card-6", 95, 85, 115, 55),
            Card::new("card-7", 85, 95, 105, 65),
            Card::new("card-8", 105, 75, 125, 45),
            Card::new("card-9", 75, 105, 95, 75),
            Card::new("card-10", 115, 65, 135, 35),
        ],
    )
}

/// Rosters whose defense dominates every attack, so no card ever falls and
/// long move sequences stay legal.
pub fn granite_rosters() -> (PlayerRoster, PlayerRoster) {
    let cards = |offset: usize| {
        (1..=5)
            .map(|i| Card::new(format!("card-{}", i + offset), 50, 200, 150, 30))
            .collect()
    };
    (
        PlayerRoster::new(Address::new(PLAYER_ONE), cards(0)),
        PlayerRoster::new(Address::new(PLAYER_TWO), cards(5)),
    )
}

/// Player-one roster that fells any card of [`player_two_roster`] in one hit.
pub fn demolisher_roster() -> PlayerRoster {
    PlayerRoster::new(
        Address::new(PLAYER_ONE),
        (1..=5)
            .map(|i| Card::new(format!("card-{}", i), 500, 200, 400, 50))
            .collect(),
    )
}

pub fn attack_command(session: &Session, player: &str, card_id: &str, target_id: &str) -> MoveCommand {
    MoveCommand {
        session_id: session.id,
        player: Address::new(player),
        card_id: card_id.to_string(),
        target_id: target_id.to_string(),
        action: MoveAction::Attack,
    }
}
