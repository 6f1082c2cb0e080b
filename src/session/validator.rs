//! Pure move-legality rules
//!
//! Validation never touches session state; it only decides whether a
//! proposed move is legal and, if so, where the involved cards sit in the
//! two hands.

use crate::error::{EngineError, GameResult};

use super::state::{MoveCommand, Session};

/// Hand positions resolved by validation, consumed by combat resolution.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValidatedMove {
    pub attacker_index: usize,
    pub defender_index: usize,
}

/// Decide the legality of a proposed move against the current session state.
///
/// Rejection order: completed sessions first, then turn ownership, then card
/// lookup. A mover who is not a participant at all is indistinguishable from
/// a mover out of turn.
pub(crate) fn validate_move(session: &Session, command: &MoveCommand) -> GameResult<ValidatedMove> {
    if session.status.is_finished() {
        return Err(EngineError::SessionCompleted {
            session_id: session.id.to_string(),
        });
    }

    if !session.status.can_accept_moves() || command.player != session.current_player {
        return Err(EngineError::NotYourTurn {
            player: command.player.to_string(),
        });
    }

    let attacker_index = session
        .hand_of(&command.player)
        .iter()
        .position(|card| card.id == command.card_id)
        .ok_or_else(|| EngineError::UnknownCard {
            card_id: command.card_id.clone(),
        })?;

    // current_player is always a participant, so the opponent exists.
    let opponent = session
        .opponent_of(&command.player)
        .ok_or_else(|| EngineError::NotYourTurn {
            player: command.player.to_string(),
        })?;

    let defender_index = session
        .hand_of(opponent)
        .iter()
        .position(|card| card.id == command.target_id)
        .ok_or_else(|| EngineError::UnknownCard {
            card_id: command.target_id.clone(),
        })?;

    Ok(ValidatedMove {
        attacker_index,
        defender_index,
    })
}
