//! Session data model and lifecycle state machine

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::EncryptedValue;
use crate::error::{EngineError, GameResult};

use super::cards::EncryptedCard;

/// Unique session identifier.
pub type SessionId = Uuid;

/// Opaque player identity supplied by the external wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

/// Lifecycle states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Created, hands not yet installed.
    Waiting,
    /// Both hands encrypted and installed; moves are accepted.
    Active,
    /// Terminal. No further mutation is possible.
    Completed,
}

impl SessionStatus {
    /// Check if the session can accept new moves
    pub fn can_accept_moves(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }

    /// Check if the session has reached its terminal state
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionStatus::Completed)
    }

    /// Check if a state transition is valid
    pub fn can_transition_to(&self, new_status: &SessionStatus) -> bool {
        match (self, new_status) {
            // Allow staying in the same non-terminal state
            (SessionStatus::Waiting, SessionStatus::Waiting) => true,
            (SessionStatus::Active, SessionStatus::Active) => true,
            // Valid forward transitions
            (SessionStatus::Waiting, SessionStatus::Active) => true,
            (SessionStatus::Waiting, SessionStatus::Completed) => true,
            (SessionStatus::Active, SessionStatus::Completed) => true,
            // Terminal state cannot transition
            (SessionStatus::Completed, _) => false,
            _ => false,
        }
    }
}

/// Why a session completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    Defeat,
    MaxTurnsReached,
    Disconnection,
}

impl CompletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionReason::Defeat => "defeat",
            CompletionReason::MaxTurnsReached => "max_turns_reached",
            CompletionReason::Disconnection => "disconnection",
        }
    }
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action kinds a move can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAction {
    Attack,
}

/// A proposed move, as submitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub session_id: SessionId,
    pub player: Address,
    pub card_id: String,
    pub target_id: String,
    pub action: MoveAction,
}

/// Immutable record of one accepted move.
///
/// Entries are appended in turn order and never mutated or removed; the
/// damage magnitude stays encrypted in the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session_id: SessionId,
    pub player: Address,
    pub card_id: String,
    pub target_id: String,
    pub action: MoveAction,
    pub turn_index: u32,
    pub damage_dealt: EncryptedValue<u32>,
    pub recorded_at: i64,
}

/// One two-player card-battle instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub player1: Address,
    pub player2: Address,
    pub status: SessionStatus,
    pub turn_count: u32,
    pub current_player: Address,
    pub player1_hand: Vec<EncryptedCard>,
    pub player2_hand: Vec<EncryptedCard>,
    pub winner: Option<Address>,
    pub completion_reason: Option<CompletionReason>,
    pub created_at: i64,
    pub last_activity: i64,
    history: Vec<HistoryEntry>,
}

impl Session {
    /// Create a new session shell in `Waiting` state. The first mover is
    /// player1; hands are installed separately so encryption failures leave
    /// nothing behind.
    pub(crate) fn new(player1: Address, player2: Address) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4(),
            current_player: player1.clone(),
            player1,
            player2,
            status: SessionStatus::Waiting,
            turn_count: 0,
            player1_hand: Vec::new(),
            player2_hand: Vec::new(),
            winner: None,
            completion_reason: None,
            created_at: now,
            last_activity: now,
            history: Vec::new(),
        }
    }

    /// Install both encrypted hands and transition `Waiting -> Active`.
    pub(crate) fn activate(
        &mut self,
        player1_hand: Vec<EncryptedCard>,
        player2_hand: Vec<EncryptedCard>,
    ) -> GameResult<()> {
        if !self.status.can_transition_to(&SessionStatus::Active) {
            return Err(EngineError::SessionCompleted {
                session_id: self.id.to_string(),
            });
        }
        self.player1_hand = player1_hand;
        self.player2_hand = player2_hand;
        self.status = SessionStatus::Active;
        self.touch();
        Ok(())
    }

    /// Is the address one of the two players?
    pub fn is_participant(&self, player: &Address) -> bool {
        *player == self.player1 || *player == self.player2
    }

    /// The other player's address, if the given address participates at all.
    pub fn opponent_of(&self, player: &Address) -> Option<&Address> {
        if *player == self.player1 {
            Some(&self.player2)
        } else if *player == self.player2 {
            Some(&self.player1)
        } else {
            None
        }
    }

    /// A participant's current hand; unknown addresses see an empty hand.
    pub fn hand_of(&self, player: &Address) -> &[EncryptedCard] {
        if *player == self.player1 {
            &self.player1_hand
        } else if *player == self.player2 {
            &self.player2_hand
        } else {
            &[]
        }
    }

    pub(crate) fn hand_of_mut(&mut self, player: &Address) -> &mut Vec<EncryptedCard> {
        if *player == self.player1 {
            &mut self.player1_hand
        } else {
            &mut self.player2_hand
        }
    }

    /// Accepted moves, in turn order.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub(crate) fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Count one accepted move: bump the turn counter and hand the turn to
    /// the other player.
    pub(crate) fn advance_turn(&mut self) {
        self.turn_count += 1;
        self.current_player = if self.current_player == self.player1 {
            self.player2.clone()
        } else {
            self.player1.clone()
        };
        self.touch();
    }

    /// Transition to `Completed`, at most once.
    pub(crate) fn complete(
        &mut self,
        reason: CompletionReason,
        winner: Option<Address>,
    ) -> GameResult<()> {
        if !self.status.can_transition_to(&SessionStatus::Completed) {
            return Err(EngineError::SessionCompleted {
                session_id: self.id.to_string(),
            });
        }
        self.status = SessionStatus::Completed;
        self.completion_reason = Some(reason);
        self.winner = winner;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now().timestamp();
    }
}
