//! Game session orchestration
//!
//! [`GameSessionManager`] is the façade the presentation layer calls. It
//! owns the codec, the session store and the reputation ledger, and wires
//! move validation and combat resolution together. Mutating operations take
//! a session's writer lock, so concurrent moves against one session are
//! totally ordered; the loser of a race observes a turn or completion error,
//! never torn state.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::crypto::{EncryptedValue, EncryptionCodec};
use crate::error::{EngineError, GameResult};
use crate::reputation::ReputationLedger;

use super::cards::{Card, EncryptedCard, PlayerRoster};
use super::combat;
use super::state::{Address, CompletionReason, HistoryEntry, MoveCommand, Session, SessionId};
use super::store::SessionStore;
use super::validator;

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub success: bool,
    pub turn_count: u32,
    pub current_player: Address,
    /// Damage stays encrypted; only the codec can reveal the magnitude.
    pub damage_dealt: EncryptedValue<u32>,
}

/// Encrypted per-player scores of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScores {
    pub player1_score: EncryptedValue<u32>,
    pub player2_score: EncryptedValue<u32>,
}

/// Façade over session lifecycle, combat and reputation.
#[derive(Debug)]
pub struct GameSessionManager {
    config: EngineConfig,
    codec: Arc<EncryptionCodec>,
    store: SessionStore,
    reputation: ReputationLedger,
}

impl GameSessionManager {
    /// Create a manager with default configuration and a fresh codec key.
    pub fn new() -> Self {
        // The default configuration always validates.
        Self::build(EngineConfig::default())
    }

    /// Create a manager with explicit configuration.
    pub fn with_config(config: EngineConfig) -> GameResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let codec = Arc::new(EncryptionCodec::new());
        let reputation = ReputationLedger::new(Arc::clone(&codec), config.reputation.clone());
        Self {
            config,
            codec,
            store: SessionStore::new(),
            reputation,
        }
    }

    /// The codec issuing this engine's handles, for authorized reveal paths
    /// and card-creation tooling.
    pub fn codec(&self) -> &EncryptionCodec {
        &self.codec
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.store.len().await
    }

    /// Create a session from two authored rosters.
    ///
    /// Both hands are encrypted before the session becomes visible, so a
    /// failed roster leaves no trace in the store.
    pub async fn create_session(
        &self,
        player1: &PlayerRoster,
        player2: &PlayerRoster,
    ) -> GameResult<Session> {
        self.validate_players(player1, player2)?;

        let live = self.store.len().await;
        if live >= self.config.game.max_concurrent_sessions {
            warn!(
                live,
                limit = self.config.game.max_concurrent_sessions,
                "live session count exceeds configured bound"
            );
        }

        let mut session = Session::new(player1.address.clone(), player2.address.clone());
        let player1_hand = self.encrypt_hand(&player1.cards)?;
        let player2_hand = self.encrypt_hand(&player2.cards)?;
        session.activate(player1_hand, player2_hand)?;

        info!(
            session_id = %session.id,
            player1 = %session.player1,
            player2 = %session.player2,
            "session created"
        );

        let snapshot = session.clone();
        self.store.insert(session).await;
        Ok(snapshot)
    }

    /// Validate and resolve one move.
    ///
    /// On success the move is appended to history, the turn counter is
    /// incremented and the turn passes to the opponent. A rejected move
    /// leaves the session untouched.
    pub async fn play_card(&self, command: MoveCommand) -> GameResult<PlayOutcome> {
        let handle = self.store.get(command.session_id).await?;
        let mut session = handle.write().await;

        let validated = validator::validate_move(&session, &command)?;

        let opponent = session
            .opponent_of(&command.player)
            .cloned()
            .ok_or_else(|| EngineError::NotYourTurn {
                player: command.player.to_string(),
            })?;
        let attacker = session.hand_of(&command.player)[validated.attacker_index].clone();

        let outcome = {
            let defender_hand = session.hand_of_mut(&opponent);
            let outcome = combat::resolve_attack(
                &self.codec,
                &attacker,
                &mut defender_hand[validated.defender_index],
            )?;
            if !outcome.defender_card_remaining {
                let fallen = defender_hand.remove(validated.defender_index);
                debug!(session_id = %command.session_id, card_id = %fallen.id, "card defeated");
            }
            outcome
        };
        let defender_hand_empty = session.hand_of(&opponent).is_empty();
        let turn_index = session.turn_count;

        session.push_history(HistoryEntry {
            session_id: command.session_id,
            player: command.player.clone(),
            card_id: command.card_id.clone(),
            target_id: command.target_id.clone(),
            action: command.action,
            turn_index,
            damage_dealt: outcome.damage_dealt.clone(),
            recorded_at: Utc::now().timestamp(),
        });
        session.advance_turn();

        if defender_hand_empty {
            session.complete(CompletionReason::Defeat, Some(command.player.clone()))?;
            info!(session_id = %session.id, winner = %command.player, "session completed by defeat");
            self.reputation
                .apply_game_result(&command.player, &opponent)
                .await?;
        } else if session.turn_count >= self.config.game.max_turns {
            session.complete(CompletionReason::MaxTurnsReached, None)?;
            info!(
                session_id = %session.id,
                turns = session.turn_count,
                "session completed at turn limit"
            );
        }

        debug!(
            session_id = %session.id,
            turn = session.turn_count,
            current_player = %session.current_player,
            "move accepted"
        );

        Ok(PlayOutcome {
            success: true,
            turn_count: session.turn_count,
            current_player: session.current_player.clone(),
            damage_dealt: outcome.damage_dealt,
        })
    }

    /// Read-only snapshot of a session.
    pub async fn get_game_state(&self, session_id: SessionId) -> GameResult<Session> {
        let handle = self.store.get(session_id).await?;
        let session = handle.read().await;
        Ok(session.clone())
    }

    /// Accepted moves in turn order.
    pub async fn get_game_history(&self, session_id: SessionId) -> GameResult<Vec<HistoryEntry>> {
        let handle = self.store.get(session_id).await?;
        let session = handle.read().await;
        Ok(session.history().to_vec())
    }

    /// Forced transition: the named player loses every card and the session
    /// completes with the opponent as winner.
    pub async fn simulate_player_defeat(
        &self,
        session_id: SessionId,
        player: &Address,
    ) -> GameResult<()> {
        let handle = self.store.get(session_id).await?;
        let mut session = handle.write().await;

        let winner = self.opponent_or_invalid(&session, player)?;
        session.complete(CompletionReason::Defeat, Some(winner.clone()))?;
        session.hand_of_mut(player).clear();

        info!(session_id = %session.id, loser = %player, winner = %winner, "defeat simulated");
        self.reputation.apply_game_result(&winner, player).await
    }

    /// Forced transition: the session completes as if the turn limit had
    /// been reached. No winner is recorded (the default tie-break policy).
    pub async fn simulate_max_turns_reached(&self, session_id: SessionId) -> GameResult<()> {
        let handle = self.store.get(session_id).await?;
        let mut session = handle.write().await;

        session.complete(CompletionReason::MaxTurnsReached, None)?;
        session.turn_count = session.turn_count.max(self.config.game.max_turns);

        info!(session_id = %session.id, "turn limit simulated");
        Ok(())
    }

    /// Explicitly complete a session with the given winner and settle
    /// reputation for both players.
    pub async fn end_game(&self, session_id: SessionId, winner: &Address) -> GameResult<()> {
        let handle = self.store.get(session_id).await?;
        let mut session = handle.write().await;

        let loser = self.opponent_or_invalid(&session, winner)?;
        session.complete(CompletionReason::Defeat, Some(winner.clone()))?;

        info!(session_id = %session.id, winner = %winner, "session ended");
        self.reputation.apply_game_result(winner, &loser).await
    }

    /// Complete a session after a disconnection: the remaining player wins
    /// and the disconnecting player takes the configured penalty on top of
    /// the loss.
    pub async fn handle_player_disconnection(
        &self,
        session_id: SessionId,
        player: &Address,
    ) -> GameResult<()> {
        let handle = self.store.get(session_id).await?;
        let mut session = handle.write().await;

        let winner = self.opponent_or_invalid(&session, player)?;
        session.complete(CompletionReason::Disconnection, Some(winner.clone()))?;

        info!(
            session_id = %session.id,
            disconnected = %player,
            winner = %winner,
            "session completed by disconnection"
        );
        self.reputation.apply_game_result(&winner, player).await?;
        self.reputation.apply_disconnect_penalty(player).await
    }

    /// Encrypted per-player scores; only available once a session completed.
    pub async fn get_final_scores(&self, session_id: SessionId) -> GameResult<FinalScores> {
        let handle = self.store.get(session_id).await?;
        let session = handle.read().await;

        if !session.status.is_finished() {
            return Err(EngineError::GameNotCompleted {
                session_id: session_id.to_string(),
            });
        }

        Ok(FinalScores {
            player1_score: self.score_for(&session, &session.player1)?,
            player2_score: self.score_for(&session, &session.player2)?,
        })
    }

    /// A player's reputation as an opaque handle.
    pub async fn get_player_reputation(&self, address: &Address) -> EncryptedValue<i64> {
        self.reputation.get(address).await
    }

    /// Release every in-memory session. Idempotent; reputation survives so
    /// totals persist across engine restarts within a process.
    pub async fn cleanup(&self) {
        self.store.clear().await;
        info!("session manager cleaned up");
    }

    fn validate_players(&self, player1: &PlayerRoster, player2: &PlayerRoster) -> GameResult<()> {
        if player1.address.is_empty() || player2.address.is_empty() {
            return Err(EngineError::InvalidPlayers {
                message: "player address must not be empty".to_string(),
            });
        }

        if player1.address == player2.address {
            return Err(EngineError::InvalidPlayers {
                message: format!("players must be distinct, both are {}", player1.address),
            });
        }

        let expected = self.config.game.hand_size;
        for roster in [player1, player2] {
            if roster.cards.len() != expected {
                return Err(EngineError::InvalidPlayers {
                    message: format!(
                        "{} must bring exactly {} cards, got {}",
                        roster.address,
                        expected,
                        roster.cards.len()
                    ),
                });
            }
        }

        Ok(())
    }

    fn encrypt_hand(&self, cards: &[Card]) -> GameResult<Vec<EncryptedCard>> {
        cards
            .iter()
            .map(|card| EncryptedCard::encrypt(&self.codec, card))
            .collect()
    }

    fn opponent_or_invalid(&self, session: &Session, player: &Address) -> GameResult<Address> {
        session
            .opponent_of(player)
            .cloned()
            .ok_or_else(|| EngineError::InvalidPlayers {
                message: format!("{} is not part of session {}", player, session.id),
            })
    }

    fn score_for(&self, session: &Session, player: &Address) -> GameResult<EncryptedValue<u32>> {
        let remaining = session.hand_of(player).len() as i64;
        let mut score = remaining * i64::from(self.config.scoring.card_weight);
        if session.winner.as_ref() == Some(player) {
            score += i64::from(self.config.scoring.win_bonus);
        }
        self.codec.encrypt_u32(score)
    }
}

impl Default for GameSessionManager {
    fn default() -> Self {
        Self::new()
    }
}
