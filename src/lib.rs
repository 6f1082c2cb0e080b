//! cipherduel - An encrypted turn-based card-battle session engine
//!
//! cipherduel runs two-player card battles whose numeric attributes stay
//! opaque throughout gameplay:
//! - Card stats, damage, scores and reputation exist only as encrypted
//!   handles; plaintext is revealed solely through explicit codec decryption
//! - Strict turn alternation and move legality, enforced per session
//! - Append-only move history and encrypted final scores at game end
//! - Independent sessions run concurrently; moves within one session are
//!   totally ordered

pub mod config;
pub mod crypto;
pub mod error;
pub mod market;
pub mod reputation;
pub mod session;

// Re-export commonly used types for convenience
pub use error::{EngineError, GameResult};

// Re-export the encryption surface
pub use crypto::{
    CardStats, EncryptedCardStats, EncryptedGameMove, EncryptedValue, EncryptionCodec,
    GameMoveData,
};

// Re-export core session types
pub use session::{
    Address, Card, CompletionReason, EncryptedCard, FinalScores, GameSessionManager, HistoryEntry,
    MoveAction, MoveCommand, PlayOutcome, PlayerRoster, Session, SessionId, SessionStatus,
    SessionStore,
};

// Re-export configuration interfaces
pub use config::{EngineConfig, GameConfig, ReputationConfig, ScoringConfig};

// Re-export reputation and trade surfaces
pub use market::{EncryptedTradeOffer, TradeOffer};
pub use reputation::ReputationLedger;
