//! Card types: plaintext authoring form and encrypted in-session form

use serde::{Deserialize, Serialize};

use crate::crypto::{EncryptedValue, EncryptionCodec};
use crate::error::GameResult;

use super::state::Address;

/// A card as authored by card-creation tooling, before any session sees it.
///
/// Attributes are signed so that out-of-range input is expressible; the
/// values are range-checked when the session encrypts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub attack: i64,
    pub defense: i64,
    pub health: i64,
    pub mana: i64,
}

impl Card {
    pub fn new(id: impl Into<String>, attack: i64, defense: i64, health: i64, mana: i64) -> Self {
        Self {
            id: id.into(),
            attack,
            defense,
            health,
            mana,
        }
    }
}

/// In-session card: the identifier stays plaintext, every numeric attribute
/// is an opaque handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedCard {
    pub id: String,
    pub attack: EncryptedValue<u32>,
    pub defense: EncryptedValue<u32>,
    pub health: EncryptedValue<u32>,
    pub mana: EncryptedValue<u32>,
}

impl EncryptedCard {
    /// Encrypt an authored card for use inside a session.
    pub(crate) fn encrypt(codec: &EncryptionCodec, card: &Card) -> GameResult<Self> {
        Ok(Self {
            id: card.id.clone(),
            attack: codec.encrypt_u32(card.attack)?,
            defense: codec.encrypt_u32(card.defense)?,
            health: codec.encrypt_u32(card.health)?,
            mana: codec.encrypt_u32(card.mana)?,
        })
    }

    /// True iff every attribute carries a well-formed handle.
    pub fn is_fully_encrypted(&self) -> bool {
        self.attack.is_encrypted()
            && self.defense.is_encrypted()
            && self.health.is_encrypted()
            && self.mana.is_encrypted()
    }
}

/// A player's authored roster for one session: identity plus the cards they
/// bring to the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRoster {
    pub address: Address,
    pub cards: Vec<Card>,
}

impl PlayerRoster {
    pub fn new(address: Address, cards: Vec<Card>) -> Self {
        Self { address, cards }
    }
}
