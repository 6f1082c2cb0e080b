//! Encryption codec: the only component that can open encrypted handles
//!
//! The codec wraps plaintext scalars into [`EncryptedValue`] handles and
//! performs arithmetic on them without ever materializing plaintext in the
//! caller's view. Masking is a keyed SHA-256 keystream with a per-handle
//! nonce, and every handle carries a truncated SHA-256 integrity tag over
//! (key, kind, nonce, ciphertext). This is deliberately an opaque-wrapper
//! capability, not a cryptosystem: the engine is written against the handle
//! contract so a real FHE or threshold backend can replace it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{utils, EngineError, GameResult};
use crate::market::{EncryptedTradeOffer, TradeOffer};

use super::value::{CipherScalar, EncryptedValue};

/// Length of the hex-encoded integrity tag carried by each handle.
const TAG_HEX_LEN: usize = 32;

/// Plaintext card statistics, present only at authoring time.
///
/// Fields are signed so out-of-range input is expressible and rejected at
/// encryption rather than silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStats {
    pub attack: i64,
    pub defense: i64,
    pub health: i64,
    pub mana: i64,
    pub rarity: i64,
}

/// Card statistics with every field encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedCardStats {
    pub attack: EncryptedValue<u32>,
    pub defense: EncryptedValue<u32>,
    pub health: EncryptedValue<u32>,
    pub mana: EncryptedValue<u32>,
    pub rarity: EncryptedValue<u32>,
}

/// Plaintext move payload from card-creation or replay tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMoveData {
    pub card_id: String,
    pub target_id: String,
    pub action: String,
    pub value: i64,
}

/// Move payload with the magnitude encrypted.
///
/// Identifiers are not secret, only magnitudes are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedGameMove {
    pub card_id: String,
    pub target_id: String,
    pub action: String,
    pub value: EncryptedValue<u32>,
}

/// Issues, opens and computes over encrypted handles.
#[derive(Clone)]
pub struct EncryptionCodec {
    key: [u8; 32],
}

impl std::fmt::Debug for EncryptionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The key never reaches logs or debug output.
        f.debug_struct("EncryptionCodec").finish_non_exhaustive()
    }
}

impl EncryptionCodec {
    /// Create a codec with a fresh random key.
    pub fn new() -> Self {
        let mut seed = Vec::with_capacity(32);
        seed.extend_from_slice(Uuid::new_v4().as_bytes());
        seed.extend_from_slice(Uuid::new_v4().as_bytes());
        Self {
            key: utils::sha256(&seed),
        }
    }

    /// Create a codec with an explicit key, for deterministic tests and for
    /// rebuilding a codec over persisted handles.
    pub fn with_key(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Encrypt a non-negative integer attribute (card stats, damage, scores).
    ///
    /// Fails with [`EngineError::InvalidPlaintext`] on negative input or a
    /// value above `u32::MAX`.
    pub fn encrypt_u32(&self, plaintext: i64) -> GameResult<EncryptedValue<u32>> {
        let value = u32::try_from(plaintext).map_err(|_| {
            EngineError::invalid_plaintext(format!(
                "attribute value {} is outside the unsigned 32-bit range",
                plaintext
            ))
        })?;
        Ok(self.seal(value))
    }

    /// Encrypt a signed total (reputation). Negative values are legal here.
    pub fn encrypt_i64(&self, plaintext: i64) -> EncryptedValue<i64> {
        self.seal(plaintext)
    }

    /// Encrypt a trade price.
    ///
    /// Fails with [`EngineError::InvalidPlaintext`] on non-finite or
    /// negative input.
    pub fn encrypt_price(&self, price: f64) -> GameResult<EncryptedValue<f64>> {
        if !price.is_finite() {
            return Err(EngineError::invalid_field("price", "price must be finite"));
        }
        if price < 0.0 {
            return Err(EngineError::invalid_field("price", "price must not be negative"));
        }
        Ok(self.seal(price))
    }

    /// Open a handle on explicit, authorized request.
    ///
    /// Fails with [`EngineError::CorruptedCiphertext`] when the handle's
    /// well-formedness predicate is false, its integrity tag does not verify
    /// under this codec's key, or the unmasked bits are out of range.
    pub fn decrypt<T: CipherScalar>(&self, value: &EncryptedValue<T>) -> GameResult<T> {
        self.open(value)
    }

    /// Encrypt a full stat block atomically: every field is validated before
    /// any field is encrypted, so there is no partial output.
    pub fn encrypt_card_stats(&self, stats: &CardStats) -> GameResult<EncryptedCardStats> {
        for (field, value) in [
            ("attack", stats.attack),
            ("defense", stats.defense),
            ("health", stats.health),
            ("mana", stats.mana),
            ("rarity", stats.rarity),
        ] {
            if u32::try_from(value).is_err() {
                return Err(EngineError::invalid_field(
                    field,
                    format!("value {} is outside the unsigned 32-bit range", value),
                ));
            }
        }

        Ok(EncryptedCardStats {
            attack: self.seal(stats.attack as u32),
            defense: self.seal(stats.defense as u32),
            health: self.seal(stats.health as u32),
            mana: self.seal(stats.mana as u32),
            rarity: self.seal(stats.rarity as u32),
        })
    }

    /// Batch decrypt, the exact inverse of [`Self::encrypt_card_stats`].
    pub fn decrypt_card_stats(&self, encrypted: &EncryptedCardStats) -> GameResult<CardStats> {
        Ok(CardStats {
            attack: i64::from(self.open(&encrypted.attack)?),
            defense: i64::from(self.open(&encrypted.defense)?),
            health: i64::from(self.open(&encrypted.health)?),
            mana: i64::from(self.open(&encrypted.mana)?),
            rarity: i64::from(self.open(&encrypted.rarity)?),
        })
    }

    /// Encrypt only the magnitude of a move; identifiers stay plaintext.
    pub fn encrypt_game_move(&self, game_move: &GameMoveData) -> GameResult<EncryptedGameMove> {
        Ok(EncryptedGameMove {
            card_id: game_move.card_id.clone(),
            target_id: game_move.target_id.clone(),
            action: game_move.action.clone(),
            value: self.encrypt_u32(game_move.value)?,
        })
    }

    /// Encrypt only the price of a trade offer; identities stay plaintext.
    pub fn encrypt_trade_data(&self, trade: &TradeOffer) -> GameResult<EncryptedTradeOffer> {
        Ok(EncryptedTradeOffer {
            card_id: trade.card_id.clone(),
            seller: trade.seller.clone(),
            buyer: trade.buyer.clone(),
            price: self.encrypt_price(trade.price)?,
        })
    }

    /// Homomorphic-style addition; neither operand is revealed to the caller.
    pub fn add<T: CipherScalar>(
        &self,
        a: &EncryptedValue<T>,
        b: &EncryptedValue<T>,
    ) -> GameResult<EncryptedValue<T>> {
        let sum = self.open(a)?.add(self.open(b)?);
        Ok(self.seal(sum))
    }

    /// Subtraction clamped at zero, mirroring non-negative health and damage
    /// semantics.
    pub fn subtract_clamped(
        &self,
        a: &EncryptedValue<u32>,
        b: &EncryptedValue<u32>,
    ) -> GameResult<EncryptedValue<u32>> {
        let difference = self.open(a)?.saturating_sub(self.open(b)?);
        Ok(self.seal(difference))
    }

    /// True iff the handle verifies under this codec's key. Pure.
    pub fn validate_handle<T: CipherScalar>(&self, value: &EncryptedValue<T>) -> bool {
        self.open(value).is_ok()
    }

    /// True iff every field of the stat block carries a well-formed handle.
    /// One bad field makes the whole record invalid. Pure, no side effects.
    pub fn validate_encrypted_data(&self, stats: &EncryptedCardStats) -> bool {
        self.validate_handle(&stats.attack)
            && self.validate_handle(&stats.defense)
            && self.validate_handle(&stats.health)
            && self.validate_handle(&stats.mana)
            && self.validate_handle(&stats.rarity)
    }

    /// Zero test used by combat resolution; the plaintext never leaves the
    /// codec.
    pub(crate) fn is_zero(&self, value: &EncryptedValue<u32>) -> GameResult<bool> {
        Ok(self.open(value)? == 0)
    }

    fn seal<T: CipherScalar>(&self, value: T) -> EncryptedValue<T> {
        let nonce = Uuid::new_v4().as_u128() as u64;
        let ciphertext = value.to_bits() ^ self.keystream(T::KIND, nonce);
        let tag = self.tag(T::KIND, nonce, ciphertext);
        EncryptedValue::from_parts(nonce, ciphertext, tag)
    }

    fn open<T: CipherScalar>(&self, value: &EncryptedValue<T>) -> GameResult<T> {
        if !value.is_encrypted() {
            return Err(EngineError::corrupted("handle is not encrypted"));
        }

        let expected = self.tag(T::KIND, value.nonce(), value.ciphertext());
        if expected != value.tag() {
            return Err(EngineError::corrupted("integrity tag verification failed"));
        }

        let bits = value.ciphertext() ^ self.keystream(T::KIND, value.nonce());
        T::from_bits(bits)
            .ok_or_else(|| EngineError::corrupted("underlying plaintext is out of range"))
    }

    fn keystream(&self, kind: &str, nonce: u64) -> u64 {
        let digest = utils::sha256(&self.derivation_input(b"mask", kind, nonce, 0));
        let mut bits = [0u8; 8];
        bits.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bits)
    }

    fn tag(&self, kind: &str, nonce: u64, ciphertext: u64) -> String {
        let digest = utils::sha256(&self.derivation_input(b"tag", kind, nonce, ciphertext));
        utils::to_hex(&digest)[..TAG_HEX_LEN].to_string()
    }

    fn derivation_input(&self, label: &[u8], kind: &str, nonce: u64, ciphertext: u64) -> Vec<u8> {
        let mut input = Vec::with_capacity(32 + label.len() + kind.len() + 8 + 8);
        input.extend_from_slice(&self.key);
        input.extend_from_slice(label);
        input.extend_from_slice(kind.as_bytes());
        input.extend_from_slice(&nonce.to_le_bytes());
        input.extend_from_slice(&ciphertext.to_le_bytes());
        input
    }
}

impl Default for EncryptionCodec {
    fn default() -> Self {
        Self::new()
    }
}
