//! Trade offers with encrypted prices
//!
//! Trade offers live outside any session lifecycle but share the engine's
//! encryption codec: the price is the only ciphertext, identities and card
//! ids stay plaintext.

use serde::{Deserialize, Serialize};

use crate::crypto::EncryptedValue;
use crate::error::{EngineError, GameResult};
use crate::session::Address;

/// A plaintext trade offer as authored by the seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub card_id: String,
    pub seller: Address,
    /// Unset until a buyer accepts the offer.
    pub buyer: Option<Address>,
    pub price: f64,
}

impl TradeOffer {
    /// Create an open offer with no buyer attached yet.
    pub fn new(card_id: impl Into<String>, seller: Address, price: f64) -> Self {
        Self {
            card_id: card_id.into(),
            seller,
            buyer: None,
            price,
        }
    }

    /// Record the accepting buyer.
    ///
    /// Fails when the offer was already accepted or when the seller tries to
    /// buy their own card.
    pub fn accept(&mut self, buyer: Address) -> GameResult<()> {
        if let Some(existing) = &self.buyer {
            return Err(EngineError::InvalidTrade {
                message: format!("offer already accepted by {}", existing),
            });
        }
        if buyer == self.seller {
            return Err(EngineError::InvalidTrade {
                message: "seller cannot accept their own offer".to_string(),
            });
        }
        self.buyer = Some(buyer);
        Ok(())
    }
}

/// Trade offer with the price encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedTradeOffer {
    pub card_id: String,
    pub seller: Address,
    pub buyer: Option<Address>,
    pub price: EncryptedValue<f64>,
}
