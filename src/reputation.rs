//! Per-address reputation ledger
//!
//! Reputation totals are accumulated under encryption and only ever leave
//! the ledger as opaque handles. Delta magnitudes are engine policy and come
//! from [`ReputationConfig`], not from constants.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::config::ReputationConfig;
use crate::crypto::{EncryptedValue, EncryptionCodec};
use crate::error::GameResult;
use crate::session::Address;

/// Accumulator of encrypted reputation points per address.
#[derive(Debug)]
pub struct ReputationLedger {
    codec: Arc<EncryptionCodec>,
    config: ReputationConfig,
    totals: RwLock<HashMap<Address, EncryptedValue<i64>>>,
}

impl ReputationLedger {
    pub fn new(codec: Arc<EncryptionCodec>, config: ReputationConfig) -> Self {
        Self {
            codec,
            config,
            totals: RwLock::new(HashMap::new()),
        }
    }

    /// Read an address's reputation as an opaque handle.
    ///
    /// Addresses that never played read as an encrypted zero, so callers
    /// cannot distinguish "new player" from "zero total" without decrypting.
    pub async fn get(&self, address: &Address) -> EncryptedValue<i64> {
        match self.totals.read().await.get(address) {
            Some(total) => total.clone(),
            None => self.codec.encrypt_i64(0),
        }
    }

    /// Apply a decided game outcome: the winner's delta is at least the
    /// loser's delta (validated at configuration time).
    pub async fn apply_game_result(&self, winner: &Address, loser: &Address) -> GameResult<()> {
        self.credit(winner, self.config.win_delta).await?;
        self.credit(loser, self.config.loss_delta).await
    }

    /// Penalize a disconnecting player; strictly decreases their total
    /// relative to the no-penalty baseline.
    pub async fn apply_disconnect_penalty(&self, player: &Address) -> GameResult<()> {
        self.credit(player, -self.config.disconnect_penalty).await
    }

    async fn credit(&self, address: &Address, delta: i64) -> GameResult<()> {
        let mut totals = self.totals.write().await;
        let current = totals
            .entry(address.clone())
            .or_insert_with(|| self.codec.encrypt_i64(0));
        let update = self.codec.encrypt_i64(delta);
        *current = self.codec.add(&*current, &update)?;
        debug!(address = %address, delta, "reputation updated");
        Ok(())
    }
}
