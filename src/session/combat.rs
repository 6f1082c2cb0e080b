//! Encrypted combat resolution
//!
//! Damage and health never leave the codec as plaintext: the resolver
//! reports only the encrypted damage handle and whether the defending card
//! survived.

use crate::crypto::{EncryptedValue, EncryptionCodec};
use crate::error::GameResult;

use super::cards::EncryptedCard;

/// Outcome of one attack.
#[derive(Debug, Clone)]
pub(crate) struct CombatOutcome {
    pub damage_dealt: EncryptedValue<u32>,
    pub defender_card_remaining: bool,
}

/// Resolve an attack entirely under encryption.
///
/// `damage = max(attacker.attack - defender.defense, 0)` and the defender's
/// health drops by that amount, floored at zero. The defender's health is
/// only updated once every codec operation has succeeded, so a corrupted
/// handle leaves the card untouched.
pub(crate) fn resolve_attack(
    codec: &EncryptionCodec,
    attacker: &EncryptedCard,
    defender: &mut EncryptedCard,
) -> GameResult<CombatOutcome> {
    let damage = codec.subtract_clamped(&attacker.attack, &defender.defense)?;
    let health = codec.subtract_clamped(&defender.health, &damage)?;
    let defender_card_remaining = !codec.is_zero(&health)?;

    defender.health = health;

    Ok(CombatOutcome {
        damage_dealt: damage,
        defender_card_remaining,
    })
}
