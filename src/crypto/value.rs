//! Opaque encrypted value handles
//!
//! An [`EncryptedValue`] stands in for a plaintext scalar everywhere inside
//! the engine. The handle carries a masked ciphertext, a random nonce and an
//! integrity tag, never the plaintext itself; only the
//! [`EncryptionCodec`](crate::crypto::EncryptionCodec) that issued the handle
//! can open it again. The plaintext type is a compile-time parameter, so an
//! encrypted health value cannot be confused with an encrypted price.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// Plaintext scalar types an [`EncryptedValue`] can stand in for.
///
/// The trait is sealed: the codec only knows how to mask and range-check
/// these three kinds. `u32` covers card attributes, damage and scores,
/// `i64` covers signed reputation totals, `f64` covers trade prices.
pub trait CipherScalar: sealed::Sealed + Copy + PartialEq + fmt::Debug {
    /// Kind label bound into the keystream and integrity tag, so a handle
    /// cannot be reinterpreted as a different plaintext type.
    const KIND: &'static str;

    fn to_bits(self) -> u64;

    /// Recover a value from unmasked bits; `None` when the bits are out of
    /// range for the type (a corrupted or foreign ciphertext).
    fn from_bits(bits: u64) -> Option<Self>;

    /// Arithmetic used by the codec's homomorphic-style `add`.
    fn add(self, other: Self) -> Self;
}

impl CipherScalar for u32 {
    const KIND: &'static str = "u32";

    fn to_bits(self) -> u64 {
        u64::from(self)
    }

    fn from_bits(bits: u64) -> Option<Self> {
        u32::try_from(bits).ok()
    }

    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl CipherScalar for i64 {
    const KIND: &'static str = "i64";

    fn to_bits(self) -> u64 {
        self as u64
    }

    fn from_bits(bits: u64) -> Option<Self> {
        Some(bits as i64)
    }

    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl CipherScalar for f64 {
    const KIND: &'static str = "f64";

    fn to_bits(self) -> u64 {
        self.to_bits()
    }

    fn from_bits(bits: u64) -> Option<Self> {
        let value = f64::from_bits(bits);
        value.is_finite().then_some(value)
    }

    fn add(self, other: Self) -> Self {
        self + other
    }
}

/// Opaque handle over an encrypted scalar.
///
/// Handles are serializable so they can cross a future persistence or
/// transport boundary; a handle rebuilt from tampered data fails integrity
/// verification at decryption time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EncryptedValue<T: CipherScalar> {
    nonce: u64,
    ciphertext: u64,
    tag: String,
    encrypted: bool,
    #[serde(skip)]
    _plaintext: PhantomData<T>,
}

impl<T: CipherScalar> EncryptedValue<T> {
    pub(crate) fn from_parts(nonce: u64, ciphertext: u64, tag: String) -> Self {
        Self {
            nonce,
            ciphertext,
            tag,
            encrypted: true,
            _plaintext: PhantomData,
        }
    }

    /// Well-formedness predicate: does this handle claim to hold ciphertext?
    ///
    /// This is the cheap structural check; authoritative verification of the
    /// integrity tag happens inside the codec on decrypt/validate.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub(crate) fn nonce(&self) -> u64 {
        self.nonce
    }

    pub(crate) fn ciphertext(&self) -> u64 {
        self.ciphertext
    }

    pub(crate) fn tag(&self) -> &str {
        &self.tag
    }
}

impl<T: CipherScalar> fmt::Display for EncryptedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print ciphertext bits; the tag prefix is enough to correlate
        // handles in logs.
        let prefix: String = self.tag.chars().take(8).collect();
        write!(f, "enc:{}:{}", T::KIND, prefix)
    }
}
