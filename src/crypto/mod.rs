//! Opaque encryption layer: handles, codec and batch stat operations

mod codec;
mod value;

pub use codec::{CardStats, EncryptedCardStats, EncryptedGameMove, EncryptionCodec, GameMoveData};
pub use value::{CipherScalar, EncryptedValue};
