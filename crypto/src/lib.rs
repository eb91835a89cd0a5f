//! mnvote Cryptography
//!
//! Vote message signing and time-randomized vote timestamps

pub mod signer;
pub mod timestamp;

pub use signer::{sign_vote, vote_message, Ed25519MessageSigner, MessageSigner};
pub use timestamp::{
    random_past_timestamp, timestamp_offset, EntropySource, FixedEntropy, OsEntropy,
    TIMESTAMP_WINDOW_SECS,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
