//! Vote message construction and signing
//!
//! A vote is the plain concatenation
//! `funding_reference || proposal_hash || direction_code || timestamp`,
//! signed with the masternode key using the network's signed-message
//! envelope. The node re-derives the same string to verify the vote, so
//! field order and encoding must not change.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::{CryptoError, Result};

/// Prefix mixed into every signed message so a vote signature can never
/// double as a transaction signature.
pub const MESSAGE_MAGIC: &str = "DarkCoin Signed Message:\n";

/// Signing primitive used for votes.
///
/// Implementations must be deterministic: identical inputs produce an
/// identical signature.
pub trait MessageSigner {
    /// Sign `message` with the textual private key, returning the encoded signature
    fn sign_message(&self, message: &[u8], private_key: &str) -> Result<String>;

    /// Check that `private_key` is in a form this signer can use
    fn check_key(&self, private_key: &str) -> Result<()>;
}

/// Build the exact string a masternode signs for one vote
pub fn vote_message(
    funding_reference: &str,
    proposal_hash: &str,
    direction_code: u8,
    timestamp: i64,
) -> String {
    format!(
        "{}{}{}{}",
        funding_reference, proposal_hash, direction_code, timestamp
    )
}

/// Construct and sign the vote message for one (masternode, proposal) pair
pub fn sign_vote<S: MessageSigner + ?Sized>(
    signer: &S,
    funding_reference: &str,
    proposal_hash: &str,
    direction_code: u8,
    timestamp: i64,
    private_key: &str,
) -> Result<String> {
    let message = vote_message(funding_reference, proposal_hash, direction_code, timestamp);
    signer.sign_message(message.as_bytes(), private_key)
}

/// Ed25519 signer over the double-SHA256 message envelope.
///
/// Private keys are 32-byte seeds in hex; signatures are base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519MessageSigner;

impl Ed25519MessageSigner {
    pub fn new() -> Self {
        Self
    }

    /// Hex public key matching a hex private key
    pub fn public_key_hex(private_key: &str) -> Result<String> {
        let signing_key = parse_private_key(private_key)?;
        Ok(hex::encode(signing_key.verifying_key().as_bytes()))
    }

    /// Verify a base64 signature produced by [`MessageSigner::sign_message`]
    pub fn verify(public_key_hex: &str, message: &[u8], signature_b64: &str) -> Result<()> {
        let pub_key_bytes =
            hex::decode(public_key_hex).map_err(|_| CryptoError::InvalidPublicKey)?;

        let pub_key_array: [u8; 32] = pub_key_bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey)?;

        let verifying_key =
            VerifyingKey::from_bytes(&pub_key_array).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig_bytes = STANDARD
            .decode(signature_b64)
            .map_err(|_| CryptoError::InvalidSignature)?;

        let sig_array: [u8; 64] = sig_bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;

        let signature = Signature::from_bytes(&sig_array);

        verifying_key
            .verify(&message_digest(message), &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

impl MessageSigner for Ed25519MessageSigner {
    fn sign_message(&self, message: &[u8], private_key: &str) -> Result<String> {
        let signing_key = parse_private_key(private_key)?;
        let signature = signing_key.sign(&message_digest(message));
        Ok(STANDARD.encode(signature.to_bytes()))
    }

    fn check_key(&self, private_key: &str) -> Result<()> {
        parse_private_key(private_key).map(|_| ())
    }
}

fn parse_private_key(private_key: &str) -> Result<SigningKey> {
    let bytes = hex::decode(private_key.trim()).map_err(|_| CryptoError::InvalidPrivateKey)?;

    let key_bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidPrivateKey)?;

    Ok(SigningKey::from_bytes(&key_bytes))
}

/// Double SHA256 of the length-prefixed magic and message
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    let mut envelope = Vec::with_capacity(MESSAGE_MAGIC.len() + message.len() + 10);
    write_compact_size(&mut envelope, MESSAGE_MAGIC.len() as u64);
    envelope.extend_from_slice(MESSAGE_MAGIC.as_bytes());
    write_compact_size(&mut envelope, message.len() as u64);
    envelope.extend_from_slice(message);

    let first = Sha256::digest(&envelope);
    Sha256::digest(first).into()
}

fn write_compact_size(buf: &mut Vec<u8>, len: u64) {
    match len {
        0..=0xfc => buf.push(len as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(len as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(len as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&len.to_le_bytes());
        }
    }
}
