//! Quill Crypto Library
//!
//! Admin commands arrive RSA "encrypted" with the admin's private key
//! (PKCS#1 v1.5, block type 1). The server holds only the public key, so
//! opening an envelope proves who sealed it but hides nothing.

pub mod envelope;
pub mod keys;

#[cfg(feature = "client")]
pub mod seal;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid key: {0}")]
    Key(String),
    #[error("invalid encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("ciphertext does not fit the key")]
    Size,
    #[error("bad padding")]
    Padding,
    #[error("payload is not a command: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("timestamp outside the freshness window")]
    Expired,
    #[error("rsa: {0}")]
    Rsa(#[from] rsa::Error),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;
