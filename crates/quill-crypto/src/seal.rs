use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use quill_types::admin::AdminCommand;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};

use crate::{EnvelopeError, Result};

/// Parse a PEM private key, PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`).
pub fn private_key_from_pem(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| EnvelopeError::Key(e.to_string()))
}

/// Private-key encryption with block type 1 padding. An unprefixed PKCS#1
/// v1.5 signature over the raw plaintext is exactly that block.
pub fn seal(key: &RsaPrivateKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    Ok(key.sign(Pkcs1v15Sign::new_unprefixed(), plaintext)?)
}

/// Seal a command and encode it the way `POST /admin` expects.
pub fn seal_command(key: &RsaPrivateKey, command: &AdminCommand) -> Result<String> {
    let plaintext = serde_json::to_vec(command)?;
    Ok(B64.encode(seal(key, &plaintext)?))
}
