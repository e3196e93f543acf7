use base64::Engine;
use base64::engine::general_purpose::{STANDARD as B64, STANDARD_NO_PAD as B64_NO_PAD};
use quill_types::admin::{AdminCommand, EncryptedBlob};

use crate::keys::AdminPublicKey;
use crate::{EnvelopeError, Result};

/// How far the command timestamp may drift from server time, either way.
pub const FRESHNESS_WINDOW_MS: u64 = 4 * 60 * 1000;

/// Minimum run of 0xFF padding bytes in a PKCS#1 v1.5 block.
const MIN_PADDING: usize = 8;

/// Raw bytes of an `encrypted` field.
pub fn blob_bytes(blob: &EncryptedBlob) -> Result<Vec<u8>> {
    match blob {
        EncryptedBlob::Text(text) => {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            B64.decode(&compact)
                .or_else(|_| B64_NO_PAD.decode(&compact))
                .map_err(EnvelopeError::from)
        }
        EncryptedBlob::Bytes(bytes) | EncryptedBlob::Buffer { data: bytes } => Ok(bytes.clone()),
    }
}

/// Undo a private-key encryption: run the public operation and strip the
/// `00 01 FF..FF 00` block-type-1 padding.
pub fn decrypt(key: &AdminPublicKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let block = key.public_op(ciphertext)?;

    if block.len() < MIN_PADDING + 3 || block[0] != 0x00 || block[1] != 0x01 {
        return Err(EnvelopeError::Padding);
    }

    let body = &block[2..];
    let separator = body
        .iter()
        .position(|&b| b != 0xff)
        .ok_or(EnvelopeError::Padding)?;

    if separator < MIN_PADDING || body[separator] != 0x00 {
        return Err(EnvelopeError::Padding);
    }

    Ok(body[separator + 1..].to_vec())
}

/// Reject commands whose timestamp is missing or more than
/// [`FRESHNESS_WINDOW_MS`] away from `now_ms`. Nothing stops a captured
/// envelope from being replayed inside the window.
pub fn check_freshness(timestamp: Option<i64>, now_ms: i64) -> Result<()> {
    match timestamp {
        Some(ts) if now_ms.abs_diff(ts) <= FRESHNESS_WINDOW_MS => Ok(()),
        _ => Err(EnvelopeError::Expired),
    }
}

/// Decrypt and parse an admin command, then enforce the freshness window.
pub fn open(key: &AdminPublicKey, blob: &EncryptedBlob, now_ms: i64) -> Result<AdminCommand> {
    let ciphertext = blob_bytes(blob)?;
    let plaintext = decrypt(key, &ciphertext)?;
    let command: AdminCommand = serde_json::from_slice(&plaintext)?;

    check_freshness(command.timestamp, now_ms)?;
    Ok(command)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_PEM: &str = include_str!("../tests/fixtures/admin_key.pub.pem");
    // Produced by `openssl pkeyutl -sign -pkeyopt rsa_padding_mode:pkcs1`
    const VECTOR_B64: &str = include_str!("../tests/fixtures/vector.b64");

    fn key() -> AdminPublicKey {
        AdminPublicKey::from_pem(PUBLIC_PEM).unwrap()
    }

    #[test]
    fn decrypts_openssl_private_encryption() {
        let blob = EncryptedBlob::Text(VECTOR_B64.to_string());
        let plaintext = decrypt(&key(), &blob_bytes(&blob).unwrap()).unwrap();
        assert_eq!(
            plaintext,
            br#"{"timestamp":0,"operation":"removecomment","commentID":9}"#
        );
    }

    #[test]
    fn open_enforces_window_around_command_time() {
        let blob = EncryptedBlob::Text(VECTOR_B64.to_string());

        let cmd = open(&key(), &blob, 1_000).unwrap();
        assert_eq!(cmd.operation, "removecomment");
        assert_eq!(cmd.comment_id.and_then(|id| id.get()), Some(9));

        assert!(matches!(
            open(&key(), &blob, 240_001),
            Err(EnvelopeError::Expired)
        ));
    }

    #[test]
    fn byte_array_blobs_are_accepted() {
        let bytes = B64.decode(VECTOR_B64.trim()).unwrap();
        let blob = EncryptedBlob::Bytes(bytes.clone());
        assert!(open(&key(), &blob, 0).is_ok());

        let buffer = EncryptedBlob::Buffer { data: bytes };
        assert!(open(&key(), &buffer, 0).is_ok());
    }

    #[test]
    fn tampered_ciphertext_fails_padding() {
        let mut bytes = B64.decode(VECTOR_B64.trim()).unwrap();
        bytes[100] ^= 0x01;
        assert!(matches!(
            decrypt(&key(), &bytes),
            Err(EnvelopeError::Padding) | Err(EnvelopeError::Size)
        ));
    }

    #[test]
    fn non_base64_text_is_an_encoding_error() {
        let blob = EncryptedBlob::Text("***".into());
        assert!(matches!(open(&key(), &blob, 0), Err(EnvelopeError::Encoding(_))));
    }

    #[test]
    fn freshness_window_is_inclusive_both_ways() {
        let now = 1_700_000_000_000;
        assert!(check_freshness(Some(now), now).is_ok());
        assert!(check_freshness(Some(now - 240_000), now).is_ok());
        assert!(check_freshness(Some(now + 240_000), now).is_ok());
        assert!(check_freshness(Some(now - 240_001), now).is_err());
        assert!(check_freshness(Some(now + 240_001), now).is_err());
        assert!(check_freshness(None, now).is_err());
    }
}
