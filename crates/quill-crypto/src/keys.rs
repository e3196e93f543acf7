use std::path::Path;

use num_bigint::BigUint;
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;

use crate::{EnvelopeError, Result};

/// The admin's RSA public key, reduced to what the raw public operation needs.
#[derive(Debug, Clone)]
pub struct AdminPublicKey {
    n: BigUint,
    e: BigUint,
    size: usize,
}

impl AdminPublicKey {
    /// Parse a PEM public key, PKCS#1 (`RSA PUBLIC KEY`) or SPKI (`PUBLIC KEY`).
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = RsaPublicKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPublicKey::from_public_key_pem(pem))
            .map_err(|e| EnvelopeError::Key(e.to_string()))?;

        Ok(Self::from(&key))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let pem = std::fs::read_to_string(path)
            .map_err(|e| EnvelopeError::Key(format!("{}: {}", path.display(), e)))?;
        Self::from_pem(&pem)
    }

    /// Modulus length in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// `c^e mod n`, left-padded to the modulus length.
    pub(crate) fn public_op(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() > self.size {
            return Err(EnvelopeError::Size);
        }

        let c = BigUint::from_bytes_be(ciphertext);
        if c >= self.n {
            return Err(EnvelopeError::Size);
        }

        let m = c.modpow(&self.e, &self.n).to_bytes_be();
        let mut block = vec![0u8; self.size - m.len()];
        block.extend_from_slice(&m);
        Ok(block)
    }
}

impl From<&RsaPublicKey> for AdminPublicKey {
    fn from(key: &RsaPublicKey) -> Self {
        Self {
            n: BigUint::from_bytes_be(&key.n().to_bytes_be()),
            e: BigUint::from_bytes_be(&key.e().to_bytes_be()),
            size: key.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKCS1_PEM: &str = include_str!("../tests/fixtures/admin_key.pub.pem");
    const SPKI_PEM: &str = include_str!("../tests/fixtures/admin_key.spki.pem");

    #[test]
    fn loads_both_pem_flavours() {
        let pkcs1 = AdminPublicKey::from_pem(PKCS1_PEM).unwrap();
        let spki = AdminPublicKey::from_pem(SPKI_PEM).unwrap();
        assert_eq!(pkcs1.size(), 256);
        assert_eq!(pkcs1.n, spki.n);
        assert_eq!(pkcs1.e, BigUint::from(65537u32));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            AdminPublicKey::from_pem("not a key"),
            Err(EnvelopeError::Key(_))
        ));
    }

    #[test]
    fn oversized_ciphertext_is_rejected() {
        let key = AdminPublicKey::from_pem(PKCS1_PEM).unwrap();
        assert!(matches!(key.public_op(&[0xff; 257]), Err(EnvelopeError::Size)));
        assert!(matches!(key.public_op(&[0xff; 256]), Err(EnvelopeError::Size)));
        assert!(matches!(key.public_op(&[]), Err(EnvelopeError::Size)));
    }
}
