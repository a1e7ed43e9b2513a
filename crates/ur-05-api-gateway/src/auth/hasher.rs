//! Credential hashing.
//!
//! Stored format: `v1$<iterations>$<salt hex>$<hash hex>`. The hash is
//! PBKDF2-HMAC-SHA256 with a random 16-byte salt and a 32-byte output.

use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

const SCHEME: &str = "v1";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Hashing failed before producing an encoded credential.
#[derive(Debug, Error)]
#[error("credential hashing failed")]
pub struct HashError;

/// Port for one-way credential hashing.
pub trait CredentialHasher: Send + Sync {
    /// Encodes `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Whether `password` matches `encoded`. Malformed input never matches.
    fn verify(&self, password: &str, encoded: &str) -> bool;
}

/// Salted PBKDF2-HMAC-SHA256 hasher.
#[derive(Debug, Clone, Copy)]
pub struct HmacHasher {
    iterations: u32,
}

impl HmacHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
        let mut out = [0u8; HASH_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
        out
    }
}

impl CredentialHasher for HmacHasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt: [u8; SALT_LEN] = rand::random();
        let derived = Self::derive(password.as_bytes(), &salt, self.iterations);
        Ok(format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            hex::encode(salt),
            hex::encode(derived)
        ))
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        let mut parts = encoded.split('$');
        let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };

        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt), hex::decode(expected)) else {
            return false;
        };
        if iterations == 0 || expected.len() != HASH_LEN {
            return false;
        }

        let derived = Self::derive(password.as_bytes(), &salt, iterations);
        derived[..].ct_eq(&expected[..]).into()
    }
}
