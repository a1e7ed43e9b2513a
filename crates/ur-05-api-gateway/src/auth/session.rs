//! Session tokens.
//!
//! A token is `hex(claims_json) "." hex(hmac_sha256(key, claims_json))`.
//! Claims carry the subject id, its role and the expiry as a unix timestamp.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use shared_types::{ProfileId, Role, SessionSubject};
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Signed session claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: ProfileId,
    pub role: Role,
    /// Expiry, seconds since the unix epoch.
    pub exp: i64,
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed session token")]
    Malformed,
    #[error("session token signature mismatch")]
    BadSignature,
    #[error("session token expired")]
    Expired,
    #[error("invalid session key")]
    InvalidKey,
    #[error("failed to encode session claims: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Issues and verifies session tokens with one HMAC key.
pub struct SessionKeys {
    mac: HmacSha256,
    lifetime: chrono::Duration,
}

impl SessionKeys {
    pub fn new(key: &[u8], lifetime: Duration) -> Result<Self, SessionError> {
        let mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::InvalidKey)?;
        let lifetime = chrono::Duration::from_std(lifetime).map_err(|_| SessionError::InvalidKey)?;
        Ok(Self { mac, lifetime })
    }

    pub fn lifetime(&self) -> chrono::Duration {
        self.lifetime
    }

    /// Signs a token for `subject`, valid until `now + lifetime`.
    pub fn issue(
        &self,
        subject: &SessionSubject,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, SessionError> {
        let expires_at = now + self.lifetime;
        let claims = Claims {
            sub: subject.id,
            role: subject.role,
            exp: expires_at.timestamp(),
        };
        let payload = serde_json::to_vec(&claims)?;

        let mut mac = self.mac.clone();
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        Ok(IssuedSession {
            token: format!("{}.{}", hex::encode(&payload), hex::encode(signature)),
            expires_at,
        })
    }

    /// Checks signature and expiry and returns the claims.
    ///
    /// The signature is verified before the payload is parsed.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, SessionError> {
        let (payload_hex, signature_hex) = token.split_once('.').ok_or(SessionError::Malformed)?;
        let payload = hex::decode(payload_hex).map_err(|_| SessionError::Malformed)?;
        let signature = hex::decode(signature_hex).map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac.clone();
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| SessionError::Malformed)?;
        if now.timestamp() >= claims.exp {
            return Err(SessionError::Expired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}
