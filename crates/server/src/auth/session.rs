//! Stateless session credentials
//!
//! A session is an HS256 JWT binding a username to an expiry. Nothing is
//! persisted server-side: trust comes from the signature, the expiry, and a
//! per-request re-check that the bound account still exists (see
//! [`super::Principal`]). Expiry equals the account's `auto_lock_time_interval`
//! at issuance, so verification runs with zero leeway to keep short intervals
//! meaningful.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Size of a generated signing secret in bytes (256 bits)
const SESSION_SECRET_SIZE: usize = 32;

/// Claims carried by a session credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Bound username
    pub sub: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Errors that can occur while minting or verifying session credentials
#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    /// Deliberately uniform: malformed, forged, and expired tokens are
    /// indistinguishable to the client.
    #[error("invalid or expired session token")]
    Invalid,

    #[error("failed to sign session token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Server-held signing material for session credentials.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Generate a random signing secret.
    ///
    /// Sessions minted with a generated secret do not survive a restart;
    /// deployments that care should configure a stable secret.
    pub fn generate() -> Self {
        let mut secret = [0u8; SESSION_SECRET_SIZE];
        getrandom::getrandom(&mut secret).expect("failed to generate random bytes");
        Self::from_secret(&secret)
    }

    /// Mint a session credential for `username`, expiring `ttl_secs` from
    /// now.
    pub fn mint(&self, username: &str, ttl_secs: i64) -> Result<String, SessionTokenError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat,
            exp: iat + ttl_secs.max(0),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(SessionTokenError::Signing)
    }

    /// Verify signature and expiry, returning the bound username.
    pub fn verify(&self, token: &str) -> Result<String, SessionTokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Default leeway is 60s, which would defeat short auto-lock
        // intervals.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| SessionTokenError::Invalid)?;
        Ok(data.claims.sub)
    }
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose signing material, even in debug output.
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_verify_round_trip() {
        let keys = SessionKeys::from_secret(b"test-secret");
        let token = keys.mint("alice", 600).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let keys = SessionKeys::from_secret(b"test-secret");
        let other = SessionKeys::from_secret(b"other-secret");
        let token = keys.mint("alice", 600).unwrap();
        assert!(matches!(
            other.verify(&token),
            Err(SessionTokenError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let keys = SessionKeys::from_secret(b"test-secret");
        assert!(matches!(
            keys.verify("not-a-jwt"),
            Err(SessionTokenError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let keys = SessionKeys::from_secret(b"test-secret");

        // Craft a token whose expiry is already in the past.
        let iat = chrono::Utc::now().timestamp() - 120;
        let claims = Claims {
            sub: "alice".to_string(),
            iat,
            exp: iat + 1,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            keys.verify(&token),
            Err(SessionTokenError::Invalid)
        ));
    }

    #[test]
    fn test_registered_and_logged_in_tokens_share_shape() {
        let keys = SessionKeys::from_secret(b"test-secret");
        // Registration and login mint through the same path; both must
        // verify identically.
        let registered = keys.mint("alice", 600).unwrap();
        let logged_in = keys.mint("alice", 600).unwrap();
        assert_eq!(keys.verify(&registered).unwrap(), "alice");
        assert_eq!(keys.verify(&logged_in).unwrap(), "alice");
    }
}
