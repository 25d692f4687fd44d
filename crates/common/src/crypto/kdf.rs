//! Two-stage key derivation for zero-knowledge authentication
//!
//! Clients derive everything locally and the server only ever sees the final
//! master token:
//!
//! 1. `vault_key = PBKDF2(master_password, salt = username, HIGH iterations)`
//!    stays on the client and (in a full deployment) encrypts the vault blob
//!    before it is uploaded.
//! 2. `master_token = PBKDF2(master_password, salt = vault_key, DEFAULT
//!    iterations)` is the only derived secret transmitted to the server.
//!
//! Splitting the derivation means the server-held token is cryptographically
//! independent of the key that protects the vault: a database compromise does
//! not yield anything that decrypts stored blobs. Callers must keep the two
//! stages separate and never collapse them into a single derivation.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

/// Iteration count for the first stage, which stretches a low-entropy
/// human password.
pub const VAULT_KEY_ITERATIONS: u32 = 1_000_000;
/// Iteration count for the second stage. Lower is acceptable here because the
/// salt (the vault key) is already high-entropy.
pub const MASTER_TOKEN_ITERATIONS: u32 = 100_000;
/// Size of derived keys in bytes (256 bits)
pub const DERIVED_KEY_SIZE: usize = 32;

/// Errors that can occur during key derivation
#[derive(Debug, thiserror::Error)]
pub enum KdfError {
    #[error("iteration count must be non-zero")]
    ZeroIterations,
    #[error("output length must be non-zero")]
    ZeroOutputLength,
}

/// Derive a key from a password and salt using PBKDF2-HMAC-SHA256.
///
/// Deterministic: the same `(password, salt, iterations, output_len)` always
/// produces the same hex-encoded output. Rejects degenerate parameters
/// instead of silently weakening the derivation.
pub fn derive_key(
    password: &str,
    salt: &str,
    iterations: u32,
    output_len: usize,
) -> Result<String, KdfError> {
    if iterations == 0 {
        return Err(KdfError::ZeroIterations);
    }
    if output_len == 0 {
        return Err(KdfError::ZeroOutputLength);
    }

    let mut derived = vec![0u8; output_len];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        iterations,
        &mut derived,
    );
    Ok(hex::encode(derived))
}

/// Derive the client-side vault key from a username and master password.
///
/// The username acts as the salt, so the same password yields distinct vault
/// keys for distinct users. The result never leaves the client.
pub fn generate_vault_key(username: &str, master_password: &str) -> Result<String, KdfError> {
    derive_key(
        master_password,
        username,
        VAULT_KEY_ITERATIONS,
        DERIVED_KEY_SIZE,
    )
}

/// Derive the master token from the vault key and master password.
///
/// This is the only derived secret a client ever sends to the server, which
/// stores and compares it as an opaque string.
pub fn generate_master_token(vault_key: &str, master_password: &str) -> Result<String, KdfError> {
    derive_key(
        master_password,
        vault_key,
        MASTER_TOKEN_ITERATIONS,
        DERIVED_KEY_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Full-strength derivations are too slow for unit tests; the properties
    // under test are independent of the iteration count.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn test_derive_key_deterministic() {
        let a = derive_key("hunter2", "alice", TEST_ITERATIONS, DERIVED_KEY_SIZE).unwrap();
        let b = derive_key("hunter2", "alice", TEST_ITERATIONS, DERIVED_KEY_SIZE).unwrap();
        assert_eq!(a, b);
        // 32 bytes hex-encoded
        assert_eq!(a.len(), DERIVED_KEY_SIZE * 2);
    }

    #[test]
    fn test_derive_key_salt_sensitivity() {
        let a = derive_key("hunter2", "alice", TEST_ITERATIONS, DERIVED_KEY_SIZE).unwrap();
        let b = derive_key("hunter2", "bob", TEST_ITERATIONS, DERIVED_KEY_SIZE).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_key_iteration_sensitivity() {
        let a = derive_key("hunter2", "alice", TEST_ITERATIONS, DERIVED_KEY_SIZE).unwrap();
        let b = derive_key("hunter2", "alice", TEST_ITERATIONS + 1, DERIVED_KEY_SIZE).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_key_rejects_zero_iterations() {
        assert!(matches!(
            derive_key("hunter2", "alice", 0, DERIVED_KEY_SIZE),
            Err(KdfError::ZeroIterations)
        ));
    }

    #[test]
    fn test_derive_key_rejects_zero_output_length() {
        assert!(matches!(
            derive_key("hunter2", "alice", TEST_ITERATIONS, 0),
            Err(KdfError::ZeroOutputLength)
        ));
    }

    #[test]
    fn test_vault_key_and_master_token_are_independent() {
        // Same derivation chain a client runs, at test-friendly iteration
        // counts via derive_key directly.
        let vault_key =
            derive_key("correct horse", "alice", TEST_ITERATIONS, DERIVED_KEY_SIZE).unwrap();
        let master_token = derive_key(
            "correct horse",
            &vault_key,
            TEST_ITERATIONS / 10,
            DERIVED_KEY_SIZE,
        )
        .unwrap();
        assert_ne!(vault_key, master_token);
    }

    #[test]
    fn test_known_vector() {
        // RFC 6070-style sanity check against an independently computed
        // PBKDF2-HMAC-SHA256 value.
        let derived = derive_key("password", "salt", 1, 32).unwrap();
        assert_eq!(
            derived,
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }
}
