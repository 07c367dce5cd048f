//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, Params,
};
use std::sync::Arc;
use tracing::{debug, warn};
use userbook_core::{UserbookError, UserbookResult};

/// Interface for password hashing operations.
///
/// Repositories hold an `Arc<dyn PasswordHasherInterface>` so tests can
/// swap in a cheaper hasher.
pub trait PasswordHasherInterface: Send + Sync {
    /// Hashes a password.
    fn hash(&self, password: &str) -> UserbookResult<String>;

    /// Verifies a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> UserbookResult<bool>;
}

/// Password hasher service using Argon2id.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher from a cost parameter (Argon2 time cost).
    ///
    /// Out-of-range costs fall back to the library defaults.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        match Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None) {
            Ok(params) => Self::with_params(params),
            Err(e) => {
                warn!("Invalid password hash cost {}: {}; using defaults", cost, e);
                Self::new()
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> UserbookResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserbookError::Internal(format!("Failed to hash password: {}", e)))?;

        debug!("Password hashed successfully");
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> UserbookResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| UserbookError::Internal(format!("Invalid password hash format: {}", e)))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(UserbookError::Internal(format!(
                "Password verification error: {}",
                e
            ))),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::with_cost(1);
        let hash = hasher.hash("secret-password").unwrap();
        assert_ne!(hash, "secret-password");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("secret-password", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = PasswordHasher::with_cost(1);
        let hash1 = hasher.hash("password123").unwrap();
        let hash2 = hasher.hash("password123").unwrap();
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("password123", &hash1).unwrap());
        assert!(hasher.verify("password123", &hash2).unwrap());
    }

    #[test]
    fn test_cost_is_encoded_in_hash() {
        let hash = PasswordHasher::with_cost(2).hash("password123").unwrap();
        assert!(hash.contains("t=2"));
    }

    #[test]
    fn test_zero_cost_falls_back_to_defaults() {
        let hasher = PasswordHasher::with_cost(0);
        let hash = hasher.hash("password123").unwrap();
        assert!(hasher.verify("password123", &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format_returns_error() {
        let hasher = PasswordHasher::default();
        assert!(hasher.verify("password", "not-a-valid-hash").is_err());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let hasher: Arc<dyn PasswordHasherInterface> = Arc::new(PasswordHasher::with_cost(1));
        let hash = hasher.hash("password123").unwrap();
        assert!(hasher.verify("password123", &hash).unwrap());
    }
}
