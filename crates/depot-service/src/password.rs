//! # Password Hashing
//!
//! Argon2id hashing for user credentials, stored as PHC strings:
//!
//! ```text
//! $argon2id$v=19$m=19456,t=12,p=1$<salt>$<hash>
//!                        ─────
//!                        cost (time cost, passes over memory)
//! ```
//!
//! The cost travels inside every hash, so raising [`HashingConfig::cost`]
//! makes [`PasswordHasher::needs_rehash`] flag older hashes, which are
//! upgraded on the next successful login.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};

/// Work parameters for new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Argon2 time cost (iterations).
    pub cost: u32,
    /// Memory per hash, in KiB.
    pub memory_kib: u32,
    /// Lanes.
    pub parallelism: u32,
}

impl HashingConfig {
    pub const DEFAULT_COST: u32 = 12;
    pub const DEFAULT_MEMORY_KIB: u32 = 19_456;
}

impl Default for HashingConfig {
    fn default() -> Self {
        HashingConfig {
            cost: Self::DEFAULT_COST,
            memory_kib: Self::DEFAULT_MEMORY_KIB,
            parallelism: 1,
        }
    }
}

/// Hashes and verifies passwords.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    config: HashingConfig,
    params: Params,
}

impl PasswordHasher {
    /// Builds a hasher, rejecting parameters argon2 cannot work with.
    pub fn new(config: HashingConfig) -> ServiceResult<Self> {
        let params = Params::new(config.memory_kib, config.cost, config.parallelism, None)
            .map_err(|e| ServiceError::Credential(format!("Invalid hashing parameters: {e}")))?;

        Ok(PasswordHasher { config, params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn config(&self) -> HashingConfig {
        self.config
    }

    /// Hashes `plaintext` with a fresh random salt.
    ///
    /// Two hashes of the same input never match byte for byte.
    pub fn hash(&self, plaintext: &str) -> ServiceResult<String> {
        if plaintext.is_empty() {
            return Err(ServiceError::Credential(
                "Password cannot be empty".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| ServiceError::Credential(format!("Failed to hash password: {e}")))?;

        Ok(hash.to_string())
    }

    /// True iff `plaintext` matches `hash`. Malformed hashes never match.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(e) => {
                debug!(error = %e, "Stored hash is not a PHC string");
                return false;
            }
        };

        // Parameters come from the hash itself, not from self.config.
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// True if `hash` should be replaced: it is malformed, not argon2id, or
    /// was made with a lower cost than the configured one.
    pub fn needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        match parsed.params.get_decimal("t") {
            Some(cost) => cost < self.config.cost,
            None => true,
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        let config = HashingConfig::default();
        PasswordHasher {
            config,
            params: Params::new(config.memory_kib, config.cost, config.parallelism, None)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher(cost: u32) -> PasswordHasher {
    PasswordHasher::new(HashingConfig {
        cost,
        memory_kib: 64,
        parallelism: 1,
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = fast_hasher(2);
        let hash = hasher.hash("Admin123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Admin123", &hash));
        assert!(!hasher.verify("admin123", &hash));
    }

    #[test]
    fn test_same_input_gets_different_salts() {
        let hasher = fast_hasher(2);
        let a = hasher.hash("Admin123").unwrap();
        let b = hasher.hash("Admin123").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("Admin123", &a));
        assert!(hasher.verify("Admin123", &b));
    }

    #[test]
    fn test_empty_password_is_rejected() {
        assert!(matches!(
            fast_hasher(2).hash(""),
            Err(ServiceError::Credential(_))
        ));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = fast_hasher(2);
        assert!(!hasher.verify("Admin123", ""));
        assert!(!hasher.verify("Admin123", "not-a-hash"));
        assert!(!hasher.verify("Admin123", "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW"));
    }

    #[test]
    fn test_needs_rehash_follows_cost() {
        let old = fast_hasher(2).hash("Admin123").unwrap();

        assert!(!fast_hasher(2).needs_rehash(&old));
        assert!(!fast_hasher(1).needs_rehash(&old));
        assert!(fast_hasher(3).needs_rehash(&old));
    }

    #[test]
    fn test_needs_rehash_for_invalid_or_foreign_hashes() {
        let hasher = fast_hasher(2);
        assert!(hasher.needs_rehash("garbage"));
        assert!(hasher.needs_rehash("$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW"));

        let argon2i = "$argon2i$v=19$m=64,t=3,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA";
        assert!(hasher.needs_rehash(argon2i));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(HashingConfig::default().cost, 12);
        assert_eq!(PasswordHasher::default().config().cost, 12);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let result = PasswordHasher::new(HashingConfig {
            cost: 0,
            memory_kib: 64,
            parallelism: 1,
        });
        assert!(matches!(result, Err(ServiceError::Credential(_))));
    }
}
