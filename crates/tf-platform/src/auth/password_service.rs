//! Password Service
//!
//! Argon2id hashing in PHC string format. Each hash carries its own salt and
//! parameters, so stored hashes verify unchanged after a parameter bump.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::shared::error::{Result, TravelFlowError};

/// Argon2id cost parameters
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory cost in KiB
    pub memory_cost: u32,

    /// Number of iterations
    pub time_cost: u32,

    /// Degree of parallelism
    pub parallelism: u32,

    /// Output hash length in bytes
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
            output_len: 32,
        }
    }
}

impl Argon2Config {
    /// Weak parameters for tests. Never use outside test code.
    pub fn testing() -> Self {
        Self {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            output_len: 32,
        }
    }
}

/// Password requirements enforced before hashing.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

impl PasswordPolicy {
    pub fn validate(&self, password: &str) -> Result<()> {
        if password.len() < self.min_length {
            return Err(TravelFlowError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if password.len() > self.max_length {
            return Err(TravelFlowError::validation(format!(
                "Password must be at most {} characters long",
                self.max_length
            )));
        }
        Ok(())
    }
}

/// Hashes and verifies passwords.
pub struct PasswordService {
    config: Argon2Config,
    policy: PasswordPolicy,
}

impl PasswordService {
    pub fn new(config: Argon2Config, policy: PasswordPolicy) -> Self {
        Self { config, policy }
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            Some(self.config.output_len),
        )
        .map_err(|e| TravelFlowError::internal(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Validate the password against policy, then hash it.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        self.policy.validate(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| TravelFlowError::internal(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash string.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable hash is an error.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| TravelFlowError::internal(format!("Stored hash is invalid: {}", e)))?;

        match self.hasher()?.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(TravelFlowError::internal(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(Argon2Config::default(), PasswordPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(Argon2Config::testing(), PasswordPolicy::default())
    }

    #[test]
    fn hash_and_verify() {
        let service = service();
        let hash = service.hash_password("correct horse battery").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify_password("correct horse battery", &hash).unwrap());
        assert!(!service.verify_password("wrong password!", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let service = service();
        let a = service.hash_password("same password").unwrap();
        let b = service.hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn policy_rejects_short_passwords() {
        let service = service();
        let err = service.hash_password("short").unwrap_err();
        assert!(matches!(err, TravelFlowError::Validation { .. }));
    }

    #[test]
    fn policy_rejects_oversized_passwords() {
        let service = service();
        let long = "x".repeat(200);
        let err = service.hash_password(&long).unwrap_err();
        assert!(matches!(err, TravelFlowError::Validation { .. }));
    }

    #[test]
    fn garbage_stored_hash_is_an_error() {
        let service = service();
        assert!(service.verify_password("anything", "not-a-phc-hash").is_err());
    }
}
