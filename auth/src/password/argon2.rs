use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;
use crate::config::ConfigurationError;
use crate::config::HashingConfig;

/// Password hashing implementation.
///
/// Produces self-describing PHC strings (Argon2id with a fresh salt per call)
/// and verifies plaintext against them using the parameters embedded in the
/// stored hash, so raising the configured cost does not break older hashes.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    params: Params,
}

impl PasswordHasher {
    /// Create a password hasher with the given cost parameters.
    ///
    /// # Arguments
    /// * `config` - Memory, iteration and parallelism costs
    ///
    /// # Returns
    /// PasswordHasher instance using Argon2id v0x13
    ///
    /// # Errors
    /// * `InvalidHashingParams` - Parameters are outside Argon2 bounds
    pub fn new(config: &HashingConfig) -> Result<Self, ConfigurationError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| ConfigurationError::InvalidHashingParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            params,
        })
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Malformed or foreign-format hashes never match.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "Stored password hash could not be parsed");
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Check whether a stored hash was produced with outdated settings.
    ///
    /// # Arguments
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if the hash uses another algorithm or other cost parameters
    /// than this hasher, or cannot be parsed
    pub fn needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return true;
        };

        if parsed_hash.algorithm != argon2::ARGON2ID_IDENT {
            return true;
        }

        match Params::try_from(&parsed_hash) {
            Ok(stored) => {
                stored.m_cost() != self.params.m_cost()
                    || stored.t_cost() != self.params.t_cost()
                    || stored.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}
