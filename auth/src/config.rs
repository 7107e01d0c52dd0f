use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use thiserror::Error;

/// Minimum HMAC key length in bytes (256 bits).
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest default token lifetime accepted, in minutes (one year).
pub const MAX_EXPIRATION_MINUTES: i64 = 365 * 24 * 60;

/// Error raised when authentication settings cannot be used.
///
/// Always fatal: a service must refuse to start rather than run
/// without a usable signing key or hashing parameters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("JWT signing secret is missing")]
    MissingSecret,

    #[error("JWT signing secret too short: minimum {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    #[error("Unsupported JWT algorithm: {0} (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("Token expiration must be between 1 and {max} minutes, got {0}", max = MAX_EXPIRATION_MINUTES)]
    InvalidExpiration(i64),

    #[error("Invalid password hashing parameters: {0}")]
    InvalidHashingParams(String),
}

/// Authentication settings, established once at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// Token signing settings.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    /// Symmetric signing key. Has no default so a missing key is caught at startup.
    #[serde(default)]
    pub secret: String,

    #[serde(default = "JwtConfig::default_algorithm")]
    pub algorithm: String,

    #[serde(default = "JwtConfig::default_expiration_minutes")]
    pub expiration_minutes: i64,
}

impl JwtConfig {
    pub const DEFAULT_ALGORITHM: &'static str = "HS256";
    pub const DEFAULT_EXPIRATION_MINUTES: i64 = 30;

    /// Create settings with the default algorithm and expiration.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Self::default_algorithm(),
            expiration_minutes: Self::default_expiration_minutes(),
        }
    }

    fn default_algorithm() -> String {
        Self::DEFAULT_ALGORITHM.to_string()
    }

    fn default_expiration_minutes() -> i64 {
        Self::DEFAULT_EXPIRATION_MINUTES
    }

    /// Validate the secret length.
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    /// * `WeakSecret` - Secret is shorter than 32 bytes
    pub fn validated_secret(&self) -> Result<&[u8], ConfigurationError> {
        let secret = self.secret.as_bytes();
        if secret.is_empty() {
            return Err(ConfigurationError::MissingSecret);
        }
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigurationError::WeakSecret {
                min: MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }
        Ok(secret)
    }

    /// Parse the configured algorithm, accepting only the HMAC family.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Unknown or asymmetric algorithm
    pub fn signing_algorithm(&self) -> Result<Algorithm, ConfigurationError> {
        let name = self.algorithm.trim().to_ascii_uppercase();
        match Algorithm::from_str(&name) {
            Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => {
                Ok(algorithm)
            }
            _ => Err(ConfigurationError::UnsupportedAlgorithm(
                self.algorithm.clone(),
            )),
        }
    }

    /// Default token time-to-live.
    ///
    /// # Errors
    /// * `InvalidExpiration` - Configured expiration is not positive or exceeds one year
    pub fn default_ttl(&self) -> Result<Duration, ConfigurationError> {
        let minutes = self.expiration_minutes;
        if !(1..=MAX_EXPIRATION_MINUTES).contains(&minutes) {
            return Err(ConfigurationError::InvalidExpiration(minutes));
        }
        Duration::try_minutes(minutes).ok_or(ConfigurationError::InvalidExpiration(minutes))
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    #[serde(default = "HashingConfig::default_memory_kib")]
    pub memory_kib: u32,

    /// Number of passes
    #[serde(default = "HashingConfig::default_iterations")]
    pub iterations: u32,

    /// Degree of parallelism (lanes)
    #[serde(default = "HashingConfig::default_parallelism")]
    pub parallelism: u32,
}

impl HashingConfig {
    // OWASP baseline for Argon2id: m=19 MiB, t=2, p=1
    pub const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;
    pub const DEFAULT_ITERATIONS: u32 = 2;
    pub const DEFAULT_PARALLELISM: u32 = 1;

    fn default_memory_kib() -> u32 {
        Self::DEFAULT_MEMORY_KIB
    }

    fn default_iterations() -> u32 {
        Self::DEFAULT_ITERATIONS
    }

    fn default_parallelism() -> u32 {
        Self::DEFAULT_PARALLELISM
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Self::DEFAULT_MEMORY_KIB,
            iterations: Self::DEFAULT_ITERATIONS,
            parallelism: Self::DEFAULT_PARALLELISM,
        }
    }
}
