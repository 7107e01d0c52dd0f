use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::config::ConfigurationError;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenRejected;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds only immutable configuration, so a single instance can be shared
/// behind an `Arc` by every request handler.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    /// Hash at the configured cost, verified against when no account matches
    decoy_hash: String,
}

const DECOY_PASSWORD: &str = "decoy-password-never-matches";

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Expiration instant of the access token
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for AuthenticationResult {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Signing key, algorithm, default expiration and hashing cost
    ///
    /// # Returns
    /// Configured Authenticator instance
    ///
    /// # Errors
    /// * `ConfigurationError` - Settings are missing or unusable
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigurationError> {
        let password_hasher = PasswordHasher::new(&config.hashing)?;
        let jwt_handler = JwtHandler::new(&config.jwt)?;
        let decoy_hash = password_hasher
            .hash(DECOY_PASSWORD)
            .map_err(|e| ConfigurationError::InvalidHashingParams(e.to_string()))?;

        Ok(Self {
            password_hasher,
            jwt_handler,
            decoy_hash,
        })
    }

    /// Replace the clock used for token issue and expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.jwt_handler = self.jwt_handler.with_clock(clock);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Spend one full verification on a credential that is already known to fail.
    ///
    /// Login paths that reject before reaching a stored hash (unknown email,
    /// inactive account) call this so their timing matches a wrong password.
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.password_hasher.verify(password, &self.decoy_hash);
    }

    /// Check whether a stored hash should be upgraded to the current cost settings.
    pub fn needs_rehash(&self, stored_hash: &str) -> bool {
        self.password_hasher.needs_rehash(stored_hash)
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Account identifier to embed in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or hash is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let issued = self.jwt_handler.issue(subject, None)?;

        Ok(issued.into())
    }

    /// Generate JWT token without password verification.
    ///
    /// Used right after registration, when the credential was just created.
    ///
    /// # Arguments
    /// * `subject` - Account identifier
    /// * `ttl` - Time until expiry, or `None` for the configured default
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(
        &self,
        subject: &str,
        ttl: Option<Duration>,
    ) -> Result<AuthenticationResult, JwtError> {
        self.jwt_handler.issue(subject, ttl).map(Into::into)
    }

    /// Validate a JWT token and return its subject.
    ///
    /// # Errors
    /// * `TokenRejected` - Token is invalid for any reason
    pub fn verify_token(&self, token: &str) -> Result<String, TokenRejected> {
        self.jwt_handler.verify(token)
    }

    /// Token handler, for inspection tooling.
    pub fn jwt_handler(&self) -> &JwtHandler {
        &self.jwt_handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashingConfig;
    use crate::config::JwtConfig;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt: JwtConfig::new("test_secret_key_at_least_32_bytes!"),
            hashing: HashingConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        }
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(&test_config()).unwrap();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, "user123")
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());
        assert!(result.expires_at > Utc::now());
        assert_eq!(
            authenticator.verify_token(&result.access_token),
            Ok("user123".to_string())
        );
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(&test_config()).unwrap();

        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate("wrong_password", &hash, "user123");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_malformed_hash() {
        let authenticator = Authenticator::new(&test_config()).unwrap();

        let result = authenticator.authenticate("my_password", "not-a-valid-hash", "user123");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_issue_and_verify_token() {
        let authenticator = Authenticator::new(&test_config()).unwrap();

        let result = authenticator
            .issue_token("user123", Some(Duration::hours(1)))
            .expect("Failed to issue token");

        assert_eq!(
            authenticator.verify_token(&result.access_token),
            Ok("user123".to_string())
        );
    }

    #[test]
    fn test_verify_invalid_token() {
        let authenticator = Authenticator::new(&test_config()).unwrap();

        assert_eq!(
            authenticator.verify_token("invalid.token.here"),
            Err(TokenRejected)
        );
    }

    #[test]
    fn test_decoy_hash_matches_configured_cost() {
        let authenticator = Authenticator::new(&test_config()).unwrap();

        assert!(authenticator.decoy_hash.starts_with("$argon2id$"));
        assert!(!authenticator.needs_rehash(&authenticator.decoy_hash));
        assert!(!authenticator.verify_password("my_password", &authenticator.decoy_hash));

        authenticator.verify_decoy("my_password");
    }

    #[test]
    fn test_new_missing_secret() {
        let mut config = test_config();
        config.jwt.secret = String::new();

        assert!(matches!(
            Authenticator::new(&config),
            Err(ConfigurationError::MissingSecret)
        ));
    }

    #[test]
    fn test_new_invalid_hashing_params() {
        let mut config = test_config();
        config.hashing.parallelism = 0;

        assert!(matches!(
            Authenticator::new(&config),
            Err(ConfigurationError::InvalidHashingParams(_))
        ));
    }
}
