//! Credential and session utilities
//!
//! Provides the authentication core shared by DiaConnect services:
//! - Password hashing (Argon2id, tunable cost)
//! - JWT access token issuance and verification (HMAC)
//! - Authentication coordination
//!
//! Everything here is synchronous and holds no mutable state beyond the
//! configuration loaded at startup.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashingConfig, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(&HashingConfig::default()).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("my_password", "not-a-valid-hash"));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{JwtConfig, JwtHandler};
//!
//! let handler = JwtHandler::new(&JwtConfig::new("secret_key_at_least_32_bytes_long!")).unwrap();
//! let issued = handler.issue("user123", None).unwrap();
//! assert_eq!(handler.verify(&issued.token).unwrap(), "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{AuthConfig, Authenticator, HashingConfig, JwtConfig};
//!
//! let config = AuthConfig {
//!     jwt: JwtConfig::new("secret_key_at_least_32_bytes_long!"),
//!     hashing: HashingConfig::default(),
//! };
//! let auth = Authenticator::new(&config).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, "user123").unwrap();
//!
//! // Validate token
//! let subject = auth.verify_token(&result.access_token).unwrap();
//! assert_eq!(subject, "user123");
//! ```

pub mod authenticator;
pub mod clock;
pub mod config;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::SystemClock;
pub use config::AuthConfig;
pub use config::ConfigurationError;
pub use config::HashingConfig;
pub use config::JwtConfig;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenRejected;
pub use password::PasswordError;
pub use password::PasswordHasher;
