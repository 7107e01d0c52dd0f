use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::errors::TokenRejected;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::ConfigurationError;
use crate::config::JwtConfig;

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWS string
    pub token: String,
    /// Absolute expiration instant
    pub expires_at: DateTime<Utc>,
}

/// JWT token handler for issuing and verifying access tokens.
///
/// Signs with an HMAC algorithm (HS256 by default) and checks expiry
/// against its clock with no leeway.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtHandler {
    /// Create a new JWT handler from signing settings.
    ///
    /// # Arguments
    /// * `config` - Secret key, algorithm and default expiration
    ///
    /// # Returns
    /// JwtHandler instance using the system clock
    ///
    /// # Errors
    /// * `MissingSecret` / `WeakSecret` - Secret is absent or shorter than 32 bytes
    /// * `UnsupportedAlgorithm` - Algorithm is not HS256, HS384 or HS512
    /// * `InvalidExpiration` - Default expiration is not positive or exceeds one year
    pub fn new(config: &JwtConfig) -> Result<Self, ConfigurationError> {
        let secret = config.validated_secret()?;
        let algorithm = config.signing_algorithm()?;
        let default_ttl = config.default_ttl()?;

        let mut validation = Validation::new(algorithm);
        // Expiry is checked against the injected clock instead
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
            default_ttl,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for issue and expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Time-to-live applied when `issue` receives no explicit one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for a subject.
    ///
    /// # Arguments
    /// * `subject` - Account identifier to embed as `sub`
    /// * `ttl` - Time until expiry, or `None` for the configured default
    ///
    /// # Returns
    /// Signed token and its expiration instant
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<IssuedToken, JwtError> {
        let now = self.clock.now();
        let claims = Claims::new(subject, now, ttl.unwrap_or(self.default_ttl))
            .ok_or_else(|| JwtError::EncodingFailed("Expiration out of range".to_string()))?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::EncodingFailed("Expiration out of range".to_string()))?;

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and extract its subject.
    ///
    /// # Arguments
    /// * `token` - JWT token string
    ///
    /// # Returns
    /// Subject identifier
    ///
    /// # Errors
    /// * `TokenRejected` - Token is malformed, signed with another key or
    ///   algorithm, lacks `sub`/`exp`, or has expired
    pub fn verify(&self, token: &str) -> Result<String, TokenRejected> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                TokenRejected
            })?;

        let claims = token_data.claims;
        if claims.is_expired(self.clock.now().timestamp()) {
            tracing::debug!(exp = claims.exp, "Token expired");
            return Err(TokenRejected);
        }

        if claims.sub.is_empty() {
            tracing::debug!("Token has an empty subject");
            return Err(TokenRejected);
        }

        Ok(claims.sub)
    }

    /// Decode token without validation (for inspection only).
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    ///
    /// # Returns
    /// Decoded claims without signature or expiry verification
    ///
    /// # Errors
    /// * `DecodingFailed` - Token format is invalid
    ///
    /// # Security Warning
    /// Never trust claims from this method for authorization decisions.
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::DecodingFailed(e.to_string()))?;

        Ok(token_data.claims)
    }
}
