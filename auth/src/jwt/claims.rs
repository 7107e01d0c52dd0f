use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claims.
///
/// Subject and expiration are mandatory; a token without either is never valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Create claims for a subject issued at `now` and expiring after `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Account identifier
    /// * `now` - Issue instant
    /// * `ttl` - Time until the token expires (may be negative)
    ///
    /// # Returns
    /// `None` if the expiration falls outside the representable range
    pub fn new(subject: impl ToString, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;

        Some(Self {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        })
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if token is expired.
    ///
    /// A token is valid only strictly before its expiration instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let now = Utc::now();
        let claims = Claims::new("user-42", now, Duration::minutes(30)).unwrap();

        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_negative_ttl() {
        let now = Utc::now();
        let claims = Claims::new("user", now, Duration::seconds(-1)).unwrap();

        assert!(claims.exp < claims.iat);
        assert!(claims.is_expired(now.timestamp()));
    }

    #[test]
    fn test_out_of_range_ttl() {
        let now = Utc::now();

        assert!(Claims::new("user", now, Duration::days(365 * 300_000)).is_none());
        assert!(Claims::new("user", now, Duration::days(-365 * 300_000)).is_none());
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: "user".to_string(),
            exp: 1000,
            iat: 0,
        };

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_expires_at() {
        let claims = Claims {
            sub: "user".to_string(),
            exp: 1_700_000_000,
            iat: 0,
        };

        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
    }
}
