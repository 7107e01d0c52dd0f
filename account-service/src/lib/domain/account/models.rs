use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::EmailError;
use crate::account::errors::FullNameError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::RoleError;

/// Account aggregate entity.
///
/// A registered patient or family member. `is_active` is the soft-delete flag.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub full_name: FullName,
    pub role: Role,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Literal role check; no hierarchy or permission model.
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_str() == role
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    ///
    /// # Returns
    /// AccountId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Trimmed, lowercased and checked with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at registration.
///
/// Enforces the minimum length policy. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    /// Create a new password satisfying the length policy.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Display name of the account holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    const MAX_LENGTH: usize = 128;

    /// Create a new full name.
    ///
    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name exceeds 128 characters
    pub fn new(full_name: String) -> Result<Self, FullNameError> {
        let full_name = full_name.trim().to_string();
        let length = full_name.chars().count();
        if length == 0 {
            Err(FullNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(FullNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(full_name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Patient,
    FamilyMember,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::FamilyMember => "family_member",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "family_member" => Ok(Role::FamilyMember),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub full_name: FullName,
    pub role: Role,
    pub phone: Option<String>,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// A blank phone number is treated as absent.
    pub fn new(
        email: EmailAddress,
        password: Password,
        full_name: FullName,
        role: Role,
        phone: Option<String>,
    ) -> Self {
        let phone = phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Self {
            email,
            password,
            full_name,
            role,
            phone,
        }
    }
}

/// Command to log in with raw credentials.
///
/// Kept unvalidated: a malformed email or short password must fail exactly
/// like an unknown account.
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Authenticated account with its access token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account: Account,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(account: Account, token: auth::AuthenticationResult) -> Self {
        Self {
            account,
            access_token: token.access_token,
            expires_at: token.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Alice@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_invalid() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new(String::new()).is_err());
    }

    #[test]
    fn test_password_min_length() {
        assert_eq!(
            Password::new("12345".to_string()).unwrap_err(),
            PasswordPolicyError::TooShort { min: 6, actual: 5 }
        );
        assert!(Password::new("123456".to_string()).is_ok());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter2-secret".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter2"));
    }

    #[test]
    fn test_role_literal_match() {
        assert_eq!("patient".parse::<Role>().unwrap(), Role::Patient);
        assert_eq!("family_member".parse::<Role>().unwrap(), Role::FamilyMember);
        assert!("Patient".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::FamilyMember.to_string(), "family_member");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(
            FullName::new("  John Doe ".to_string()).unwrap().as_str(),
            "John Doe"
        );
        assert_eq!(
            FullName::new("   ".to_string()).unwrap_err(),
            FullNameError::Empty
        );
        assert!(matches!(
            FullName::new("x".repeat(129)),
            Err(FullNameError::TooLong { max: 128, actual: 129 })
        ));
    }

    #[test]
    fn test_register_command_blank_phone() {
        let command = RegisterCommand::new(
            EmailAddress::new("user@example.com".to_string()).unwrap(),
            Password::new("password123".to_string()).unwrap(),
            FullName::new("John Doe".to_string()).unwrap(),
            Role::Patient,
            Some("  ".to_string()),
        );
        assert_eq!(command.phone, None);
    }

    #[test]
    fn test_account_id_from_string() {
        let id = AccountId::new();
        assert_eq!(AccountId::from_string(&id.to_string()).unwrap(), id);
        assert!(AccountId::from_string("user-42").is_err());
    }
}
