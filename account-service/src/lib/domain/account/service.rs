use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthFlowPort;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthSession;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::RegisterCommand;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of AuthFlowPort with dependency injection.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Password hashing and token handling
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Reject a login that never reached a stored hash, after the same hashing work.
    fn reject_login(&self, password: &str) -> AccountError {
        self.authenticator.verify_decoy(password);
        AccountError::InvalidCredentials
    }

    /// Re-hash the password with current cost settings if the stored hash is outdated.
    ///
    /// Failing to persist the new hash does not fail the login.
    async fn upgrade_password_hash(&self, account: Account, password: &str) -> Account {
        if !self.authenticator.needs_rehash(&account.password_hash) {
            return account;
        }

        let password_hash = match self.authenticator.hash_password(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(account_id = %account.id, error = %e, "Password rehash failed");
                return account;
            }
        };

        let upgraded = Account {
            password_hash,
            updated_at: Utc::now(),
            ..account.clone()
        };

        match self.repository.update(upgraded).await {
            Ok(updated) => {
                tracing::info!(account_id = %updated.id, "Password hash upgraded");
                updated
            }
            Err(e) => {
                tracing::warn!(account_id = %account.id, error = %e, "Failed to store upgraded password hash");
                account
            }
        }
    }
}

#[async_trait]
impl<AR> AuthFlowPort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AccountError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AccountError::EmailAlreadyRegistered(
                command.email.to_string(),
            ));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())
            .map_err(|e| AccountError::Unknown(format!("Password hashing failed: {}", e)))?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email: command.email,
            password_hash,
            full_name: command.full_name,
            role: command.role,
            phone: command.phone,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created_account = self.repository.create(account).await?;

        let token = self
            .authenticator
            .issue_token(&created_account.id.to_string(), None)
            .map_err(|e| AccountError::Unknown(format!("Token generation failed: {}", e)))?;

        tracing::info!(
            account_id = %created_account.id,
            role = %created_account.role,
            "Account registered"
        );

        Ok(AuthSession::new(created_account, token))
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AccountError> {
        let email = match EmailAddress::new(command.email) {
            Ok(email) => email,
            Err(_) => return Err(self.reject_login(&command.password)),
        };

        let account = match self.repository.find_by_email(&email).await? {
            Some(account) if account.is_active => account,
            _ => return Err(self.reject_login(&command.password)),
        };

        let token = self
            .authenticator
            .authenticate(
                &command.password,
                &account.password_hash,
                &account.id.to_string(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
                AuthenticationError::PasswordError(err) => {
                    AccountError::Unknown(format!("Password verification failed: {}", err))
                }
                AuthenticationError::JwtError(err) => {
                    AccountError::Unknown(format!("Token generation failed: {}", err))
                }
            })?;

        let account = self
            .upgrade_password_hash(account, &command.password)
            .await;

        tracing::info!(account_id = %account.id, "Login succeeded");

        Ok(AuthSession::new(account, token))
    }

    async fn authenticate(&self, token: &str) -> Result<Account, AccountError> {
        let subject = self
            .authenticator
            .verify_token(token)
            .map_err(|_| AccountError::Unauthenticated)?;

        let id = AccountId::from_string(&subject).map_err(|_| AccountError::Unauthenticated)?;

        self.repository
            .find_by_id(&id)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AccountError::Unauthenticated)
    }

    async fn deactivate_account(&self, id: &AccountId) -> Result<(), AccountError> {
        self.repository.soft_delete(id).await?;

        tracing::info!(account_id = %id, "Account deactivated");

        Ok(())
    }
}
