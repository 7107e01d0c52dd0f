use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthSession;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::RegisterCommand;

/// Port for the registration and login flow.
#[async_trait]
pub trait AuthFlowPort: Send + Sync + 'static {
    /// Register a new account and open a session for it.
    ///
    /// # Arguments
    /// * `command` - Validated email, password, full name, role and phone
    ///
    /// # Returns
    /// Created account with an access token
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `RepositoryError` - Storage operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AccountError>;

    /// Check credentials and open a session.
    ///
    /// # Arguments
    /// * `command` - Raw email and password
    ///
    /// # Returns
    /// Account with an access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, inactive account or wrong password
    /// * `RepositoryError` - Storage operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AccountError>;

    /// Resolve a bearer token to its active account.
    ///
    /// # Arguments
    /// * `token` - Access token presented by the client
    ///
    /// # Returns
    /// Account identified by the token subject
    ///
    /// # Errors
    /// * `Unauthenticated` - Token rejected, or account missing or inactive
    /// * `RepositoryError` - Storage operation failed
    async fn authenticate(&self, token: &str) -> Result<Account, AccountError>;

    /// Soft-delete an account so it can no longer log in.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `RepositoryError` - Storage operation failed
    async fn deactivate_account(&self, id: &AccountId) -> Result<(), AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// Implemented by the document store adapter.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist new account to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `RepositoryError` - Storage operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by identifier.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Retrieve account by email address.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Update existing account in storage.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `RepositoryError` - Storage operation failed
    async fn update(&self, account: Account) -> Result<Account, AccountError>;

    /// Flip the account's active flag off.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `RepositoryError` - Storage operation failed
    async fn soft_delete(&self, id: &AccountId) -> Result<(), AccountError>;
}
