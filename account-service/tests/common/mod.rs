use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::account::errors::AccountError;
use account_service::account::models::Account;
use account_service::account::models::AccountId;
use account_service::account::models::EmailAddress;
use account_service::account::ports::AccountRepository;
use account_service::account::service::AccountService;
use async_trait::async_trait;
use auth::AuthConfig;
use auth::Authenticator;
use auth::Clock;
use auth::HashingConfig;
use auth::JwtConfig;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::RwLock;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory stand-in for the document store, keyed by id with a unique email.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub async fn get(&self, id: &AccountId) -> Option<Account> {
        self.accounts.read().await.get(id).cloned()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyRegistered(
                account.email.to_string(),
            ));
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&account.id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(account)
            }
            None => Err(AccountError::NotFound(account.id.to_string())),
        }
    }

    async fn soft_delete(&self, id: &AccountId) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        account.is_active = false;
        account.updated_at = Utc::now();
        Ok(())
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_now() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc::now()),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub struct TestApp {
    pub repository: Arc<InMemoryAccountRepository>,
    pub authenticator: Arc<Authenticator>,
    pub service: AccountService<InMemoryAccountRepository>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_hashing(1024)
    }

    pub fn with_hashing(memory_kib: u32) -> Self {
        Self::with_repository(Arc::new(InMemoryAccountRepository::default()), memory_kib)
    }

    /// Build an app sharing an existing store, e.g. to simulate a cost upgrade.
    pub fn with_repository(repository: Arc<InMemoryAccountRepository>, memory_kib: u32) -> Self {
        let clock = ManualClock::starting_now();
        let config = AuthConfig {
            jwt: JwtConfig::new(TEST_SECRET),
            hashing: HashingConfig {
                memory_kib,
                iterations: 1,
                parallelism: 1,
            },
        };
        let authenticator = Arc::new(
            Authenticator::new(&config)
                .expect("Failed to create authenticator")
                .with_clock(clock.clone()),
        );
        let service = AccountService::new(Arc::clone(&repository), Arc::clone(&authenticator));

        Self {
            repository,
            authenticator,
            service,
            clock,
        }
    }
}
