use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    UserAccount, UserAccountInsertRequest, UserAccountStorageError, UserAccountStorageResult,
    UserAccountStore,
};

/// In-process `UserAccountStore` used by tests
#[derive(Debug, Default)]
pub struct InMemoryUserAccountStore {
    accounts: RwLock<HashMap<i64, UserAccount>>,
}

impl InMemoryUserAccountStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether no account is registered
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl UserAccountStore for InMemoryUserAccountStore {
    async fn get_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> UserAccountStorageResult<Option<UserAccount>> {
        Ok(self.accounts.read().await.get(&telegram_id).cloned())
    }

    async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> UserAccountStorageResult<bool> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .any(|account| account.username == username || account.email == email))
    }

    async fn insert(
        &self,
        request: UserAccountInsertRequest,
    ) -> UserAccountStorageResult<UserAccount> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&request.telegram_id) {
            return Err(UserAccountStorageError::UserAccountExists);
        }

        let account = UserAccount::from(request);
        accounts.insert(account.telegram_id, account.clone());
        Ok(account)
    }
}
