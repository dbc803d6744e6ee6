//! User account storage integration using Dynamo DB
//!
//! One account per Telegram user, keyed by the Telegram id taken from verified
//! Mini App launch data. Usernames and emails are looked up through GSIs.

mod error;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::{error::SdkError, types::AttributeValue, Client as DynamoDbClient};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::Display;

pub use error::{UserAccountStorageError, UserAccountStorageResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryUserAccountStore;

/// Attribute names for the user account table
#[derive(Debug, Clone, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UserAccountAttribute {
    /// Telegram user id (Primary Key)
    TelegramId,
    /// Chosen username (GSI)
    Username,
    /// Email address, lowercased (GSI)
    Email,
    /// First name reported by Telegram
    FirstName,
    /// Last name reported by Telegram
    LastName,
    /// Telegram `@username`
    TelegramUsername,
    /// Whether the account is active
    IsActive,
    /// Created At
    CreatedAt,
}

/// User account data structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Telegram user id (Primary Key)
    pub telegram_id: i64,
    /// Chosen username
    pub username: String,
    /// Email address
    pub email: String,
    /// First name reported by Telegram at registration
    pub first_name: String,
    /// Last name reported by Telegram at registration
    pub last_name: String,
    /// Telegram `@username` at registration
    pub telegram_username: String,
    /// Whether the account is active
    pub is_active: bool,
    /// Created At
    pub created_at: i64,
}

/// Request to register a new user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccountInsertRequest {
    /// Telegram user id
    pub telegram_id: i64,
    /// Chosen username
    pub username: String,
    /// Email address
    pub email: String,
    /// First name reported by Telegram
    pub first_name: String,
    /// Last name reported by Telegram
    pub last_name: String,
    /// Telegram `@username`
    pub telegram_username: String,
}

impl From<UserAccountInsertRequest> for UserAccount {
    fn from(request: UserAccountInsertRequest) -> Self {
        Self {
            telegram_id: request.telegram_id,
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            telegram_username: request.telegram_username,
            is_active: true,
            created_at: Utc::now().timestamp(),
        }
    }
}

/// Lookup and registration of user accounts
#[async_trait]
pub trait UserAccountStore: Send + Sync {
    /// Gets the account registered for a Telegram user
    async fn get_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> UserAccountStorageResult<Option<UserAccount>>;

    /// Whether any account already uses this username or this email
    async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> UserAccountStorageResult<bool>;

    /// Inserts a new account, failing with `UserAccountExists` if the Telegram
    /// user is already registered
    async fn insert(
        &self,
        request: UserAccountInsertRequest,
    ) -> UserAccountStorageResult<UserAccount>;
}

/// User account storage client for Dynamo DB operations
pub struct UserAccountStorage {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
    username_index_name: String,
    email_index_name: String,
}

impl UserAccountStorage {
    /// Creates a new user account storage client
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table name for user accounts
    /// * `username_index_name` - Name of the GSI keyed by username
    /// * `email_index_name` - Name of the GSI keyed by email
    #[must_use]
    pub const fn new(
        dynamodb_client: Arc<DynamoDbClient>,
        table_name: String,
        username_index_name: String,
        email_index_name: String,
    ) -> Self {
        Self {
            dynamodb_client,
            table_name,
            username_index_name,
            email_index_name,
        }
    }

    /// Whether the given GSI holds at least one item for `value`
    async fn index_contains(
        &self,
        index_name: &str,
        attribute: UserAccountAttribute,
        value: &str,
    ) -> UserAccountStorageResult<bool> {
        let response = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .index_name(index_name)
            .key_condition_expression("#attr = :value")
            .expression_attribute_names("#attr", attribute.to_string())
            .expression_attribute_values(":value", AttributeValue::S(value.to_string()))
            .limit(1)
            .send()
            .await?;

        Ok(response.count() > 0)
    }
}

#[async_trait]
impl UserAccountStore for UserAccountStorage {
    async fn get_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> UserAccountStorageResult<Option<UserAccount>> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(
                UserAccountAttribute::TelegramId.to_string(),
                AttributeValue::N(telegram_id.to_string()),
            )
            .send()
            .await?;

        let account = response
            .item()
            .map(|item| serde_dynamo::from_item(item.clone()))
            .transpose()?;

        Ok(account)
    }

    async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> UserAccountStorageResult<bool> {
        let (username_taken, email_taken) = tokio::try_join!(
            self.index_contains(
                &self.username_index_name,
                UserAccountAttribute::Username,
                username
            ),
            self.index_contains(&self.email_index_name, UserAccountAttribute::Email, email),
        )?;

        Ok(username_taken || email_taken)
    }

    async fn insert(
        &self,
        request: UserAccountInsertRequest,
    ) -> UserAccountStorageResult<UserAccount> {
        let account = UserAccount::from(request);
        let item = serde_dynamo::to_item(&account)?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", UserAccountAttribute::TelegramId.to_string())
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    UserAccountStorageError::UserAccountExists
                } else {
                    err.into()
                }
            })?;

        Ok(account)
    }
}
