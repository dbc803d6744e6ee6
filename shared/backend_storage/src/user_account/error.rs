//! Error types for user account storage operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    get_item::GetItemError, put_item::PutItemError, query::QueryError,
};
use thiserror::Error;

/// Result type for user account storage operations
pub type UserAccountStorageResult<T> = Result<T, UserAccountStorageError>;

/// Errors that can occur during user account storage operations
#[derive(Error, Debug)]
pub enum UserAccountStorageError {
    /// Failed to insert user account into Dynamo DB
    #[error("Failed to insert user account into DynamoDB: {0}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to get user account from Dynamo DB
    #[error("Failed to get user account from DynamoDB: {0}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to query user accounts from Dynamo DB
    #[error("Failed to query user accounts from DynamoDB: {0}")]
    DynamoDbQueryError(#[from] SdkError<QueryError>),

    /// An account already exists for this Telegram id
    #[error("User account already exists")]
    UserAccountExists,

    /// Serialization error for `serde_dynamo`
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_dynamo::Error> for UserAccountStorageError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
