use thiserror::Error;

/// The `user` part of a signed payload could not be turned into an identity.
///
/// Genuine Telegram data never hits this after a successful validation, so it
/// points at either a skipped validation step or a protocol change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedIdentityError {
    /// Neither `user[id]` nor a `user` object is present
    #[error("initData does not contain a user id")]
    MissingUserId,

    /// `user[id]` is present but is not an integer
    #[error("user id is not a valid integer: {0}")]
    InvalidUserId(String),

    /// The `user` field is not a JSON object with an integer `id`
    #[error("user object is malformed: {0}")]
    InvalidUserObject(String),
}

/// Reasons a payload is rejected by [`crate::InitDataVerifier::authenticate`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InitDataError {
    /// The payload carries no `hash` field
    #[error("initData is missing the hash field")]
    MissingHash,

    /// The signature does not match the payload
    #[error("initData signature is invalid")]
    InvalidSignature,

    /// `auth_date` is absent or not a Unix timestamp while freshness is enforced
    #[error("initData auth_date is missing or invalid")]
    InvalidAuthDate,

    /// `auth_date` is outside the accepted window
    #[error("initData is stale: issued {age_secs}s ago")]
    Stale {
        /// Seconds between `auth_date` and now (negative when issued in the future)
        age_secs: i64,
    },

    /// Signature is valid but the user identity cannot be read
    #[error(transparent)]
    MalformedIdentity(#[from] MalformedIdentityError),
}

/// Invalid verifier configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The bot token is empty
    #[error("Telegram bot token is not configured")]
    MissingBotToken,
}
