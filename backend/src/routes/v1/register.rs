use std::sync::{Arc, LazyLock};

use axum::{http::StatusCode, Extension, Json};
use backend_storage::user_account::{UserAccountInsertRequest, UserAccountStore};
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::profile::ProfileResponse;
use crate::{
    middleware::TelegramUser,
    types::{AppError, ValidatedJson},
};

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,32}$").expect("Invalid regex"));

/// Request to register the launching Telegram user
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// 3 to 32 letters, digits or underscores
    #[validate(regex(path = *USERNAME_REGEX, message = "invalid_username"))]
    pub username: String,

    /// Contact email address
    #[validate(email(message = "invalid_email"))]
    pub email: String,
}

/// Register a new account
///
/// Creates the account of the Telegram user identified by the verified init
/// data. The Telegram id never comes from the request body.
///
/// # Returns
///
/// Returns `201 CREATED` with the new profile on success
///
/// # Errors
///
/// - `400 BAD_REQUEST` - Invalid username or email
/// - `401 UNAUTHORIZED` - Missing or invalid init data
/// - `409 CONFLICT` - Already registered, or username/email taken
/// - `503 SERVICE_UNAVAILABLE` - Database error
#[instrument(skip_all, fields(telegram_id = user.identity.telegram_id))]
pub async fn register(
    Extension(user_accounts): Extension<Arc<dyn UserAccountStore>>,
    user: TelegramUser,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    let identity = user.identity;

    if user_accounts
        .get_by_telegram_id(identity.telegram_id)
        .await?
        .is_some()
    {
        return Err(AppError::new(
            StatusCode::CONFLICT,
            "already_registered",
            "An account already exists for this Telegram user",
            false,
        ));
    }

    let email = payload.email.to_lowercase();
    if user_accounts
        .exists_by_username_or_email(&payload.username, &email)
        .await?
    {
        return Err(AppError::new(
            StatusCode::CONFLICT,
            "username_or_email_taken",
            "Username or email is already in use",
            false,
        ));
    }

    let account = user_accounts
        .insert(UserAccountInsertRequest {
            telegram_id: identity.telegram_id,
            username: payload.username,
            email,
            first_name: identity.first_name,
            last_name: identity.last_name,
            telegram_username: identity.username,
        })
        .await?;

    tracing::info!("Registered user account");

    Ok((StatusCode::CREATED, Json(account.into())))
}
