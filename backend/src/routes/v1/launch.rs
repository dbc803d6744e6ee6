use std::sync::Arc;

use axum::{Extension, Json};
use backend_storage::user_account::UserAccountStore;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::instrument;

use super::profile::ProfileResponse;
use crate::{middleware::TelegramUser, types::AppError};

/// What the Mini App should show after launch
#[derive(Debug, Serialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LaunchResponse {
    /// The Telegram user already has an account
    Registered {
        /// Stored profile
        profile: ProfileResponse,
    },
    /// The Telegram user must register first
    RegistrationRequired {
        /// Values to pre-fill the registration form with
        prefill: RegistrationPrefill,
    },
}

/// Registration form values taken from verified launch data
#[derive(Debug, Serialize, JsonSchema)]
pub struct RegistrationPrefill {
    /// Telegram user id
    pub telegram_id: i64,
    /// Telegram `@username`, empty if none
    pub telegram_username: String,
    /// First name reported by Telegram
    pub first_name: String,
}

/// Resolve the Mini App launch
///
/// Looks up the account of the Telegram user who opened the Mini App. Returns
/// the stored profile, or the data needed to render the registration form.
///
/// # Errors
///
/// - `401 UNAUTHORIZED` - Missing or invalid init data
/// - `503 SERVICE_UNAVAILABLE` - Account lookup failed
#[instrument(skip_all, fields(telegram_id = user.identity.telegram_id))]
pub async fn launch(
    Extension(user_accounts): Extension<Arc<dyn UserAccountStore>>,
    user: TelegramUser,
) -> Result<Json<LaunchResponse>, AppError> {
    let account = user_accounts
        .get_by_telegram_id(user.identity.telegram_id)
        .await?;

    let response = match account {
        Some(account) => LaunchResponse::Registered {
            profile: account.into(),
        },
        None => {
            tracing::info!("Telegram user has no account yet");
            LaunchResponse::RegistrationRequired {
                prefill: RegistrationPrefill {
                    telegram_id: user.identity.telegram_id,
                    telegram_username: user.identity.username,
                    first_name: user.identity.first_name,
                },
            }
        }
    };

    Ok(Json(response))
}
