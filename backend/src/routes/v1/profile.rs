use backend_storage::user_account::UserAccount;
use schemars::JsonSchema;
use serde::Serialize;

/// Profile of a registered Mini App user
#[derive(Debug, Serialize, JsonSchema)]
pub struct ProfileResponse {
    /// Telegram user id
    pub telegram_id: i64,
    /// Username chosen at registration
    pub username: String,
    /// Email address, lowercased
    pub email: String,
    /// First name reported by Telegram at registration
    pub first_name: String,
    /// Last name reported by Telegram at registration
    pub last_name: String,
    /// Telegram `@username` at registration, empty if none
    pub telegram_username: String,
    /// Registration Unix timestamp in seconds
    pub created_at: i64,
}

impl From<UserAccount> for ProfileResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            telegram_id: account.telegram_id,
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            telegram_username: account.telegram_username,
            created_at: account.created_at,
        }
    }
}
