use serde::{Deserialize, Serialize};

use crate::{error::MalformedIdentityError, fields::ParsedFields};

const USER_FIELD: &str = "user";
const USER_ID_FIELD: &str = "user[id]";
const USER_FIRST_NAME_FIELD: &str = "user[first_name]";
const USER_LAST_NAME_FIELD: &str = "user[last_name]";
const USER_USERNAME_FIELD: &str = "user[username]";

/// Telegram user who launched the Mini App
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Telegram user id
    pub telegram_id: i64,
    /// First name, empty when not shared
    pub first_name: String,
    /// Last name, empty when not shared
    pub last_name: String,
    /// Telegram `@username` without the `@`, empty when the user has none
    pub username: String,
}

/// `user` object as Telegram serializes it in `initData`
#[derive(Deserialize)]
struct WebAppUser {
    id: i64,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    username: String,
}

impl From<WebAppUser> for UserIdentity {
    fn from(user: WebAppUser) -> Self {
        Self {
            telegram_id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
        }
    }
}

impl UserIdentity {
    /// Reads the identity from already decoded fields.
    ///
    /// Bracket notation (`user[id]`, `user[first_name]`, ...) takes precedence. When
    /// `user[id]` is absent, a JSON `user` object is used instead.
    ///
    /// # Errors
    ///
    /// Returns `MalformedIdentityError` if no user id can be found or it is not an integer
    pub fn from_fields(fields: &ParsedFields) -> Result<Self, MalformedIdentityError> {
        if let Some(raw_id) = fields.get(USER_ID_FIELD) {
            let telegram_id = raw_id
                .trim()
                .parse::<i64>()
                .map_err(|_| MalformedIdentityError::InvalidUserId(raw_id.to_string()))?;

            let text = |key: &str| fields.get(key).unwrap_or_default().to_string();

            return Ok(Self {
                telegram_id,
                first_name: text(USER_FIRST_NAME_FIELD),
                last_name: text(USER_LAST_NAME_FIELD),
                username: text(USER_USERNAME_FIELD),
            });
        }

        let user_json = fields
            .get(USER_FIELD)
            .ok_or(MalformedIdentityError::MissingUserId)?;

        let user: serde_json::Value = serde_json::from_str(user_json)
            .map_err(|e| MalformedIdentityError::InvalidUserObject(e.to_string()))?;
        if !user.is_object() {
            return Err(MalformedIdentityError::InvalidUserObject(
                "user is not a JSON object".to_string(),
            ));
        }

        serde_json::from_value::<WebAppUser>(user)
            .map(Self::from)
            .map_err(|e| MalformedIdentityError::InvalidUserObject(e.to_string()))
    }
}

/// Extracts the user identity from a raw `initData` string.
///
/// Does not check the signature: callers must have validated the same payload first.
///
/// # Errors
///
/// Returns `MalformedIdentityError` if the user id is missing or not an integer
pub fn extract_identity(raw_init_data: &str) -> Result<UserIdentity, MalformedIdentityError> {
    UserIdentity::from_fields(&ParsedFields::parse(raw_init_data))
}
