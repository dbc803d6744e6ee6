use std::fmt;
use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{
    error::{ConfigError, InitDataError},
    fields::ParsedFields,
    identity::UserIdentity,
};

type HmacSha256 = Hmac<Sha256>;

/// Key Telegram uses to derive the secret key from the bot token
const WEB_APP_DATA_KEY: &[u8] = b"WebAppData";

/// Length of a lowercase hex encoded SHA-256 digest
const HASH_HEX_LENGTH: usize = 64;

/// Tolerated clock drift for `auth_date` values slightly in the future
const MAX_CLOCK_SKEW_SECS: i64 = 60;

const AUTH_DATE_FIELD: &str = "auth_date";

/// Raw `HMAC_SHA256("WebAppData", bot_token)` output
type SecretKey = [u8; 32];

/// Verifies `initData` against a single bot token.
///
/// The secret key is derived once at construction and the bot token is not kept.
/// The verifier is immutable and can be shared freely between requests.
#[derive(Clone)]
pub struct InitDataVerifier {
    secret_key: SecretKey,
    max_auth_age: Option<Duration>,
}

impl fmt::Debug for InitDataVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitDataVerifier")
            .field("secret_key", &"<redacted>")
            .field("max_auth_age", &self.max_auth_age)
            .finish()
    }
}

impl InitDataVerifier {
    /// Creates a verifier for the given bot token
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingBotToken` if the token is empty or whitespace
    pub fn new(bot_token: &str) -> Result<Self, ConfigError> {
        let secret_key = derive_secret_key(bot_token).ok_or(ConfigError::MissingBotToken)?;

        Ok(Self {
            secret_key,
            max_auth_age: None,
        })
    }

    /// Rejects payloads whose `auth_date` is older than `max_age`.
    ///
    /// Off by default: Telegram does not require it and stale launch data is
    /// otherwise accepted.
    #[must_use]
    pub const fn with_max_auth_age(mut self, max_age: Duration) -> Self {
        self.max_auth_age = Some(max_age);
        self
    }

    /// Returns the configured maximum `auth_date` age, if any
    #[must_use]
    pub const fn max_auth_age(&self) -> Option<Duration> {
        self.max_auth_age
    }

    /// Returns whether the payload carries a valid signature for this bot.
    ///
    /// Never fails: any decoding problem or missing field yields `false`.
    #[must_use]
    pub fn validate(&self, raw_init_data: &str) -> bool {
        self.verify(&ParsedFields::parse(raw_init_data)).is_ok()
    }

    /// Validates the payload and then extracts the user identity from it
    ///
    /// # Errors
    ///
    /// - `InitDataError::MissingHash` / `InitDataError::InvalidSignature` - signature check failed
    /// - `InitDataError::InvalidAuthDate` / `InitDataError::Stale` - freshness check failed
    /// - `InitDataError::MalformedIdentity` - signed payload has no usable user id
    pub fn authenticate(&self, raw_init_data: &str) -> Result<UserIdentity, InitDataError> {
        let fields = ParsedFields::parse(raw_init_data);
        self.verify(&fields)?;

        Ok(UserIdentity::from_fields(&fields)?)
    }

    fn verify(&self, fields: &ParsedFields) -> Result<(), InitDataError> {
        check_signature(&self.secret_key, fields)?;

        if let Some(max_age) = self.max_auth_age {
            check_auth_date(fields, max_age, Utc::now().timestamp())?;
        }

        Ok(())
    }
}

/// Returns whether `raw_init_data` was signed for `bot_token`.
///
/// Total over all inputs: malformed data, a missing `hash` or an empty bot token
/// all yield `false`.
#[must_use]
pub fn validate(raw_init_data: &str, bot_token: &str) -> bool {
    derive_secret_key(bot_token).is_some_and(|secret_key| {
        check_signature(&secret_key, &ParsedFields::parse(raw_init_data)).is_ok()
    })
}

/// `HMAC_SHA256(key = "WebAppData", msg = bot_token)`, `None` for a blank token
pub(crate) fn derive_secret_key(bot_token: &str) -> Option<SecretKey> {
    if bot_token.trim().is_empty() {
        return None;
    }

    let mut mac = HmacSha256::new_from_slice(WEB_APP_DATA_KEY).ok()?;
    mac.update(bot_token.as_bytes());

    let mut secret_key = SecretKey::default();
    secret_key.copy_from_slice(&mac.finalize().into_bytes());
    Some(secret_key)
}

/// Lowercase hex `HMAC_SHA256(key = secret_key, msg = data_check_string)`
#[cfg(any(test, feature = "test-utils"))]
pub(crate) fn sign(secret_key: &SecretKey, data_check_string: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret_key).ok()?;
    mac.update(data_check_string.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn check_signature(secret_key: &SecretKey, fields: &ParsedFields) -> Result<(), InitDataError> {
    let received_hash = fields.hash().ok_or(InitDataError::MissingHash)?;

    // Only the exact lowercase hex form is accepted, the digest bytes are then
    // compared in constant time
    if received_hash.len() != HASH_HEX_LENGTH
        || !received_hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return Err(InitDataError::InvalidSignature);
    }
    let received_digest =
        hex::decode(received_hash).map_err(|_| InitDataError::InvalidSignature)?;

    let mut mac =
        HmacSha256::new_from_slice(secret_key).map_err(|_| InitDataError::InvalidSignature)?;
    mac.update(fields.data_check_string().as_bytes());

    mac.verify_slice(&received_digest)
        .map_err(|_| InitDataError::InvalidSignature)
}

fn check_auth_date(fields: &ParsedFields, max_age: Duration, now: i64) -> Result<(), InitDataError> {
    let auth_date = fields
        .get(AUTH_DATE_FIELD)
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or(InitDataError::InvalidAuthDate)?;

    let age_secs = now.saturating_sub(auth_date);
    let max_age_secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);

    if age_secs > max_age_secs || age_secs < -MAX_CLOCK_SKEW_SECS {
        return Err(InitDataError::Stale { age_secs });
    }

    Ok(())
}
