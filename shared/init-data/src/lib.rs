//! Telegram Mini App `initData` verification
//!
//! Telegram signs the launch payload of a Mini App with a key derived from the
//! bot token. This crate checks that signature and extracts the identity of the
//! user who opened the app.
//!
//! The flow is:
//! 1. Decode the raw query string into [`ParsedFields`]
//! 2. Build the data-check string (every field except `hash`, sorted, `\n` joined)
//! 3. `secret_key = HMAC_SHA256(key = "WebAppData", msg = bot_token)`
//! 4. Compare `hex(HMAC_SHA256(key = secret_key, msg = data_check_string))` with `hash`
//!
//! [Telegram docs](https://core.telegram.org/bots/webapps#validating-data-received-via-the-mini-app)

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Error types
mod error;

/// Query-string decoding and the data-check string
mod fields;

/// User identity extraction
mod identity;

/// Signature verification
mod verifier;

/// Helpers for producing signed `initData` in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{ConfigError, InitDataError, MalformedIdentityError};
pub use fields::ParsedFields;
pub use identity::{extract_identity, UserIdentity};
pub use verifier::{validate, InitDataVerifier};
