use url::form_urlencoded;

use crate::{
    fields::{ParsedFields, HASH_FIELD},
    verifier::{derive_secret_key, sign},
};

/// Builds a URL-encoded `initData` string signed for `bot_token`, the way a
/// Telegram client would send it. The `hash` field is appended last.
///
/// # Panics
///
/// Panics if `bot_token` is blank
#[must_use]
pub fn sign_init_data(pairs: &[(&str, &str)], bot_token: &str) -> String {
    let fields: ParsedFields = pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();

    let secret_key = derive_secret_key(bot_token).expect("bot token must not be blank");
    let hash = sign(&secret_key, &fields.data_check_string()).expect("HMAC accepts any key");

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(pairs.iter().copied());
    serializer.append_pair(HASH_FIELD, &hash);
    serializer.finish()
}
