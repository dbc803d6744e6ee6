use std::collections::BTreeMap;

/// Field carrying the signature, excluded from the data-check string
pub(crate) const HASH_FIELD: &str = "hash";

/// Decoded `initData` fields, ordered by key
///
/// Decoding follows `application/x-www-form-urlencoded` rules: pairs are split on
/// `&`, `+` becomes a space and percent escapes are decoded (invalid UTF-8 is
/// replaced). When a key repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields(BTreeMap<String, String>);

impl ParsedFields {
    /// Decodes a raw `initData` query string. Never fails: malformed pairs
    /// simply produce odd keys or empty values, which then fail the signature check.
    #[must_use]
    pub fn parse(raw_init_data: &str) -> Self {
        Self(
            url::form_urlencoded::parse(raw_init_data.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    /// Returns the decoded value of a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether any field has been decoded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `hash` field, if present
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.get(HASH_FIELD)
    }

    /// Builds the canonical message Telegram signs: every field except `hash`,
    /// in byte-wise key order, formatted as `key=value` and joined with `\n`.
    #[must_use]
    pub fn data_check_string(&self) -> String {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != HASH_FIELD)
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<(String, String)> for ParsedFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
