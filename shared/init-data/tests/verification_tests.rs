use pretty_assertions::assert_eq;
use telegram_init_data::{
    extract_identity, testing::sign_init_data, validate, InitDataVerifier,
    MalformedIdentityError, UserIdentity,
};

const BOT_TOKEN: &str = "TEST:TOKEN";

const FIELDS: [(&str, &str); 5] = [
    ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
    ("auth_date", "1700000000"),
    ("user[id]", "123"),
    ("user[first_name]", "Ann"),
    ("user[username]", "ann_lee"),
];

#[test]
fn test_signed_bracket_payload_validates_and_extracts() {
    let raw = sign_init_data(&[("user[id]", "123"), ("user[first_name]", "Ann")], BOT_TOKEN);

    assert!(validate(&raw, BOT_TOKEN));
    assert_eq!(
        extract_identity(&raw).unwrap(),
        UserIdentity {
            telegram_id: 123,
            first_name: "Ann".to_string(),
            last_name: String::new(),
            username: String::new(),
        }
    );
}

#[test]
fn test_signed_json_user_payload() {
    let raw = sign_init_data(
        &[
            ("user", r#"{"id":123,"first_name":"Ann","last_name":"Lee"}"#),
            ("auth_date", "1700000000"),
        ],
        BOT_TOKEN,
    );

    assert!(validate(&raw, BOT_TOKEN));

    let identity = InitDataVerifier::new(BOT_TOKEN)
        .unwrap()
        .authenticate(&raw)
        .unwrap();
    assert_eq!(identity.telegram_id, 123);
    assert_eq!(identity.last_name, "Lee");
}

#[test]
fn test_any_single_character_change_invalidates() {
    for (index, (key, value)) in FIELDS.iter().enumerate() {
        for position in 0..value.len() {
            let mut altered_value = value.to_string().into_bytes();
            altered_value[position] = if altered_value[position] == b'x' {
                b'y'
            } else {
                b'x'
            };
            let altered_value = String::from_utf8(altered_value).unwrap();

            // Sign the original fields, then swap in the altered value
            let original = sign_init_data(&FIELDS, BOT_TOKEN);
            let hash = original.rsplit_once("hash=").unwrap().1;

            let mut altered_fields = FIELDS.to_vec();
            altered_fields[index] = (*key, altered_value.as_str());
            let altered = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(altered_fields)
                .append_pair("hash", hash)
                .finish();

            assert!(
                !validate(&altered, BOT_TOKEN),
                "changing {key} at {position} must invalidate the payload"
            );
        }
    }
}

#[test]
fn test_any_single_key_change_invalidates() {
    let original = sign_init_data(&FIELDS, BOT_TOKEN);
    let hash = original.rsplit_once("hash=").unwrap().1;

    for (index, (key, _)) in FIELDS.iter().enumerate() {
        for position in 0..key.len() {
            let mut altered_key = key.to_string().into_bytes();
            altered_key[position] = if altered_key[position] == b'f' {
                b'g'
            } else {
                b'f'
            };
            let altered_key = String::from_utf8(altered_key).unwrap();

            let mut altered_fields = FIELDS.to_vec();
            altered_fields[index] = (altered_key.as_str(), FIELDS[index].1);
            let altered = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(altered_fields)
                .append_pair("hash", hash)
                .finish();

            assert!(
                !validate(&altered, BOT_TOKEN),
                "renaming {key} to {altered_key} must invalidate the payload"
            );
        }
    }

    // e.g. user[first_name] -> user[first_namf]
    let renamed = original.replacen("first_name", "first_namf", 1);
    assert_ne!(renamed, original);
    assert!(!validate(&renamed, BOT_TOKEN));
}

#[test]
fn test_field_order_does_not_matter() {
    let raw = sign_init_data(&FIELDS, BOT_TOKEN);
    let hash = raw.rsplit_once("hash=").unwrap().1;

    let mut reversed = FIELDS.to_vec();
    reversed.reverse();
    let reordered = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("hash", hash)
        .extend_pairs(reversed)
        .finish();

    assert!(validate(&reordered, BOT_TOKEN));
}

#[test]
fn test_removed_hash_is_rejected() {
    let raw = sign_init_data(&FIELDS, BOT_TOKEN);
    let without_hash = raw.rsplit_once("&hash=").unwrap().0;

    assert!(!validate(without_hash, BOT_TOKEN));
}

#[test]
fn test_changing_bot_token_flips_result() {
    let raw = sign_init_data(&FIELDS, BOT_TOKEN);

    assert!(validate(&raw, BOT_TOKEN));
    assert!(!validate(&raw, "TEST:TOKEN2"));
    assert!(!InitDataVerifier::new("TEST:OTHER").unwrap().validate(&raw));
}

#[test]
fn test_malformed_query_strings_are_rejected() {
    let inputs = [
        String::new(),
        "=".to_string(),
        "=====".to_string(),
        "hash==".to_string(),
        "a=b=c&hash=deadbeef".to_string(),
        "%FF%FE=%00&hash=%".to_string(),
        "hash=".to_string() + &"0".repeat(64),
    ];

    let verifier = InitDataVerifier::new(BOT_TOKEN).unwrap();
    for raw in &inputs {
        assert!(!validate(raw, BOT_TOKEN), "{raw:?}");
        assert!(!verifier.validate(raw), "{raw:?}");
    }
}

#[test]
fn test_extract_identity_without_user_id() {
    let raw = sign_init_data(&[("user[first_name]", "Ann")], BOT_TOKEN);

    assert!(validate(&raw, BOT_TOKEN));
    assert_eq!(
        extract_identity(&raw),
        Err(MalformedIdentityError::MissingUserId)
    );
}
