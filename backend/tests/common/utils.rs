use chrono::Utc;
use telegram_init_data::testing::sign_init_data;

/// Bot token every test router is configured with
pub const TEST_BOT_TOKEN: &str = "TEST:TOKEN";

/// Signed init data for a Telegram user, in bracket notation
pub fn init_data_for(telegram_id: i64, first_name: &str, username: &str) -> String {
    let auth_date = Utc::now().timestamp().to_string();
    let telegram_id = telegram_id.to_string();

    sign_init_data(
        &[
            ("auth_date", auth_date.as_str()),
            ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
            ("user[id]", telegram_id.as_str()),
            ("user[first_name]", first_name),
            ("user[username]", username),
        ],
        TEST_BOT_TOKEN,
    )
}

/// Signed init data with an explicit `auth_date`
pub fn init_data_with_auth_date(telegram_id: i64, auth_date: i64) -> String {
    let auth_date = auth_date.to_string();
    let telegram_id = telegram_id.to_string();

    sign_init_data(
        &[
            ("auth_date", auth_date.as_str()),
            ("user[id]", telegram_id.as_str()),
        ],
        TEST_BOT_TOKEN,
    )
}

/// Signed init data carrying the `user` field as JSON, as Telegram clients send it
pub fn json_init_data_for(telegram_id: i64, first_name: &str) -> String {
    let auth_date = Utc::now().timestamp().to_string();
    let user = serde_json::json!({
        "id": telegram_id,
        "first_name": first_name,
        "language_code": "en",
    })
    .to_string();

    sign_init_data(
        &[("auth_date", auth_date.as_str()), ("user", user.as_str())],
        TEST_BOT_TOKEN,
    )
}

/// Replaces the first character of the signed `user[first_name]` value
pub fn tamper(init_data: &str) -> String {
    init_data.replacen("user%5Bfirst_name%5D=", "user%5Bfirst_name%5D=X", 1)
}

/// Query string passing init data through the `initData` parameter
pub fn init_data_query(init_data: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("initData", init_data)
        .finish()
}
