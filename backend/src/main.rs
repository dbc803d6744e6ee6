use std::sync::Arc;

use anyhow::Context;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use backend_storage::user_account::UserAccountStorage;
use mini_app_backend::{server, types::Environment};
use telegram_init_data::InitDataVerifier;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let environment = Environment::from_env();

    // Configure logging format based on environment
    // Use JSON format for staging/production (Datadog), regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    let mut verifier = InitDataVerifier::new(&Environment::bot_token()?)
        .context("Invalid Telegram bot configuration")?;
    if let Some(max_age) = Environment::init_data_max_age()? {
        tracing::info!("Rejecting init data older than {}s", max_age.as_secs());
        verifier = verifier.with_max_auth_age(max_age);
    }

    let dynamodb_client = Arc::new(DynamoDbClient::new(&environment.aws_config().await));
    let user_account_storage = Arc::new(UserAccountStorage::new(
        dynamodb_client,
        environment.users_table_name()?,
        environment.users_username_index_name()?,
        environment.users_email_index_name()?,
    ));

    server::start(environment, Arc::new(verifier), user_account_storage).await
}
