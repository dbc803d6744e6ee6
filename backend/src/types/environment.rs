//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use anyhow::{bail, Context};
use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// Defaults to development when `APP_ENV` is not set.
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// Telegram bot token used to verify Mini App launch data
    ///
    /// # Errors
    ///
    /// Returns an error if `BOT_TOKEN` is not set, in every environment
    pub fn bot_token() -> anyhow::Result<String> {
        env::var("BOT_TOKEN").context("BOT_TOKEN environment variable is not set")
    }

    /// Maximum accepted age of `auth_date`, if the freshness check is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if `INIT_DATA_MAX_AGE_SECS` is set but is not a positive
    /// number of seconds
    pub fn init_data_max_age() -> anyhow::Result<Option<Duration>> {
        let Ok(value) = env::var("INIT_DATA_MAX_AGE_SECS") else {
            return Ok(None);
        };

        let secs = value
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid INIT_DATA_MAX_AGE_SECS: {value}"))?;
        if secs == 0 {
            bail!("INIT_DATA_MAX_AGE_SECS must be greater than zero");
        }

        Ok(Some(Duration::from_secs(secs)))
    }

    /// Returns the Dynamo DB table name for user accounts
    ///
    /// # Errors
    ///
    /// Returns an error outside development if `DYNAMODB_USERS_TABLE_NAME` is not set
    pub fn users_table_name(&self) -> anyhow::Result<String> {
        self.dynamodb_name("DYNAMODB_USERS_TABLE_NAME", "mini-app-users")
    }

    /// Returns the name of the users GSI keyed by username
    ///
    /// # Errors
    ///
    /// Returns an error outside development if `DYNAMODB_USERS_USERNAME_GSI` is not set
    pub fn users_username_index_name(&self) -> anyhow::Result<String> {
        self.dynamodb_name("DYNAMODB_USERS_USERNAME_GSI", "username-index")
    }

    /// Returns the name of the users GSI keyed by email
    ///
    /// # Errors
    ///
    /// Returns an error outside development if `DYNAMODB_USERS_EMAIL_GSI` is not set
    pub fn users_email_index_name(&self) -> anyhow::Result<String> {
        self.dynamodb_name("DYNAMODB_USERS_EMAIL_GSI", "email-index")
    }

    fn dynamodb_name(&self, variable: &str, development_default: &str) -> anyhow::Result<String> {
        match self {
            Self::Production | Self::Staging => env::var(variable)
                .with_context(|| format!("{variable} environment variable is not set")),
            Self::Development => {
                Ok(env::var(variable).unwrap_or_else(|_| development_default.to_string()))
            }
        }
    }
}
