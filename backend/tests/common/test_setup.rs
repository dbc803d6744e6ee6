use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use backend_storage::user_account::InMemoryUserAccountStore;
use mini_app_backend::{server, types::Environment};
use telegram_init_data::InitDataVerifier;
use tower::ServiceExt;

use super::TEST_BOT_TOKEN;

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router backed by an in-memory account store
pub struct TestSetup {
    pub router: Router,
    pub user_accounts: Arc<InMemoryUserAccountStore>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_environment(Environment::Development)
    }

    pub fn with_environment(environment: Environment) -> Self {
        let verifier = InitDataVerifier::new(TEST_BOT_TOKEN).expect("Invalid test bot token");
        Self::build(environment, verifier)
    }

    /// Test setup rejecting init data older than `max_auth_age`
    pub fn with_max_auth_age(max_auth_age: std::time::Duration) -> Self {
        let verifier = InitDataVerifier::new(TEST_BOT_TOKEN)
            .expect("Invalid test bot token")
            .with_max_auth_age(max_auth_age);
        Self::build(Environment::Development, verifier)
    }

    fn build(environment: Environment, verifier: InitDataVerifier) -> Self {
        setup_test_env();

        let user_accounts = Arc::new(InMemoryUserAccountStore::new());
        let router = server::router(environment, Arc::new(verifier), user_accounts.clone());

        Self {
            router,
            user_accounts,
        }
    }

    pub async fn send_get_request(
        &self,
        route: &str,
        init_data: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method("GET");
        if let Some(init_data) = init_data {
            builder = builder.header("Authorization", format!("tma {init_data}"));
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::empty())?)
            .await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        init_data: Option<&str>,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_raw_post_request(
            route,
            init_data,
            Some("application/json"),
            payload.to_string(),
        )
        .await
    }

    pub async fn send_raw_post_request(
        &self,
        route: &str,
        init_data: Option<&str>,
        content_type: Option<&str>,
        body: String,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method("POST");
        if let Some(init_data) = init_data {
            builder = builder.header("Authorization", format!("tma {init_data}"));
        }
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::from(body))?)
            .await?;
        Ok(response)
    }

    pub async fn parse_response_body(
        &self,
        response: Response,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        use http_body_util::BodyExt;

        let body = response.into_body().collect().await?.to_bytes();
        let json = serde_json::from_slice(&body)?;
        Ok(json)
    }
}
