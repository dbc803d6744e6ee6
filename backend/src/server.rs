use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{Extension, Router};
use backend_storage::user_account::UserAccountStore;
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use telegram_init_data::InitDataVerifier;
use tokio::net::TcpListener;

use crate::{routes, types::Environment};

/// Builds the application router with its shared dependencies
///
/// Tracing and timeout layers are added by [`start`].
pub fn router(
    environment: Environment,
    verifier: Arc<InitDataVerifier>,
    user_accounts: Arc<dyn UserAccountStore>,
) -> Router {
    let mut openapi = OpenApi::default();

    routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(verifier))
        .layer(Extension(user_accounts))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    verifier: Arc<InitDataVerifier>,
    user_accounts: Arc<dyn UserAccountStore>,
) -> anyhow::Result<()> {
    let router = router(environment, verifier, user_accounts)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default())
        .layer(tower_http::timeout::TimeoutLayer::new(
            std::time::Duration::from_secs(5),
        ));

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Telegram Mini App Backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
