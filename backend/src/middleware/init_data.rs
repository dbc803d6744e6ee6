use std::sync::Arc;

use aide::OperationIo;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};
use telegram_init_data::{InitDataVerifier, UserIdentity};

use crate::types::AppError;

/// Authorization scheme Telegram Mini Apps use to forward launch data
const AUTHORIZATION_SCHEME: &str = "tma ";

/// Query parameter carrying launch data when the Mini App opens a link
const INIT_DATA_QUERY_PARAM: &str = "initData";

/// Telegram user authenticated from verified launch data
#[derive(Debug, Clone, OperationIo)]
pub struct TelegramUser {
    /// Identity read from the signed `user` field
    pub identity: UserIdentity,
}

impl From<UserIdentity> for TelegramUser {
    fn from(identity: UserIdentity) -> Self {
        Self { identity }
    }
}

/// Axum extractor for the authenticated Telegram user
///
/// Only available on routes behind [`init_data_middleware`]:
/// ```ignore
/// async fn protected_handler(
///     user: TelegramUser,
///     // ... other extractors
/// ) -> Result<impl IntoResponse, AppError> {
///     Ok(user.identity.telegram_id.to_string())
/// }
/// ```
impl<S> FromRequestParts<S> for TelegramUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            AppError::new(
                StatusCode::UNAUTHORIZED,
                "missing_init_data",
                "Authentication required but user not found in request extensions",
                false,
            )
        })
    }
}

/// Telegram launch data authentication middleware
///
/// This middleware:
/// 1. Reads the raw init data from `Authorization: tma <initData>`, falling
///    back to the `initData` query parameter
/// 2. Verifies its signature (and `auth_date`, when a max age is configured)
///    with the shared `InitDataVerifier`
/// 3. Adds `TelegramUser` to request extensions
///
/// # Errors
///
/// - `401 missing_init_data` - No init data in the request
/// - `401 invalid_init_data` - Signature or `auth_date` check failed
/// - `400 malformed_identity` - Signed data without a usable `user`
pub async fn init_data_middleware(
    Extension(verifier): Extension<Arc<InitDataVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let raw_init_data = raw_init_data(&request).ok_or_else(|| {
        AppError::new(
            StatusCode::UNAUTHORIZED,
            "missing_init_data",
            "Telegram init data must be sent as `Authorization: tma <initData>`",
            false,
        )
    })?;

    let identity = verifier.authenticate(&raw_init_data)?;
    tracing::debug!(telegram_id = identity.telegram_id, "Authenticated Telegram user");

    request.extensions_mut().insert(TelegramUser::from(identity));

    Ok(next.run(request).await)
}

/// Raw init data from the authorization header or the query string
fn raw_init_data(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix(AUTHORIZATION_SCHEME))
        .map(str::trim)
        .map(ToString::to_string);

    from_header
        .or_else(|| {
            let query = request.uri().query()?;
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == INIT_DATA_QUERY_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|raw| !raw.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use pretty_assertions::assert_eq;

    fn request(uri: &str, authorization: Option<&str>) -> Request {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_raw_init_data_from_header() {
        let request = request("/v1/launch", Some("tma auth_date=1&hash=abc"));
        assert_eq!(
            raw_init_data(&request).as_deref(),
            Some("auth_date=1&hash=abc")
        );
    }

    #[test]
    fn test_raw_init_data_from_query() {
        let request = request("/v1/launch?initData=auth_date%3D1%26hash%3Dabc", None);
        assert_eq!(
            raw_init_data(&request).as_deref(),
            Some("auth_date=1&hash=abc")
        );
    }

    #[test]
    fn test_header_takes_precedence_over_query() {
        let request = request(
            "/v1/launch?initData=from_query%3D1",
            Some("tma from_header=1"),
        );
        assert_eq!(raw_init_data(&request).as_deref(), Some("from_header=1"));
    }

    #[test]
    fn test_raw_init_data_missing() {
        assert_eq!(raw_init_data(&request("/v1/launch", None)), None);
        assert_eq!(
            raw_init_data(&request("/v1/launch", Some("Bearer token"))),
            None
        );
        assert_eq!(raw_init_data(&request("/v1/launch", Some("tma "))), None);
        assert_eq!(raw_init_data(&request("/v1/launch?initData=", None)), None);
    }
}
