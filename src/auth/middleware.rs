//! Shared state and Axum extractors for authentication.

use crate::auth::cookie::session_token;
use crate::auth::token::{Claims, TokenSigner};
use crate::config::Config;
use crate::error::AppError;
use crate::storage::Store;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: Arc<TokenSigner>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        AppState {
            store,
            tokens: Arc::new(TokenSigner::new(config.jwt_secret.as_bytes())),
            config: Arc::new(config),
        }
    }
}

/// The session resolved for this request, attached by the route gate.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Claims>);

impl CurrentSession {
    /// Use the gate's result when present, otherwise read the cookie directly.
    fn resolve(parts: &Parts, state: &AppState) -> Option<Claims> {
        if let Some(CurrentSession(claims)) = parts.extensions.get::<CurrentSession>() {
            return claims.clone();
        }

        let jar = CookieJar::from_headers(&parts.headers);
        session_token(&jar).and_then(|token| state.tokens.verify(&token))
    }
}

/// Authenticated user extractor.
///
/// Returns 401 Unauthorized if the session cookie is missing, invalid or expired.
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        CurrentSession::resolve(parts, state)
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))
    }
}

/// `Option<AuthUser>`: never rejects, `None` without a valid session.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(CurrentSession::resolve(parts, state).map(AuthUser))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::password::HashCost;
    use crate::auth::token::Identity;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    /// State that never touches Redis unless a handler asks for a connection.
    pub(crate) fn test_state() -> AppState {
        let config = Config {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_secret_is_fallback: false,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            production: false,
            static_dir: "static".into(),
            max_upload_bytes: 5 * 1024 * 1024,
            hash_cost: HashCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        };
        let store = Store::open(&config.redis_url).unwrap();
        AppState::new(store, config)
    }

    pub(crate) fn alice() -> Identity {
        Identity {
            user_id: 1,
            email: "a@x.com".to_string(),
            name: "Alice".to_string(),
        }
    }

    async fn whoami(AuthUser(claims): AuthUser) -> String {
        claims.identity.email
    }

    async fn maybe(user: Option<AuthUser>) -> &'static str {
        if user.is_some() {
            "signed-in"
        } else {
            "anonymous"
        }
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/maybe", get(maybe))
            .with_state(state)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_auth_user_from_cookie() {
        let state = test_state();
        let token = state.tokens.issue(&alice()).unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("cookie", format!("vendorify_token={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "a@x.com");
    }

    #[tokio::test]
    async fn test_auth_user_missing_cookie_is_401() {
        let response = app(test_state())
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_auth_user_bad_token_is_401() {
        let response = app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("cookie", "vendorify_token=forged.token.value")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_user_prefers_gate_session() {
        let state = test_state();
        let mut request = Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();
        let claims = Claims {
            identity: alice(),
            iat: 0,
            exp: u64::MAX,
        };
        request
            .extensions_mut()
            .insert(CurrentSession(Some(claims)));

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_optional_auth_user() {
        let state = test_state();
        let token = state.tokens.issue(&alice()).unwrap();

        let anonymous = app(state.clone())
            .oneshot(Request::builder().uri("/maybe").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_text(anonymous).await, "anonymous");

        let signed_in = app(state)
            .oneshot(
                Request::builder()
                    .uri("/maybe")
                    .header("cookie", format!("vendorify_token={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_text(signed_in).await, "signed-in");
    }
}
