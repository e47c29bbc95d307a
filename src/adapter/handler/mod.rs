pub mod auth_handler;
pub mod health;

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Duration;

use crate::adapter::middleware::auth::principal_middleware;
use crate::error::AuthError;
use crate::infrastructure::config::AuthConfig;
use crate::infrastructure::{Authenticator, KeyRing, TokenCodec};
use crate::usecase::{LoginUseCase, RefreshTokensUseCase, ResolvePrincipalUseCase};

/// AppState はアプリケーション全体の共有状態を表す。
#[derive(Clone)]
pub struct AppState {
    pub login_uc: Arc<LoginUseCase>,
    pub refresh_uc: Arc<RefreshTokensUseCase>,
    pub resolve_principal_uc: Arc<ResolvePrincipalUseCase>,
    /// ミドルウェアが cookie 設定時に参照する。
    pub single_user_api_key: Option<String>,
}

impl AppState {
    /// 設定とデプロイメント供給の authenticator から全ユースケースを組み立てる。
    /// secret_keys が空の場合はエラー。
    pub fn new(
        authenticator: Option<Arc<dyn Authenticator>>,
        cfg: &AuthConfig,
    ) -> anyhow::Result<Self> {
        let codec = Arc::new(TokenCodec::new(KeyRing::new(&cfg.secret_keys)?));
        let access_max_age = Duration::seconds(cfg.access_token_max_age_seconds);
        let refresh_max_age = Duration::seconds(cfg.refresh_token_max_age_seconds);
        let session_max_age = cfg.session_max_age_seconds.map(Duration::seconds);
        let login_enabled = authenticator.is_some();

        Ok(Self {
            login_uc: Arc::new(LoginUseCase::new(
                authenticator,
                codec.clone(),
                access_max_age,
                refresh_max_age,
                cfg.allow_anonymous_access,
            )),
            refresh_uc: Arc::new(RefreshTokensUseCase::new(
                codec.clone(),
                access_max_age,
                refresh_max_age,
                session_max_age,
            )),
            resolve_principal_uc: Arc::new(ResolvePrincipalUseCase::new(
                codec,
                cfg.single_user_api_key.clone(),
                cfg.allow_anonymous_access,
                login_enabled,
            )),
            single_user_api_key: cfg.single_user_api_key.clone(),
        })
    }
}

/// Build the REST API router.
pub fn router(state: AppState) -> Router {
    // Protected routes: principal_middleware が資格情報を解決する
    let protected = Router::new()
        .route("/whoami", get(auth_handler::whoami))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            principal_middleware,
        ));

    // Public endpoints (no auth required)
    let public = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/token", post(auth_handler::login))
        .route("/token/refresh", post(auth_handler::refresh))
        .route("/logout", post(auth_handler::logout));

    Router::new().merge(protected).merge(public).with_state(state)
}

/// ErrorResponse は統一エラーレスポンス。
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub request_id: String,
    pub details: Vec<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                request_id: uuid::Uuid::new_v4().to_string(),
                details: vec![],
            },
        }
    }
}

/// AuthError を HTTP レスポンスへ写像する。401 には WWW-Authenticate を付与する。
pub fn error_response(err: AuthError) -> Response {
    let (status, code) = match &err {
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "AUTH_INVALID_CREDENTIALS"),
        AuthError::AccessTokenExpired => (StatusCode::UNAUTHORIZED, "AUTH_TOKEN_EXPIRED"),
        AuthError::SessionExpired => (StatusCode::UNAUTHORIZED, "AUTH_SESSION_EXPIRED"),
        AuthError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "AUTH_NOT_AUTHENTICATED"),
        AuthError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "AUTH_INVALID_API_KEY"),
        AuthError::IncorrectCredentials => {
            (StatusCode::UNAUTHORIZED, "AUTH_INCORRECT_CREDENTIALS")
        }
        AuthError::LoginUnavailable(_) => (StatusCode::NOT_FOUND, "AUTH_LOGIN_DISABLED"),
        AuthError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "AUTH_INVALID_INPUT"),
        AuthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_INTERNAL"),
    };

    let mut response =
        (status, Json(ErrorResponse::new(code, &err.to_string()))).into_response();
    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
}
