use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Form, Json};

use super::{error_response, AppState};
use crate::adapter::cookie::{build_clear_cookie, API_KEY_COOKIE_NAME, CSRF_COOKIE_NAME};
use crate::domain::entity::principal::Principal;
use crate::usecase::{LoginInput, RefreshInput};

#[utoipa::path(
    post,
    path = "/token",
    request_body(content = LoginInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access and refresh tokens issued", body = crate::usecase::TokenPair),
        (status = 401, description = "Incorrect username or password"),
        (status = 404, description = "Login is not available on this server"),
    )
)]
pub async fn login(State(state): State<AppState>, Form(input): Form<LoginInput>) -> Response {
    match state.login_uc.execute(&input).await {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/token/refresh",
    request_body = RefreshInput,
    responses(
        (status = 200, description = "Rotated refresh token and new access token", body = crate::usecase::TokenPair),
        (status = 401, description = "Refresh token invalid or session expired"),
    )
)]
pub async fn refresh(State(state): State<AppState>, Json(input): Json<RefreshInput>) -> Response {
    match state.refresh_uc.execute(&input) {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(e) => error_response(e),
    }
}

/// ステートレスな logout。発行済みトークンは失効させず、cookie のみクリアする。
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "API key and CSRF cookies cleared"),
    )
)]
pub async fn logout() -> Response {
    let mut response = (StatusCode::OK, Json(serde_json::json!({}))).into_response();
    for name in [API_KEY_COOKIE_NAME, CSRF_COOKIE_NAME] {
        if let Ok(value) = HeaderValue::from_str(&build_clear_cookie(name)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

#[utoipa::path(
    get,
    path = "/whoami",
    responses(
        (status = 200, description = "Resolved principal", body = Principal),
        (status = 401, description = "Could not resolve a principal"),
    )
)]
pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(principal)
}
