use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use crate::adapter::cookie::{build_set_cookie, CookieOptions, API_KEY_COOKIE_NAME};
use crate::adapter::handler::{error_response, AppState};
use crate::usecase::{ApiKeyChannels, Credentials};

/// single-user API キーのクエリパラメータ名。
pub const API_KEY_QUERY_PARAMETER: &str = "api_key";
/// single-user API キーのヘッダー名。
pub const API_KEY_HEADER_NAME: &str = "x-tiled-api-key";

/// Authorization ヘッダーから Bearer トークンを取り出すヘルパー。
/// 成功した場合はトークン文字列を返す。ヘッダーがない・形式が違う場合は None を返す。
pub fn extract_bearer_token(req: &Request) -> Option<String> {
    let auth_header = req.headers().get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Cookie ヘッダーから指定名の値を取り出すヘルパー。
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// クエリ文字列から指定名のパラメータを取り出すヘルパー。
fn extract_query_param(query: Option<&str>, name: &str) -> Option<String> {
    let query = query?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == name {
            urlencoding::decode(value).ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// principal_middleware は提示された資格情報から認証済み主体を解決し、
/// Request extension に `Principal` を格納する axum ミドルウェア。
/// 解決に失敗した場合は 401 を返す。API キーが cookie 以外のチャネルで
/// 届いた場合は、レスポンスに API キー cookie を設定する。
pub async fn principal_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let credentials = Credentials {
        bearer_token: extract_bearer_token(&req),
        api_key: ApiKeyChannels {
            query: extract_query_param(req.uri().query(), API_KEY_QUERY_PARAMETER),
            header: req
                .headers()
                .get(API_KEY_HEADER_NAME)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            cookie: extract_cookie(req.headers(), API_KEY_COOKIE_NAME),
        },
    };

    let resolution = match state.resolve_principal_uc.execute(&credentials) {
        Ok(resolution) => resolution,
        Err(e) => return error_response(e),
    };

    req.extensions_mut().insert(resolution.principal.clone());
    let mut response = next.run(req).await;

    if resolution.set_api_key_cookie {
        if let Some(key) = &state.single_user_api_key {
            let cookie = build_set_cookie(API_KEY_COOKIE_NAME, key, &CookieOptions::default());
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
    }

    response
}
