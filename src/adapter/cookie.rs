//! Set-Cookie ヘッダー値の組み立て。
//!
//! cookie の搬送機構そのものは HTTP 層の関心だが、「何を cookie に入れるか」
//! というポリシーはこのサービスが持つ。値の組み立てはここに集約する。

/// single-user API キーを保持する cookie 名。
pub const API_KEY_COOKIE_NAME: &str = "tiled_api_key";
/// CSRF トークンを保持する cookie 名。logout で API キーと共にクリアする。
pub const CSRF_COOKIE_NAME: &str = "tiled_csrf";

/// SameSite 属性。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// CookieOptions は Set-Cookie の属性を表す。
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: &'static str,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            path: "/",
        }
    }
}

/// Set-Cookie ヘッダー値を組み立てる。
pub fn build_set_cookie(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut cookie = format!("{}={}; Path={}", name, value, options.path);
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str("; SameSite=");
    cookie.push_str(options.same_site.as_str());
    cookie
}

/// cookie を削除する Set-Cookie ヘッダー値を組み立てる（Max-Age=0）。
pub fn build_clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly", name)
}
