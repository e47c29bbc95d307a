use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::domain::entity::principal::Principal;
use crate::error::AuthError;
use crate::infrastructure::TokenCodec;

/// ApiKeyChannels は single-user API キーの 3 つの搬送チャネルを表す。
/// 優先順位は query → header → cookie で固定。
#[derive(Debug, Clone, Default)]
pub struct ApiKeyChannels {
    pub query: Option<String>,
    pub header: Option<String>,
    pub cookie: Option<String>,
}

/// Credentials は 1 リクエストで同時に観測される資格情報の集合。
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub bearer_token: Option<String>,
    pub api_key: ApiKeyChannels,
}

/// Resolution は主体解決の結果。`set_api_key_cookie` が真の場合、
/// レスポンスに API キー cookie を設定する（以後のリクエストが
/// cookie チャネルを透過的に使えるようにする）。
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub principal: Principal,
    pub set_api_key_cookie: bool,
}

/// ResolvePrincipalUseCase は保護リソースへのリクエストごとに、
/// 提示された資格情報から認証済み主体を決定する。
pub struct ResolvePrincipalUseCase {
    codec: Arc<TokenCodec>,
    single_user_api_key: Option<String>,
    allow_anonymous_access: bool,
    /// authenticator が構成されているか。single-user モード判定に使う。
    login_enabled: bool,
}

impl ResolvePrincipalUseCase {
    pub fn new(
        codec: Arc<TokenCodec>,
        single_user_api_key: Option<String>,
        allow_anonymous_access: bool,
        login_enabled: bool,
    ) -> Self {
        Self {
            codec,
            single_user_api_key,
            allow_anonymous_access,
            login_enabled,
        }
    }

    pub fn execute(&self, credentials: &Credentials) -> Result<Resolution, AuthError> {
        // キー不一致はチャネルの如何を問わずここで終端する（欠落とは区別する）
        let api_key_valid = self.check_single_user_api_key(&credentials.api_key)?;

        if !self.login_enabled && api_key_valid {
            // cookie チャネル以外で届いた場合は cookie の設定を予約する
            let cookie_is_current = match (&credentials.api_key.cookie, &self.single_user_api_key) {
                (Some(presented), Some(configured)) => constant_time_eq(presented, configured),
                _ => false,
            };
            return Ok(Resolution {
                principal: Principal::Admin,
                set_api_key_cookie: !cookie_is_current,
            });
        }

        let Some(token) = credentials.bearer_token.as_deref() else {
            if self.allow_anonymous_access {
                return Ok(Resolution {
                    principal: Principal::Public,
                    set_api_key_cookie: false,
                });
            }
            return Err(AuthError::NotAuthenticated);
        };

        let claims = self.codec.decode_access(token)?;
        Ok(Resolution {
            principal: Principal::Named(claims.sub),
            set_api_key_cookie: false,
        })
    }

    /// 優先順位 {query, header, cookie} の最初に存在する値だけを照合する。
    /// 不一致は即座に `InvalidApiKey`（後続チャネルへのフォールバックはしない）。
    fn check_single_user_api_key(&self, channels: &ApiKeyChannels) -> Result<bool, AuthError> {
        let presented = [&channels.query, &channels.header, &channels.cookie]
            .into_iter()
            .flatten()
            .next();
        let Some(presented) = presented else {
            return Ok(false);
        };
        let Some(configured) = &self.single_user_api_key else {
            return Err(AuthError::InvalidApiKey);
        };
        if constant_time_eq(presented, configured) {
            Ok(true)
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
