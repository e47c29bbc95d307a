use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entity::claims::AccessTokenClaims;
use crate::domain::service::session_policy;
use crate::error::AuthError;
use crate::infrastructure::TokenCodec;
use crate::usecase::login::TokenPair;

#[derive(Debug, Clone, serde::Deserialize, utoipa::ToSchema)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// RefreshTokensUseCase は提示されたリフレッシュトークンを検証し、
/// 同一チェーンの次のリフレッシュトークンと新しいアクセストークンを発行する。
pub struct RefreshTokensUseCase {
    codec: Arc<TokenCodec>,
    access_max_age: Duration,
    refresh_max_age: Duration,
    session_max_age: Option<Duration>,
}

impl RefreshTokensUseCase {
    pub fn new(
        codec: Arc<TokenCodec>,
        access_max_age: Duration,
        refresh_max_age: Duration,
        session_max_age: Option<Duration>,
    ) -> Self {
        Self {
            codec,
            access_max_age,
            refresh_max_age,
            session_max_age,
        }
    }

    pub fn execute(&self, input: &RefreshInput) -> Result<TokenPair, AuthError> {
        let claims = self.codec.decode_refresh(&input.refresh_token)?;

        // now はこのリクエストで一度だけ採取し、全判定・全発行で共有する
        let now = Utc::now();
        session_policy::validate_refresh(&claims, now, self.refresh_max_age, self.session_max_age)?;

        let next_refresh = session_policy::derive_next_refresh(&claims, now);
        let access = AccessTokenClaims::new(&claims.sub, now, self.access_max_age);

        Ok(TokenPair {
            access_token: self.codec.encode_access(&access)?,
            token_type: "bearer".to_string(),
            expires_in: self.access_max_age.num_seconds(),
            refresh_token: self.codec.encode_refresh(&next_refresh)?,
            refresh_token_expires_in: self.refresh_max_age.num_seconds(),
        })
    }
}
