use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entity::claims::{AccessTokenClaims, RefreshTokenClaims};
use crate::error::AuthError;
use crate::infrastructure::{Authenticator, TokenCodec};

#[derive(Debug, Clone, serde::Deserialize, utoipa::ToSchema)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// TokenPair はログインとリフレッシュで共通のレスポンス形。
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub refresh_token_expires_in: i64,
}

/// LoginUseCase は資格情報を検証し、新しいアクセストークンと
/// 新規リフレッシュチェーンの先頭トークンを発行する。
pub struct LoginUseCase {
    authenticator: Option<Arc<dyn Authenticator>>,
    codec: Arc<TokenCodec>,
    access_max_age: Duration,
    refresh_max_age: Duration,
    allow_anonymous_access: bool,
}

impl LoginUseCase {
    pub fn new(
        authenticator: Option<Arc<dyn Authenticator>>,
        codec: Arc<TokenCodec>,
        access_max_age: Duration,
        refresh_max_age: Duration,
        allow_anonymous_access: bool,
    ) -> Self {
        Self {
            authenticator,
            codec,
            access_max_age,
            refresh_max_age,
            allow_anonymous_access,
        }
    }

    pub async fn execute(&self, input: &LoginInput) -> Result<TokenPair, AuthError> {
        // authenticator 未設定のサーバーにはログインする対象が存在しない。
        // 401 ではなく 404 相当で、サーバーモードに応じた案内を返す。
        let Some(authenticator) = &self.authenticator else {
            let message = if self.allow_anonymous_access {
                "This is a public server with no login."
            } else {
                "This is a single-user server. To authenticate, use the API key logged at server startup."
            };
            return Err(AuthError::LoginUnavailable(message.to_string()));
        };

        let username = authenticator
            .authenticate(&input.username, &input.password)
            .await
            .map_err(|e| AuthError::Internal(format!("authenticator failed: {}", e)))?
            .ok_or(AuthError::IncorrectCredentials)?;

        let now = Utc::now();
        let access = AccessTokenClaims::new(&username, now, self.access_max_age);
        let refresh = RefreshTokenClaims::new_chain(&username, now);

        Ok(TokenPair {
            access_token: self.codec.encode_access(&access)?,
            token_type: "bearer".to_string(),
            expires_in: self.access_max_age.num_seconds(),
            refresh_token: self.codec.encode_refresh(&refresh)?,
            refresh_token_expires_in: self.refresh_max_age.num_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::authenticator::MockAuthenticator;
    use crate::infrastructure::KeyRing;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(
            KeyRing::new(&["test-secret".to_string()]).unwrap(),
        ))
    }

    fn use_case(authenticator: Option<Arc<dyn Authenticator>>, anonymous: bool) -> LoginUseCase {
        LoginUseCase::new(
            authenticator,
            codec(),
            Duration::seconds(900),
            Duration::seconds(604800),
            anonymous,
        )
    }

    fn input() -> LoginInput {
        LoginInput {
            username: "alice".to_string(),
            password: "wonderland".to_string(),
        }
    }

    #[tokio::test]
    async fn success_issues_token_pair() {
        let mut mock = MockAuthenticator::new();
        mock.expect_authenticate()
            .withf(|u, p| u == "alice" && p == "wonderland")
            .returning(|_, _| Ok(Some("alice".to_string())));

        let uc = use_case(Some(Arc::new(mock)), false);
        let pair = uc.execute(&input()).await.unwrap();

        assert_eq!(pair.token_type, "bearer");
        assert_eq!(pair.expires_in, 900);
        assert_eq!(pair.refresh_token_expires_in, 604800);

        let access = codec().decode_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, "alice");
        let refresh = codec().decode_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, "alice");
        assert_eq!(refresh.iat, refresh.sct);
    }

    #[tokio::test]
    async fn each_login_starts_a_new_chain() {
        let mut mock = MockAuthenticator::new();
        mock.expect_authenticate()
            .returning(|_, _| Ok(Some("alice".to_string())));

        let uc = use_case(Some(Arc::new(mock)), false);
        let first = uc.execute(&input()).await.unwrap();
        let second = uc.execute(&input()).await.unwrap();

        let sid_a = codec().decode_refresh(&first.refresh_token).unwrap().sid;
        let sid_b = codec().decode_refresh(&second.refresh_token).unwrap().sid;
        assert_ne!(sid_a, sid_b);
    }

    #[tokio::test]
    async fn incorrect_credentials() {
        let mut mock = MockAuthenticator::new();
        mock.expect_authenticate().returning(|_, _| Ok(None));

        let uc = use_case(Some(Arc::new(mock)), false);
        let result = uc.execute(&input()).await;
        assert!(matches!(result, Err(AuthError::IncorrectCredentials)));
    }

    #[tokio::test]
    async fn login_unavailable_on_single_user_server() {
        let uc = use_case(None, false);
        match uc.execute(&input()).await {
            Err(AuthError::LoginUnavailable(msg)) => assert!(msg.contains("single-user")),
            other => unreachable!("unexpected result: {:?}", other.map(|p| p.token_type)),
        }
    }

    #[tokio::test]
    async fn login_unavailable_on_public_server() {
        let uc = use_case(None, true);
        match uc.execute(&input()).await {
            Err(AuthError::LoginUnavailable(msg)) => assert!(msg.contains("public")),
            other => unreachable!("unexpected result: {:?}", other.map(|p| p.token_type)),
        }
    }

    #[tokio::test]
    async fn authenticator_failure_is_internal() {
        let mut mock = MockAuthenticator::new();
        mock.expect_authenticate()
            .returning(|_, _| Err(anyhow::anyhow!("backend down")));

        let uc = use_case(Some(Arc::new(mock)), false);
        let result = uc.execute(&input()).await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
