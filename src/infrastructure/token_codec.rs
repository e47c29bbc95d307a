//! 署名付きトークンのエンコード/デコード。
//!
//! 単一固定アルゴリズム（HS256）の JWT を使う。エンコードはキーリング先頭、
//! デコードはリング内の全キーを順に試すことでキーローテーションに追従する。

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::entity::claims::{
    AccessTokenClaims, RefreshTokenClaims, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH,
};
use crate::error::AuthError;
use crate::infrastructure::key_ring::KeyRing;

/// 署名アルゴリズムは固定。アルゴリズム混同攻撃を避けるため交渉はしない。
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// 1 キーに対するデコード試行の結果。
///
/// 署名不一致はローテーション中の別キーの可能性があるため次のキーへ進む。
/// 期限切れは署名が正しく検証できた上での確定的な状態なので、残りのキーを
/// 試さずに即座に終端する。
enum DecodeAttempt<T> {
    Verified(T),
    ExpiredDefinitive,
    TryNext,
}

/// TokenCodec はキーリングを保持し、クレームとトークン文字列を相互変換する。
pub struct TokenCodec {
    keys: KeyRing,
}

impl TokenCodec {
    pub fn new(keys: KeyRing) -> Self {
        Self { keys }
    }

    /// アクセストークンを現行キー（リング先頭）で署名する。
    pub fn encode_access(&self, claims: &AccessTokenClaims) -> Result<String, AuthError> {
        self.encode(claims)
    }

    /// リフレッシュトークンを現行キー（リング先頭）で署名する。
    pub fn encode_refresh(&self, claims: &RefreshTokenClaims) -> Result<String, AuthError> {
        self.encode(claims)
    }

    /// アクセストークンとしてデコード・検証する。
    /// `exp` は必須クレームで、期限切れは `AccessTokenExpired` として区別される。
    pub fn decode_access(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        let claims: AccessTokenClaims = self.decode(token, &access_validation())?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(claims)
    }

    /// リフレッシュトークンとしてデコード・検証する。
    /// `exp` は埋め込まれないため期限判定はここでは行わない（セッションポリシー側で計算する）。
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshTokenClaims, AuthError> {
        let claims: RefreshTokenClaims = self.decode(token, &refresh_validation())?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(claims)
    }

    fn encode<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&Header::new(ALGORITHM), claims, self.keys.encoding_key())
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {}", e)))
    }

    fn decode<T: DeserializeOwned>(
        &self,
        token: &str,
        validation: &Validation,
    ) -> Result<T, AuthError> {
        for key in self.keys.decoding_keys() {
            match attempt::<T>(token, key, validation) {
                DecodeAttempt::Verified(claims) => return Ok(claims),
                DecodeAttempt::ExpiredDefinitive => return Err(AuthError::AccessTokenExpired),
                DecodeAttempt::TryNext => continue,
            }
        }
        Err(AuthError::InvalidCredentials)
    }
}

fn attempt<T: DeserializeOwned>(
    token: &str,
    key: &jsonwebtoken::DecodingKey,
    validation: &Validation,
) -> DecodeAttempt<T> {
    match decode::<T>(token, key, validation) {
        Ok(data) => DecodeAttempt::Verified(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => DecodeAttempt::ExpiredDefinitive,
            _ => DecodeAttempt::TryNext,
        },
    }
}

fn access_validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    // jose 同様、猶予なしで exp を判定する
    validation.leeway = 0;
    validation
}

fn refresh_validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation
}
