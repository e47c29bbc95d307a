use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// アクセストークンの `type` クレーム値。
pub const TOKEN_TYPE_ACCESS: &str = "access";
/// リフレッシュトークンの `type` クレーム値。
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// AccessTokenClaims はアクセストークンのペイロードを表す。
/// 有効期限は `exp` に埋め込み、署名検証時に判定する。失効リストは持たない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AccessTokenClaims {
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub exp: i64,
}

impl AccessTokenClaims {
    /// ログインまたはリフレッシュ時に新しいアクセストークンクレームを生成する。
    pub fn new(subject: &str, now: DateTime<Utc>, max_age: Duration) -> Self {
        Self {
            sub: subject.to_string(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            exp: (now + max_age).timestamp(),
        }
    }
}

/// RefreshTokenClaims はリフレッシュトークンのペイロードを表す。
///
/// `exp` は意図的に埋め込まない。有効期限は検証時にサーバー設定から計算するため、
/// 設定変更（最大セッション年齢の短縮など）が発行済みトークンにも即座に反映される。
/// `sid` と `sct` はリフレッシュチェーン全体で不変、`iat` はローテーションごとに更新される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RefreshTokenClaims {
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// このトークン自体の発行時刻（unix 秒）。
    pub iat: i64,
    /// セッション ID。チェーン先頭で採番され、以降の全トークンに引き継がれる。
    pub sid: String,
    /// セッション作成時刻（unix 秒）。チェーン先頭の iat と一致する。
    pub sct: i64,
}

impl RefreshTokenClaims {
    /// 新しいリフレッシュチェーンの先頭トークンクレームを生成する。
    pub fn new_chain(subject: &str, now: DateTime<Utc>) -> Self {
        let ts = now.timestamp();
        Self {
            sub: subject.to_string(),
            token_type: TOKEN_TYPE_REFRESH.to_string(),
            iat: ts,
            sid: Uuid::new_v4().to_string(),
            sct: ts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_claims_exp_is_now_plus_max_age() {
        let now = Utc::now();
        let claims = AccessTokenClaims::new("alice", now, Duration::seconds(900));
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
        assert_eq!(claims.exp, now.timestamp() + 900);
    }

    #[test]
    fn new_chain_sets_sct_to_iat() {
        let now = Utc::now();
        let claims = RefreshTokenClaims::new_chain("alice", now);
        assert_eq!(claims.token_type, TOKEN_TYPE_REFRESH);
        assert_eq!(claims.iat, claims.sct);
        assert!(!claims.sid.is_empty());
    }

    #[test]
    fn new_chain_generates_distinct_session_ids() {
        let now = Utc::now();
        let a = RefreshTokenClaims::new_chain("alice", now);
        let b = RefreshTokenClaims::new_chain("alice", now);
        assert_ne!(a.sid, b.sid);
    }

    #[test]
    fn type_claim_serializes_as_type() {
        let claims = AccessTokenClaims::new("alice", Utc::now(), Duration::seconds(60));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "access");
    }
}
