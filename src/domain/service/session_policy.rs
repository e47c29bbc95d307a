//! リフレッシュチェーンの寿命ポリシー。
//!
//! トークンには `exp` を埋め込まず、提示されたクレームと現在時刻と
//! サーバー設定だけで有効性を毎回再計算する。セッションストアは存在しない。

use chrono::{DateTime, Duration, Utc};

use crate::domain::entity::claims::RefreshTokenClaims;
use crate::error::AuthError;

/// リフレッシュトークンの年齢とセッション全体の年齢を検証する。
///
/// `now` は呼び出し側がリクエストごとに一度だけ採取する。判定途中で
/// 再サンプリングすると同一検証内で合否が食い違うため、ここでは受け取るのみ。
pub fn validate_refresh(
    claims: &RefreshTokenClaims,
    now: DateTime<Utc>,
    refresh_max_age: Duration,
    session_max_age: Option<Duration>,
) -> Result<(), AuthError> {
    let now_ts = now.timestamp();

    if now_ts - claims.iat > refresh_max_age.num_seconds() {
        return Err(AuthError::SessionExpired);
    }

    if let Some(max_age) = session_max_age {
        if now_ts - claims.sct > max_age.num_seconds() {
            return Err(AuthError::SessionExpired);
        }
    }

    Ok(())
}

/// チェーン内の次のリフレッシュトークンクレームを導出する。
///
/// `sub` / `sid` / `sct` は不変のまま引き継ぎ、`iat` のみ現在時刻に更新する。
/// 提示された旧トークンはサーバー側では失効させない（ブラックリストなし）。
pub fn derive_next_refresh(claims: &RefreshTokenClaims, now: DateTime<Utc>) -> RefreshTokenClaims {
    RefreshTokenClaims {
        sub: claims.sub.clone(),
        token_type: claims.token_type.clone(),
        iat: now.timestamp(),
        sid: claims.sid.clone(),
        sct: claims.sct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::claims::TOKEN_TYPE_REFRESH;

    const REFRESH_MAX_AGE: i64 = 604800;
    const SESSION_MAX_AGE: i64 = 2592000;

    fn claims_with_ages(now: DateTime<Utc>, token_age: i64, session_age: i64) -> RefreshTokenClaims {
        RefreshTokenClaims {
            sub: "alice".to_string(),
            token_type: TOKEN_TYPE_REFRESH.to_string(),
            iat: now.timestamp() - token_age,
            sid: "sid-1".to_string(),
            sct: now.timestamp() - session_age,
        }
    }

    #[test]
    fn fresh_token_passes() {
        let now = Utc::now();
        let claims = claims_with_ages(now, 0, 0);
        assert!(validate_refresh(
            &claims,
            now,
            Duration::seconds(REFRESH_MAX_AGE),
            Some(Duration::seconds(SESSION_MAX_AGE)),
        )
        .is_ok());
    }

    #[test]
    fn refresh_max_age_boundary() {
        let now = Utc::now();
        let max = Duration::seconds(REFRESH_MAX_AGE);

        // 1 秒超過で失効
        let claims = claims_with_ages(now, REFRESH_MAX_AGE + 1, 0);
        assert!(matches!(
            validate_refresh(&claims, now, max, None),
            Err(AuthError::SessionExpired)
        ));

        // 1 秒手前は有効
        let claims = claims_with_ages(now, REFRESH_MAX_AGE - 1, 0);
        assert!(validate_refresh(&claims, now, max, None).is_ok());

        // ちょうど最大年齢は有効（strict greater-than）
        let claims = claims_with_ages(now, REFRESH_MAX_AGE, 0);
        assert!(validate_refresh(&claims, now, max, None).is_ok());
    }

    #[test]
    fn session_max_age_boundary_independent_of_refresh_age() {
        let now = Utc::now();
        let refresh_max = Duration::seconds(REFRESH_MAX_AGE);
        let session_max = Some(Duration::seconds(SESSION_MAX_AGE));

        // トークン自体は新しいがセッションが古すぎる
        let claims = claims_with_ages(now, 0, SESSION_MAX_AGE + 1);
        assert!(matches!(
            validate_refresh(&claims, now, refresh_max, session_max),
            Err(AuthError::SessionExpired)
        ));

        let claims = claims_with_ages(now, 0, SESSION_MAX_AGE - 1);
        assert!(validate_refresh(&claims, now, refresh_max, session_max).is_ok());
    }

    #[test]
    fn session_max_age_unset_means_unlimited() {
        let now = Utc::now();
        let claims = claims_with_ages(now, 0, SESSION_MAX_AGE * 100);
        assert!(validate_refresh(&claims, now, Duration::seconds(REFRESH_MAX_AGE), None).is_ok());
    }

    #[test]
    fn derive_next_preserves_chain_identity() {
        let now = Utc::now();
        let first = claims_with_ages(now, 3600, 7200);
        let next = derive_next_refresh(&first, now);

        assert_eq!(next.sub, first.sub);
        assert_eq!(next.sid, first.sid);
        assert_eq!(next.sct, first.sct);
        assert_eq!(next.iat, now.timestamp());
        assert_ne!(next.iat, first.iat);
    }

    #[test]
    fn chain_of_rotations_keeps_sid_and_sct() {
        let mut now = Utc::now();
        let first = RefreshTokenClaims::new_chain("alice", now);
        let mut current = first.clone();
        for _ in 0..5 {
            now += Duration::seconds(60);
            current = derive_next_refresh(&current, now);
        }
        assert_eq!(current.sid, first.sid);
        assert_eq!(current.sct, first.sct);
        assert_eq!(current.iat, first.iat + 300);
    }
}
