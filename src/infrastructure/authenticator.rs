/// Authenticator はデプロイメントが供給する資格情報検証ケイパビリティ。
///
/// パスワードの照合方法（LDAP、PAM、固定リスト等）はこのサービスの関知外で、
/// 組み込み側が実装を注入する。未設定（None）のサーバーはログイン機能を持たず、
/// single-user API キーまたは匿名アクセスのみで動作する。
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    /// 資格情報を検証し、成功時は正規化されたユーザー名を返す。
    /// 不一致は `Ok(None)`、検証基盤自体の障害のみ `Err` とする。
    async fn authenticate(&self, username: &str, password: &str)
        -> anyhow::Result<Option<String>>;
}
