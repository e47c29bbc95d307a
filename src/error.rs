use thiserror::Error;

/// AuthError は認証・トークンライフサイクルに関するエラーを表す。
/// いずれのエラーも当該リクエストで終端し、リトライはコア内では行わない。
#[derive(Debug, Error)]
pub enum AuthError {
    /// 署名不正・形式不正・トークン種別不一致。
    #[error("could not validate credentials")]
    InvalidCredentials,

    /// アクセストークンの有効期限切れ。クライアントは refresh フローへ誘導される。
    #[error("access token has expired")]
    AccessTokenExpired,

    /// リフレッシュトークンまたはセッション全体の期限切れ。再ログインが必要。
    #[error("session has expired, please re-authenticate")]
    SessionExpired,

    /// 資格情報が一切提示されず、匿名アクセスも許可されていない。
    #[error("not authenticated")]
    NotAuthenticated,

    /// single-user API キーの不一致。欠落とは区別して即時拒否する。
    #[error("invalid API key")]
    InvalidApiKey,

    /// ログイン時のユーザー名またはパスワード不一致。
    #[error("incorrect username or password")]
    IncorrectCredentials,

    /// ログインエンドポイント自体が構成されていない（404 相当）。
    /// メッセージはサーバーモード（public / single-user）により異なる。
    #[error("{0}")]
    LoginUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}
