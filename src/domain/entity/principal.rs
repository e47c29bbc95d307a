use serde::Serialize;

/// Principal は認証済み主体を表す閉じたタグ付き集合。
///
/// 通常のユーザー名（`Named`）と番兵値（`Admin` / `Public`)を型レベルで区別する。
/// ユーザー名文字列空間にマジック値を混ぜると下流の認可判定が誤るため、
/// enum 以外での表現はしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(tag = "kind", content = "username", rename_all = "snake_case")]
pub enum Principal {
    /// single-user API キーにより認証された管理者番兵。トークン由来ではない。
    Admin,
    /// 匿名アクセス許可により解決された公開番兵。トークン由来ではない。
    Public,
    /// アクセストークンの `sub` クレームに由来する通常のユーザー名。
    Named(String),
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin)
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Principal::Public)
    }

    /// 通常ユーザーの場合のみユーザー名を返す。
    pub fn username(&self) -> Option<&str> {
        match self {
            Principal::Named(name) => Some(name),
            _ => None,
        }
    }
}
