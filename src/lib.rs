//! 認証トークンサービス。
//!
//! 短命のアクセストークンと長命のリフレッシュトークンを発行・検証・
//! ローテーションする。セッションはサーバー側に永続化せず、署名付き
//! クレームと設定値だけから毎回再構成する。

pub mod adapter;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod usecase;

pub use adapter::handler::{router, AppState};
pub use domain::entity::principal::Principal;
pub use error::AuthError;
