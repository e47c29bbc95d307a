pub mod login;
pub mod refresh_tokens;
pub mod resolve_principal;

pub use login::{LoginInput, LoginUseCase, TokenPair};
pub use refresh_tokens::{RefreshInput, RefreshTokensUseCase};
pub use resolve_principal::{ApiKeyChannels, Credentials, Resolution, ResolvePrincipalUseCase};
