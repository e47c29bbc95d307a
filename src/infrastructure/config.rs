use serde::Deserialize;

/// Application configuration for the auth token server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8110
}

/// AuthConfig はトークンライフサイクルの設定を表す。
///
/// `secret_keys` は順序付きリスト。先頭がエンコード用、全要素がデコード候補。
/// リフレッシュトークンは `exp` を持たないため、最大年齢の変更は発行済み
/// トークンにも即座に適用される。
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret_keys: Vec<String>,
    #[serde(default = "default_access_token_max_age")]
    pub access_token_max_age_seconds: i64,
    #[serde(default = "default_refresh_token_max_age")]
    pub refresh_token_max_age_seconds: i64,
    /// セッション全体の最大年齢（秒）。未設定なら無制限。
    #[serde(default)]
    pub session_max_age_seconds: Option<i64>,
    #[serde(default)]
    pub allow_anonymous_access: bool,
    /// single-user モード用の API キー。設定時は Admin 番兵として解決される。
    #[serde(default)]
    pub single_user_api_key: Option<String>,
}

fn default_access_token_max_age() -> i64 {
    900
}

fn default_refresh_token_max_age() -> i64 {
    604800
}
