use std::net::SocketAddr;

use tracing::info;

use tiled_auth_server::adapter::handler::{router, AppState};
use tiled_auth_server::infrastructure::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg = Config::load(&config_path)?;

    info!(
        name = %cfg.app.name,
        environment = %cfg.app.environment,
        port = cfg.server.port,
        "starting auth token server"
    );

    // authenticator はデプロイメントがライブラリ組み込み時に注入するケイパビリティ。
    // このバイナリ単体では構成されず、single-user または public モードで動作する。
    if cfg.auth.single_user_api_key.is_some() {
        info!("single-user mode: API key authentication enabled");
    } else if cfg.auth.allow_anonymous_access {
        info!("public mode: anonymous access enabled");
    } else {
        info!("no authenticator, API key, or anonymous access configured; all requests will be rejected");
    }
    info!(keys = cfg.auth.secret_keys.len(), "signing key ring loaded");

    let state = AppState::new(None, &cfg.auth)?;
    let app = router(state).layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    info!("REST server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
