use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todolists::config::Config;
use todolists::remote::HttpRemote;
use todolists::store::TodoStore;
use todolists::web::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,todolists=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(TodoStore::new(HttpRemote::new(config.api_base.clone())));
    state.spawn_load();

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, api = %config.api_base, "todolists running");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
