//! todomemo server
//!
//! # Environment Variables
//!
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `3000`)
//! - `TODOMEMO_DATA_FILE`: JSON file to persist todos to (default: in-memory)
//! - `RUST_LOG`: Logging filter (e.g. `debug`, `todomemo_core=debug`)

use anyhow::Context;
use todomemo_core::TodoList;
use todomemo_server::{AppState, Server, ServerConfig, Storage, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "todomemo_server=debug,todomemo_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        address = %config.socket_addr(),
        data_file = ?config.data_file,
        "configuration loaded"
    );

    // (A) store を開く（init）
    let storage = Storage::open(&config)
        .await
        .context("failed to open todo store")?;

    // (B) List Manager を組み立てる
    let todos = TodoList::builder()
        .shared_store(storage.handle())
        .build()?;

    // (C) 停止シグナルまで配信
    let served = Server::new(config).run(create_router(AppState::new(todos))).await;

    // (D) store を閉じる（teardown）。配信が失敗していても閉じる
    storage.close().await.context("failed to close todo store")?;
    served
}
