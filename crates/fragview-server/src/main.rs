// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use fragview_server::{app, store, AppState, Config};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,fragview_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        database_url = %config.database_url,
        upload_dir = %config.upload_dir,
        "Starting fragview server"
    );

    std::fs::create_dir_all(&config.upload_dir)?;

    let pool = store::connect(&config.database_url).await?;

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
