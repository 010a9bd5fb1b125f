mod api;
mod middleware;
mod scheduler;
mod state;

use std::sync::Arc;

use popmap_source::StoreLoader;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(popmap_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let loader = StoreLoader::from_config(&config)?;
    tracing::info!(
        env = %config.env,
        source = %loader.source().describe(),
        "starting popmap server"
    );

    let state = AppState::new(
        loader,
        config.view.clone(),
        config.snapshot_path.clone(),
    );
    state.refresh().await;

    let _scheduler =
        scheduler::build_scheduler(state.clone(), config.refresh_cron.as_deref()).await?;

    let app = build_app(state.clone(), default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.tracker.cancel_all();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
