use std::net::SocketAddr;

use anyhow::Context;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lgtm_bot::auth::ValidIdentity;
use lgtm_bot::config::BotConfig;
use lgtm_bot::github::OctocrabClient;
use lgtm_bot::reconcile::{ReconcileEngine, Reconciler};
use lgtm_bot::server::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lgtm_bot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env()?;
    tracing::info!(?config, "Loaded configuration");

    let client = OctocrabClient::from_token(
        config.github_token.clone(),
        config.repo.clone(),
        config.bot_login.clone(),
    )
    .context("failed to build GitHub client")?;

    let engine = ReconcileEngine::new(
        config.labels.clone(),
        ValidIdentity::new(config.bot_login.clone()),
    );
    let reconciler = Reconciler::new(client, engine);

    let shutdown = CancellationToken::new();
    let (status_tx, status_rx) = watch::channel(None);

    let app = build_router(AppState::new(
        config.repo.clone(),
        config.bot_login.clone(),
        status_rx,
    ));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);

    let server_shutdown = shutdown.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
            .await
    });

    let poller = tokio::spawn(lgtm_bot::poll::run(
        reconciler,
        config.repo.clone(),
        config.poll.clone(),
        status_tx,
        shutdown.clone(),
    ));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!("Shutdown requested");
    shutdown.cancel();

    poller.await.context("poll loop panicked")?;
    server
        .await
        .context("server task panicked")?
        .context("server error")?;

    Ok(())
}
