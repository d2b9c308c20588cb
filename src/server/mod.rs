//! HTTP server for the lgtm bot.
//!
//! The bot is poll-driven; the server exists for operators and orchestrators.
//!
//! # Endpoints
//!
//! - `GET /health` - Returns 200 if the server is running
//! - `GET /status` - Returns the outcome of the most recent poll as JSON

use std::sync::Arc;

use tokio::sync::watch;

pub mod health;
pub mod status;

pub use health::health_handler;
pub use status::status_handler;

use crate::poll::PassStatus;
use crate::types::{Login, RepoId};

/// Shared application state, handed to handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repo: RepoId,
    bot_login: Login,
    /// Written by the poll loop after every pass.
    last_pass: watch::Receiver<Option<PassStatus>>,
}

impl AppState {
    pub fn new(
        repo: RepoId,
        bot_login: Login,
        last_pass: watch::Receiver<Option<PassStatus>>,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                repo,
                bot_login,
                last_pass,
            }),
        }
    }

    pub fn repo(&self) -> &RepoId {
        &self.inner.repo
    }

    pub fn bot_login(&self) -> &Login {
        &self.inner.bot_login
    }

    /// The most recently published pass, if any pass has finished.
    pub fn last_pass(&self) -> Option<PassStatus> {
        self.inner.last_pass.borrow().clone()
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .with_state(app_state)
}
