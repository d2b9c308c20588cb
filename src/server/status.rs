//! Poll status endpoint.
//!
//! Reports the outcome of the most recent pass, so an operator can tell a
//! bot that is running but failing every pass (bad token, missing
//! permissions) from a healthy one.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::AppState;
use crate::poll::PassStatus;

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    repo: String,
    bot_login: &'a str,
    last_pass: Option<PassStatus>,
}

/// Returns the bot's identity and its last pass as JSON.
///
/// Before the first pass completes, `last_pass` is `null`. If the last pass
/// could not list issues the response is still 200; the failure is in the
/// body under `last_pass.error`.
pub async fn status_handler(State(app_state): State<AppState>) -> Response {
    let last_pass = app_state.last_pass();
    let body = StatusBody {
        repo: app_state.repo().to_string(),
        bot_login: app_state.bot_login().as_str(),
        last_pass,
    };
    (StatusCode::OK, Json(body)).into_response()
}
