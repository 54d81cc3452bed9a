//! Session cookie handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
}

/// Issue a session token for the submitted identity and set it as the
/// `token` cookie.
pub async fn issue_session(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<SessionResponse>)> {
    let Json(identity) = body?;

    let token = state.sessions.issue(identity)?;
    metrics::record_session_issued();
    info!("Session issued");

    Ok((
        jar.add(state.sessions.session_cookie(token)),
        Json(SessionResponse { success: true }),
    ))
}

/// Clear the session cookie. Tokens already handed out stay valid until
/// they expire.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    (
        jar.add(state.sessions.removal_cookie()),
        Json(SessionResponse { success: true }),
    )
}
