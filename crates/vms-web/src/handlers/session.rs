// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session handlers.

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use vms_core::{Credentials, Destination};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{CurrentSession, ValidatedJson};
use crate::middleware::{clear_session_cookie, session_cookie};
use crate::response::{SessionResponse, SignInResponse, SignOutResponse};
use crate::state::AppState;

// =============================================================================
// Sign In
// =============================================================================

/// Sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// Account email.
    pub email: String,
    /// Password.
    pub password: String,
    /// Destination preserved from the login redirect.
    #[serde(default)]
    pub redirect: Option<String>,
}

/// POST /api/session
///
/// Authenticates, opens a session and picks the landing destination. A
/// session the browser already held is closed.
pub async fn sign_in(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Response> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    // An unparseable preserved destination is dropped, not rejected.
    let return_to = request
        .redirect
        .as_deref()
        .and_then(|raw| Destination::parse(raw).ok());

    let credentials = Credentials::new(request.email, request.password);
    let (token, principal) = state
        .sessions()
        .sign_in(&credentials, ctx.token.as_ref())
        .await?;
    let landing = state
        .guard()
        .post_login_destination(&principal, return_to.as_ref());

    tracing::info!(
        principal_id = %principal.id,
        role = %principal.role,
        landing = %landing,
        "Session opened"
    );

    let cookie = session_cookie(&state.settings, &token);
    let mut response = Json(SignInResponse {
        token,
        principal,
        landing,
    })
    .into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::internal(e.to_string()))?,
    );
    Ok(response)
}

// =============================================================================
// Sign Out
// =============================================================================

/// DELETE /api/session
///
/// Closes the session named by the request's token.
pub async fn sign_out(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> ApiResult<Response> {
    let signed_out = match ctx.token {
        Some(token) => state.sessions().sign_out(&token).await,
        None => false,
    };

    let cookie = clear_session_cookie(&state.settings);
    let mut response = Json(SignOutResponse { signed_out }).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::internal(e.to_string()))?,
    );
    Ok(response)
}

// =============================================================================
// Current Session
// =============================================================================

/// GET /api/session
///
/// Returns the session snapshot the guard would see.
pub async fn current_session(CurrentSession(ctx): CurrentSession) -> impl IntoResponse {
    Json(SessionResponse {
        state: ctx.state.kind(),
        principal: ctx.state.principal().cloned(),
    })
}
