// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Navigation and guard evaluation handlers.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use vms_core::Destination;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{CurrentSession, SignedIn};
use crate::response::{NavigationResponse, menu_items};
use crate::state::AppState;

/// GET /api/navigation
///
/// Returns the signed-in principal's menu and allowed destinations. The menu
/// and the allowed set come from the same table entries.
pub async fn navigation(
    State(state): State<AppState>,
    SignedIn { principal, .. }: SignedIn,
) -> ApiResult<impl IntoResponse> {
    let guard = state.guard();
    let role = principal.role_key();
    let allowed = guard.allowed_for(&principal);

    Ok(Json(NavigationResponse {
        dashboard: guard.dashboard_for(&principal),
        menu: menu_items(guard.table().menu_for(&role)),
        allowed: allowed.sorted().into_iter().cloned().collect(),
        role,
    }))
}

/// Query parameters for guard evaluation.
#[derive(Debug, Deserialize)]
pub struct GuardQuery {
    /// Destination to evaluate.
    pub path: String,
}

/// GET /api/guard?path=
///
/// Evaluates the guard for the current session without navigating.
pub async fn evaluate(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Query(query): Query<GuardQuery>,
) -> ApiResult<impl IntoResponse> {
    let destination =
        Destination::parse(&query.path).map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(state.guard().evaluate(&ctx.state, &destination)))
}
