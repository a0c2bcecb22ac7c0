// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Guarded page handlers.
//!
//! These run only after the guard layer decided to render.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use vms_core::DenialScreen;

use crate::extractors::{CurrentSession, MaybeRendered};
use crate::response::{PageResponse, menu_items};
use crate::state::AppState;

/// GET `<denied_path>`
///
/// The access-denied screen with its single recovery action.
pub async fn denied(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> impl IntoResponse {
    Json(DenialScreen::for_session(&ctx.state, state.guard()))
}

/// Fallback for every other page.
///
/// Reports the rendered destination with the principal's menu. Requests that
/// bypassed the guard and matched no route are 404.
pub async fn page(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    MaybeRendered(rendered): MaybeRendered,
) -> Response {
    let Some(destination) = rendered else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let principal = ctx.state.principal().cloned();
    let menu = principal
        .as_ref()
        .map(|p| menu_items(state.guard().table().menu_for(&p.role_key())))
        .unwrap_or_default();

    Json(PageResponse {
        destination,
        principal,
        menu,
    })
    .into_response()
}
