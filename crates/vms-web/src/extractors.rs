// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for handlers.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use vms_core::{Destination, Principal, SessionState};

use crate::error::ApiError;
use crate::middleware::{RenderedDestination, SessionContext};

// =============================================================================
// Session Extractors
// =============================================================================

/// The request's session; absent when the session layer did not run.
pub struct CurrentSession(pub SessionContext);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .unwrap_or_else(SessionContext::absent);
        Ok(CurrentSession(ctx))
    }
}

/// A signed-in principal. Rejects with 401 otherwise, and with 503 while the
/// session is still loading.
pub struct SignedIn {
    /// Session token.
    pub token: Option<Uuid>,
    /// The principal.
    pub principal: Principal,
}

impl<S> FromRequestParts<S> for SignedIn
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .unwrap_or_else(SessionContext::absent);
        match ctx.state {
            SessionState::Present(principal) => Ok(SignedIn {
                token: ctx.token,
                principal,
            }),
            SessionState::Loading => Err(ApiError::service_unavailable("Session is loading")),
            SessionState::Absent => Err(ApiError::unauthorized("Authentication required")),
        }
    }
}

// =============================================================================
// Rendered Destination Extractor
// =============================================================================

/// The destination the guard rendered, if the request went through it.
pub struct MaybeRendered(pub Option<Destination>);

impl<S> FromRequestParts<S> for MaybeRendered
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let rendered = parts
            .extensions
            .get::<RenderedDestination>()
            .map(|r| r.0.clone());
        Ok(MaybeRendered(rendered))
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON body extractor that rejects with an [`ApiError`].
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        Ok(ValidatedJson(value))
    }
}
