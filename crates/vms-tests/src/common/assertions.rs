// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers for guard outcomes and HTTP responses.

use axum::body::to_bytes;
use axum::http::{StatusCode, header};
use axum::response::Response;
use vms_core::{GuardOutcome, RedirectReason};

// =============================================================================
// GuardOutcome Assertions
// =============================================================================

/// Assertion extensions for [`GuardOutcome`].
pub trait GuardOutcomeAssertions {
    /// Assert that the guard renders `path`.
    fn assert_renders(&self, path: &str);

    /// Assert that the guard redirects to `path`.
    fn assert_redirects_to(&self, path: &str);

    /// Assert that the guard redirects to `path` for `reason`.
    fn assert_redirect_reason(&self, path: &str, reason: RedirectReason);

    /// Assert that the guard asks for the loading indicator.
    fn assert_loading(&self);
}

impl GuardOutcomeAssertions for GuardOutcome {
    fn assert_renders(&self, path: &str) {
        match self {
            GuardOutcome::Render { destination } => assert_eq!(
                destination.as_str(),
                path,
                "Expected render of {path}, but rendered {destination}"
            ),
            other => panic!("Expected render of {path}, but got {other:?}"),
        }
    }

    fn assert_redirects_to(&self, path: &str) {
        match self.redirect_target() {
            Some(target) => assert_eq!(
                target.as_str(),
                path,
                "Expected redirect to {path}, but redirected to {target}"
            ),
            None => panic!("Expected redirect to {path}, but got {self:?}"),
        }
    }

    fn assert_redirect_reason(&self, path: &str, reason: RedirectReason) {
        self.assert_redirects_to(path);
        let actual = self.as_redirect().map(|redirect| redirect.reason);
        assert_eq!(
            actual,
            Some(reason),
            "Expected redirect reason {reason:?} for {path}, but got {actual:?}"
        );
    }

    fn assert_loading(&self) {
        assert_eq!(
            self,
            &GuardOutcome::ShowLoading,
            "Expected the loading indicator, but got {self:?}"
        );
    }
}

// =============================================================================
// Response Assertions
// =============================================================================

/// Assert a `303 See Other` with the given `Location`.
pub fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "Expected 303 redirect to {location}, got {}",
        response.status()
    );
    let actual = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok());
    assert_eq!(actual, Some(location), "Unexpected Location header");
}

/// Assert the status code.
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {expected}, got {}",
        response.status()
    );
}

/// Returns the value of the first `Set-Cookie` header.
pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Reads the body as JSON.
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// Assert a JSON error body with the given code.
pub async fn assert_error_code(response: Response, status: StatusCode, code: &str) {
    assert_status(&response, status);
    let body = json_body(response).await;
    assert_eq!(
        body["error"]["code"], code,
        "Unexpected error body: {body}"
    );
}
