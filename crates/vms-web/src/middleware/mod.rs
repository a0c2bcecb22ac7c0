// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the web server.
//!
//! - [`SessionLayer`]: resolves the request's session
//! - [`GuardLayer`]: enforces the route guard on page requests

mod guard;
mod session;

pub use guard::{GuardLayer, GuardMiddleware, REDIRECT_PARAM, RenderedDestination, redirect_location};
pub use session::{
    SessionContext, SessionLayer, SessionMiddleware, clear_session_cookie, session_cookie,
};
