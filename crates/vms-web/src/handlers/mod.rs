// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Handlers for all endpoints.
//!
//! - [`health`]: liveness
//! - [`session`]: sign-in, sign-out and session snapshot
//! - [`navigation`]: menu data and guard evaluation
//! - [`pages`]: denial screen and guarded pages

mod health;
mod navigation;
mod pages;
mod session;

pub use health::*;
pub use navigation::*;
pub use pages::*;
pub use session::*;
