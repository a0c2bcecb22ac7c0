// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for vms-core.
//!
//! Authorization outcomes are never errors: a denied or unauthenticated
//! navigation always resolves to a redirect. The types here cover building
//! navigation data and resolving sessions.

use thiserror::Error;

/// Result type alias for access-control construction.
pub type AccessResult<T> = Result<T, AccessError>;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// AccessError
// =============================================================================

/// Errors raised while constructing roles, destinations or navigation tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The role key is not one of the canonical role identifiers.
    #[error("Unknown role: '{role}'")]
    UnknownRole {
        /// The unrecognized role key.
        role: String,
    },

    /// The destination is not a usable absolute path.
    #[error("Invalid destination '{value}': {reason}")]
    InvalidDestination {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A navigation group was declared without children.
    #[error("Navigation group '{label}' for role '{role}' has no children")]
    EmptyGroup {
        /// The role owning the group.
        role: String,
        /// The group label.
        label: String,
    },
}

impl AccessError {
    /// Creates an unknown role error.
    pub fn unknown_role(role: impl Into<String>) -> Self {
        Self::UnknownRole { role: role.into() }
    }

    /// Creates an invalid destination error.
    pub fn invalid_destination(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDestination {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an empty group error.
    pub fn empty_group(role: impl Into<String>, label: impl Into<String>) -> Self {
        Self::EmptyGroup {
            role: role.into(),
            label: label.into(),
        }
    }
}

// =============================================================================
// SessionError
// =============================================================================

/// Errors raised by session stores and user directories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Unknown user or wrong password. Both cases share one variant.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but may not sign in.
    #[error("Account disabled: {email}")]
    AccountDisabled {
        /// The account email.
        email: String,
    },

    /// Password hashing or hash parsing failed.
    #[error("Password hash error: {message}")]
    PasswordHash {
        /// Error message.
        message: String,
    },

    /// The backing store could not be reached.
    #[error("Session store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

impl SessionError {
    /// Creates an account disabled error.
    pub fn account_disabled(email: impl Into<String>) -> Self {
        Self::AccountDisabled {
            email: email.into(),
        }
    }

    /// Creates a password hash error.
    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns `true` if the caller supplied bad credentials.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidCredentials | SessionError::AccountDisabled { .. }
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_display() {
        let err = AccessError::unknown_role("security");
        assert_eq!(err.to_string(), "Unknown role: 'security'");

        let err = AccessError::invalid_destination("check-in", "must start with '/'");
        assert_eq!(
            err.to_string(),
            "Invalid destination 'check-in': must start with '/'"
        );
    }

    #[test]
    fn test_session_error_classification() {
        assert!(SessionError::InvalidCredentials.is_client_error());
        assert!(SessionError::account_disabled("a@b.c").is_client_error());
        assert!(!SessionError::unavailable("timeout").is_client_error());
    }
}
