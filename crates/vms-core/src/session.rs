// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Principals and session stores.
//!
//! The route guard never looks a session up by itself: callers hand it a
//! [`SessionState`] taken from whichever [`SessionStore`] owns the session.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::role::{Role, normalize_role_key};

// =============================================================================
// Principal
// =============================================================================

/// The authenticated user.
///
/// `role` is kept as the raw string the backend returned. A malformed role
/// is not rejected here; it simply resolves to no permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Raw role string.
    pub role: String,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Department.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Principal {
    /// Creates a principal with a fresh identifier.
    pub fn new(display_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            role: role.into(),
            email: None,
            phone: None,
            department: None,
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Returns the normalized role key.
    pub fn role_key(&self) -> String {
        normalize_role_key(&self.role)
    }

    /// Returns the role, if the raw string names one.
    pub fn parsed_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

// =============================================================================
// SessionState
// =============================================================================

/// What the route guard knows about the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Session resolution has not finished.
    #[default]
    Loading,
    /// No principal is signed in.
    Absent,
    /// A principal is signed in.
    Present(Principal),
}

impl SessionState {
    /// Builds a resolved state from an optional principal.
    pub fn from_principal(principal: Option<Principal>) -> Self {
        match principal {
            Some(principal) => Self::Present(principal),
            None => Self::Absent,
        }
    }

    /// Returns the principal, if present.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Present(principal) => Some(principal),
            _ => None,
        }
    }

    /// Returns `true` while resolving.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Absent => "absent",
            Self::Present(_) => "present",
        }
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Sign-in credentials.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Password hashing
// =============================================================================

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> SessionResult<String> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| SessionError::password_hash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SessionError::password_hash(e.to_string()))
}

/// Checks a password against an Argon2 PHC string.
pub fn verify_password(password: &str, phc_hash: &str) -> SessionResult<bool> {
    let parsed =
        PasswordHash::new(phc_hash).map_err(|e| SessionError::password_hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Returns `true` if the string parses as a PHC hash.
pub fn is_password_hash(value: &str) -> bool {
    PasswordHash::new(value).is_ok()
}

/// A throwaway hash verified for unknown accounts, so that an unknown email
/// costs the same Argon2 work as a wrong password.
fn placeholder_hash() -> Option<&'static str> {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| hash_password("vms-placeholder-account").ok())
        .as_deref()
}

// =============================================================================
// UserDirectory
// =============================================================================

/// Authenticates credentials against the account backend.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the principal for valid credentials.
    async fn authenticate(&self, credentials: &Credentials) -> SessionResult<Principal>;
}

/// An account known to a [`StaticUserDirectory`].
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    /// The principal handed out on sign-in.
    pub principal: Principal,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Disabled accounts cannot sign in.
    pub active: bool,
}

/// A fixed, in-memory account list keyed by lower-cased email.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, DirectoryUser>,
}

impl StaticUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account under `email`.
    pub fn with_user(mut self, email: &str, user: DirectoryUser) -> Self {
        self.insert(email, user);
        self
    }

    /// Adds or replaces an account.
    pub fn insert(&mut self, email: &str, user: DirectoryUser) {
        self.users.insert(email.trim().to_lowercase(), user);
    }

    /// Returns the number of accounts.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn authenticate(&self, credentials: &Credentials) -> SessionResult<Principal> {
        let key = credentials.email.trim().to_lowercase();
        let Some(user) = self.users.get(&key) else {
            if let Some(placeholder) = placeholder_hash() {
                let _ = verify_password(&credentials.password, placeholder);
            }
            return Err(SessionError::InvalidCredentials);
        };

        if !verify_password(&credentials.password, &user.password_hash)? {
            return Err(SessionError::InvalidCredentials);
        }
        if !user.active {
            return Err(SessionError::account_disabled(key));
        }

        Ok(user.principal.clone())
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Owner of the current session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns a snapshot of the session.
    fn state(&self) -> SessionState;

    /// Returns the signed-in principal.
    fn current_principal(&self) -> Option<Principal> {
        self.state().principal().cloned()
    }

    /// Returns `true` while the session is being resolved.
    fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    /// Signs in and replaces the current principal.
    async fn sign_in(&self, credentials: &Credentials) -> SessionResult<Principal>;

    /// Clears the current principal.
    async fn sign_out(&self);
}

/// A single session held in memory.
///
/// Starts in [`SessionState::Loading`] until [`InMemorySessionStore::restore`]
/// or a sign-in resolves it.
pub struct InMemorySessionStore {
    directory: Arc<dyn UserDirectory>,
    state: RwLock<SessionState>,
}

impl InMemorySessionStore {
    /// Creates an unresolved store.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            state: RwLock::new(SessionState::Loading),
        }
    }

    /// Creates a store already resolved to "no session".
    pub fn resolved(directory: Arc<dyn UserDirectory>) -> Self {
        let store = Self::new(directory);
        store.restore(None);
        store
    }

    /// Finishes session resolution with a remembered principal, if any.
    pub fn restore(&self, principal: Option<Principal>) {
        let state = SessionState::from_principal(principal);
        tracing::debug!(state = state.kind(), "Session resolved");
        *self.state.write() = state;
    }
}

impl fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemorySessionStore")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    async fn sign_in(&self, credentials: &Credentials) -> SessionResult<Principal> {
        match self.directory.authenticate(credentials).await {
            Ok(principal) => {
                tracing::info!(
                    principal_id = %principal.id,
                    role = %principal.role,
                    "Signed in"
                );
                *self.state.write() = SessionState::Present(principal.clone());
                Ok(principal)
            }
            Err(e) => {
                tracing::warn!(email = %credentials.email, error = %e, "Sign-in failed");
                let mut state = self.state.write();
                if state.is_loading() {
                    *state = SessionState::Absent;
                }
                Err(e)
            }
        }
    }

    async fn sign_out(&self) {
        let mut state = self.state.write();
        if let Some(principal) = state.principal() {
            tracing::info!(principal_id = %principal.id, "Signed out");
        }
        *state = SessionState::Absent;
    }
}

// =============================================================================
// Tests
// =============================================================================
