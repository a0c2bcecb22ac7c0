// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-browser session stores.
//!
//! Each browser holds an opaque token naming one [`InMemorySessionStore`].
//! Unknown, malformed, missing and expired tokens all read as "no session".
//!
//! Sessions expire after sitting idle for the registry's TTL. An expired
//! token is dropped when it is next presented, and every new sign-in sweeps
//! the rest.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;
use vms_config::schema::DEFAULT_SESSION_TTL_SECS;
use vms_core::{
    Credentials, InMemorySessionStore, Principal, SessionResult, SessionState, SessionStore,
    UserDirectory,
};

struct SessionEntry {
    store: Arc<InMemorySessionStore>,
    last_seen: Instant,
}

impl SessionEntry {
    fn new(store: Arc<InMemorySessionStore>) -> Self {
        Self {
            store,
            last_seen: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() >= ttl
    }
}

/// Session stores keyed by token.
pub struct SessionRegistry {
    directory: Arc<dyn UserDirectory>,
    sessions: DashMap<Uuid, SessionEntry>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Creates an empty registry backed by a user directory.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            sessions: DashMap::new(),
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }

    /// Sets the idle lifetime of a session.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the idle lifetime of a session.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Parses a token string.
    pub fn parse_token(raw: &str) -> Option<Uuid> {
        Uuid::parse_str(raw.trim()).ok()
    }

    /// Returns a snapshot of the session named by `token`, refreshing its
    /// idle timer.
    pub fn state(&self, token: Option<&Uuid>) -> SessionState {
        token
            .and_then(|token| self.touch(token))
            .map(|store| store.state())
            .unwrap_or(SessionState::Absent)
    }

    fn touch(&self, token: &Uuid) -> Option<Arc<InMemorySessionStore>> {
        {
            let mut entry = self.sessions.get_mut(token)?;
            if !entry.is_expired(self.ttl) {
                entry.last_seen = Instant::now();
                return Some(entry.store.clone());
            }
        }
        self.sessions.remove(token);
        tracing::debug!(sessions = self.sessions.len(), "Session expired");
        None
    }

    /// Authenticates and opens a new session.
    ///
    /// On success the caller's `previous` session, if any, is closed.
    pub async fn sign_in(
        &self,
        credentials: &Credentials,
        previous: Option<&Uuid>,
    ) -> SessionResult<(Uuid, Principal)> {
        let store = Arc::new(InMemorySessionStore::new(self.directory.clone()));
        let principal = store.sign_in(credentials).await?;

        if let Some(previous) = previous {
            self.sign_out(previous).await;
        }
        self.evict_expired();

        let token = Uuid::new_v4();
        self.sessions.insert(token, SessionEntry::new(store));
        tracing::debug!(sessions = self.sessions.len(), "Session opened");
        Ok((token, principal))
    }

    /// Signs out and forgets the session. Returns `false` for unknown tokens.
    pub async fn sign_out(&self, token: &Uuid) -> bool {
        match self.sessions.remove(token) {
            Some((_, entry)) => {
                entry.store.sign_out().await;
                true
            }
            None => false,
        }
    }

    /// Drops every idle session. Returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.is_expired(self.ttl));
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted expired sessions");
        }
        evicted
    }

    /// Returns the number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no session is open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(any(test, feature = "test-support"))]
impl SessionRegistry {
    /// Reserves a token whose session is still being resolved.
    ///
    /// Requests carrying the token see [`SessionState::Loading`] until
    /// [`SessionRegistry::resolve`] is called.
    pub fn reserve(&self) -> Uuid {
        let token = Uuid::new_v4();
        let store = Arc::new(InMemorySessionStore::new(self.directory.clone()));
        self.sessions.insert(token, SessionEntry::new(store));
        token
    }

    /// Resolves a reserved session. Returns `false` for unknown tokens.
    pub fn resolve(&self, token: &Uuid, principal: Option<Principal>) -> bool {
        match self.sessions.get(token) {
            Some(entry) => {
                entry.store.restore(principal);
                true
            }
            None => false,
        }
    }

    /// Opens a session for a principal without checking credentials.
    pub fn open(&self, principal: Principal) -> Uuid {
        let token = self.reserve();
        self.resolve(&token, Some(principal));
        token
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vms_core::{DirectoryUser, SessionError, StaticUserDirectory, hash_password};

    fn registry() -> SessionRegistry {
        let user = DirectoryUser {
            principal: Principal::new("Sam Super", "supervisor"),
            password_hash: hash_password("shift-lead").unwrap(),
            active: true,
        };
        let directory = StaticUserDirectory::new().with_user("sam@example.com", user);
        SessionRegistry::new(Arc::new(directory))
    }

    fn credentials() -> Credentials {
        Credentials::new("sam@example.com", "shift-lead")
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let registry = registry();
        let (token, principal) = registry.sign_in(&credentials(), None).await.unwrap();
        assert_eq!(principal.role, "supervisor");
        assert!(matches!(registry.state(Some(&token)), SessionState::Present(_)));

        assert!(registry.sign_out(&token).await);
        assert_eq!(registry.state(Some(&token)), SessionState::Absent);
        assert!(!registry.sign_out(&token).await);
    }

    #[tokio::test]
    async fn test_failed_sign_in_opens_nothing() {
        let registry = registry();
        let result = registry
            .sign_in(&Credentials::new("sam@example.com", "wrong"), None)
            .await;
        assert_eq!(result.unwrap_err(), SessionError::InvalidCredentials);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_replaces_previous_session() {
        let registry = registry();
        let (first, _) = registry.sign_in(&credentials(), None).await.unwrap();
        let (second, _) = registry.sign_in(&credentials(), Some(&first)).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.state(Some(&first)), SessionState::Absent);
        assert!(matches!(registry.state(Some(&second)), SessionState::Present(_)));
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_previous_session() {
        let registry = registry();
        let (token, _) = registry.sign_in(&credentials(), None).await.unwrap();
        let result = registry
            .sign_in(&Credentials::new("sam@example.com", "wrong"), Some(&token))
            .await;
        assert!(result.is_err());
        assert!(matches!(registry.state(Some(&token)), SessionState::Present(_)));
    }

    #[test]
    fn test_expired_session_reads_absent_and_is_dropped() {
        let registry = registry().with_ttl(Duration::ZERO);
        let token = registry.open(Principal::new("Sam", "supervisor"));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.state(Some(&token)), SessionState::Absent);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_evict_expired_sweeps_idle_sessions() {
        let idle = registry().with_ttl(Duration::ZERO);
        for _ in 0..3 {
            idle.open(Principal::new("Sam", "supervisor"));
        }
        assert_eq!(idle.evict_expired(), 3);
        assert!(idle.is_empty());

        let fresh = registry();
        fresh.open(Principal::new("Sam", "supervisor"));
        assert_eq!(fresh.evict_expired(), 0);
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn test_reserved_session_is_loading() {
        let registry = registry();
        let token = registry.reserve();
        assert_eq!(registry.state(Some(&token)), SessionState::Loading);

        assert!(registry.resolve(&token, None));
        assert_eq!(registry.state(Some(&token)), SessionState::Absent);
    }

    #[test]
    fn test_unknown_tokens_are_absent() {
        let registry = registry();
        assert_eq!(registry.state(None), SessionState::Absent);
        assert_eq!(registry.state(Some(&Uuid::new_v4())), SessionState::Absent);
        assert!(SessionRegistry::parse_token("not-a-token").is_none());
    }
}
