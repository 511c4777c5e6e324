//! session::controller
//!
//! Process-wide session operations exposed to consumers.
//!
//! # Responsibilities
//!
//! - `bootstrap` - one-time startup read of the stored access token
//! - `login` / `login_with_code` - credential exchange and persistence
//! - `logout` - idempotent credential wipe
//! - state access for whoever renders the session (CLI, embedding UI)
//!
//! The controller owns the single writer for [`SessionState`] and hands
//! the refresh coordinator its logout capability, so every session
//! transition in the process flows through one place.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::api::auth::{AuthApi, TokenPair};
use crate::store::TokenStore;

use super::errors::SessionError;
use super::state::{SessionHandle, SessionState};
use super::{LogoutHook, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Login, logout, and session-state access.
pub struct SessionController {
    handle: Arc<SessionHandle>,
    store: Arc<dyn TokenStore>,
    auth: AuthApi,
}

impl SessionController {
    /// Create a controller over a credential-exchange client and a token
    /// store. The session starts unauthenticated and bootstrapping.
    pub fn new(auth: AuthApi, store: Arc<dyn TokenStore>) -> Self {
        Self {
            handle: Arc::new(SessionHandle::new()),
            store,
            auth,
        }
    }

    /// Shared session handle for the request authenticator and the
    /// refresh coordinator.
    pub(crate) fn handle(&self) -> Arc<SessionHandle> {
        Arc::clone(&self.handle)
    }

    /// One-time startup read of the stored access token.
    ///
    /// Always completes: a store failure is logged and treated as "no
    /// session". `is_bootstrapping` is false afterward either way.
    pub async fn bootstrap(&self) -> SessionState {
        let token = match self.store.get(ACCESS_TOKEN_KEY).await {
            Ok(token) => token,
            Err(err) => {
                warn!("cannot read stored session: {}", err);
                None
            }
        };
        self.handle.finish_bootstrap(token);
        self.handle.snapshot()
    }

    /// Log in with email and password.
    ///
    /// On success both tokens are persisted and the session state becomes
    /// authenticated. On failure the state is left untouched and the
    /// error is surfaced for display.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let pair = self.auth.login(email, password).await?;
        self.install_credentials(pair).await
    }

    /// Log in by exchanging a third-party authorization code.
    ///
    /// Same contract as [`login`](Self::login).
    pub async fn login_with_code(&self, code: &str) -> Result<(), SessionError> {
        let pair = self.auth.exchange_code(code).await?;
        self.install_credentials(pair).await
    }

    /// Log out: wipe stored credentials best-effort and clear the
    /// in-memory session. Idempotent; never fails from the caller's
    /// perspective.
    pub async fn logout(&self) {
        if let Err(err) = self
            .store
            .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await
        {
            // In-memory logout proceeds even when persistent cleanup fails.
            warn!("cannot clear stored credentials: {}", err);
        }
        self.handle.clear();
    }

    /// Current session snapshot.
    pub fn state(&self) -> SessionState {
        self.handle.snapshot()
    }

    /// Subscribe to session transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.handle.subscribe()
    }

    /// Whether an access token is currently held in memory.
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Manufacture the logout capability handed to the refresh
    /// coordinator. Invoking it clears the in-memory session; the
    /// coordinator wipes the store itself before invoking.
    pub fn logout_hook(&self) -> LogoutHook {
        let handle = Arc::clone(&self.handle);
        LogoutHook::new(move || handle.clear())
    }

    /// Persist a credential pair as a unit, then publish the
    /// authenticated state.
    ///
    /// A partial write is rolled back best-effort so the store never
    /// holds half a pair, and the login is reported as failed.
    async fn install_credentials(&self, pair: TokenPair) -> Result<(), SessionError> {
        let written = match self.store.set(ACCESS_TOKEN_KEY, &pair.access_token).await {
            Ok(()) => self.store.set(REFRESH_TOKEN_KEY, &pair.refresh_token).await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            if let Err(cleanup) = self
                .store
                .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
                .await
            {
                warn!("cannot roll back partial credential write: {}", cleanup);
            }
            return Err(err.into());
        }

        self.handle.set_authenticated(&pair.access_token);
        Ok(())
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryTokenStore, StoreError};
    use async_trait::async_trait;

    fn controller_with(store: Arc<dyn TokenStore>) -> SessionController {
        // Points at a closed port; tests here never reach the network.
        let auth = AuthApi::new(reqwest::Client::new(), "http://127.0.0.1:1");
        SessionController::new(auth, store)
    }

    #[tokio::test]
    async fn bootstrap_without_stored_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let controller = controller_with(store);

        assert!(controller.state().is_bootstrapping);

        let state = controller.bootstrap().await;
        assert!(!state.is_bootstrapping);
        assert!(state.access_token.is_none());
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn bootstrap_restores_stored_token() {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(ACCESS_TOKEN_KEY, "tok1").await.unwrap();
        let controller = controller_with(store);

        let state = controller.bootstrap().await;
        assert_eq!(state.access_token.as_deref(), Some("tok1"));
        assert!(controller.is_authenticated());
    }

    /// Store whose reads always fail.
    struct BrokenStore;

    #[async_trait]
    impl TokenStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::ReadError("backend unavailable".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::WriteError("backend unavailable".into()))
        }

        async fn remove_many(&self, _keys: &[&str]) -> Result<(), StoreError> {
            Err(StoreError::DeleteError("backend unavailable".into()))
        }
    }

    #[tokio::test]
    async fn bootstrap_completes_when_store_fails() {
        let controller = controller_with(Arc::new(BrokenStore));

        let state = controller.bootstrap().await;
        assert!(!state.is_bootstrapping);
        assert!(state.access_token.is_none());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(ACCESS_TOKEN_KEY, "tok1").await.unwrap();
        store.set(REFRESH_TOKEN_KEY, "ref1").await.unwrap();
        let controller = controller_with(store.clone());
        controller.bootstrap().await;
        assert!(controller.is_authenticated());

        controller.logout().await;
        let after_first = controller.state();
        assert!(!after_first.is_authenticated());
        assert!(store.get(ACCESS_TOKEN_KEY).await.unwrap().is_none());
        assert!(store.get(REFRESH_TOKEN_KEY).await.unwrap().is_none());

        controller.logout().await;
        assert_eq!(controller.state(), after_first);
    }

    #[tokio::test]
    async fn logout_succeeds_when_store_cleanup_fails() {
        let controller = controller_with(Arc::new(BrokenStore));
        controller.bootstrap().await;

        // Must not error or leave the in-memory session behind.
        controller.logout().await;
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn logout_hook_clears_in_memory_session() {
        let store = Arc::new(MemoryTokenStore::new());
        let controller = controller_with(store);
        controller.handle().set_authenticated("tok1");
        assert!(controller.is_authenticated());

        controller.logout_hook().invoke();
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn subscribers_see_logout() {
        let store = Arc::new(MemoryTokenStore::new());
        let controller = controller_with(store);
        controller.handle().set_authenticated("tok1");

        let mut rx = controller.subscribe();
        controller.logout().await;

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().access_token.is_none());
    }

    #[test]
    fn debug_output_does_not_expose_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let controller = controller_with(store);
        controller.handle().set_authenticated("tok_secret_value");

        let debug_output = format!("{:?}", controller);
        assert!(!debug_output.contains("tok_secret_value"));
    }
}
