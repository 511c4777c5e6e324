//! session::state
//!
//! Process-wide session state.
//!
//! # Design
//!
//! [`SessionState`] is the snapshot consumers read to decide what to
//! render: `access_token == None` means unauthenticated, and
//! `is_bootstrapping` is true only during the one-time startup read from
//! the token store.
//!
//! The state lives inside a `tokio::sync::watch` channel owned by
//! [`SessionHandle`]. The handle is the single writer; everything else
//! observes through snapshots or a subscription. The request
//! authenticator reads the latest in-memory token from here on every
//! private-channel request, so no storage read happens per call.

use std::fmt;

use tokio::sync::watch;

/// Snapshot of the process-wide session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Current access token; `None` means unauthenticated.
    pub access_token: Option<String>,

    /// True only during the one-time startup read from the token store.
    pub is_bootstrapping: bool,
}

impl SessionState {
    /// Whether an access token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

// Custom Debug to avoid exposing the token value
impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("is_bootstrapping", &self.is_bootstrapping)
            .finish()
    }
}

/// Single writer for the session state.
///
/// All session mutations (bootstrap, login, refresh success, logout)
/// flow through this handle; holders of a `watch::Receiver` observe
/// every transition.
pub struct SessionHandle {
    tx: watch::Sender<SessionState>,
}

impl SessionHandle {
    /// Create a handle in the initial (bootstrapping, unauthenticated) state.
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState {
            access_token: None,
            is_bootstrapping: true,
        });
        Self { tx }
    }

    /// Latest in-memory access token, if any.
    pub(crate) fn access_token(&self) -> Option<String> {
        self.tx.borrow().access_token.clone()
    }

    /// Install a token (login or refresh success).
    pub(crate) fn set_authenticated(&self, token: &str) {
        self.tx.send_modify(|state| {
            state.access_token = Some(token.to_string());
            state.is_bootstrapping = false;
        });
    }

    /// Drop the in-memory session (logout, refresh-failure cascade).
    pub(crate) fn clear(&self) {
        self.tx.send_modify(|state| {
            state.access_token = None;
            state.is_bootstrapping = false;
        });
    }

    /// Complete the one-time startup read, seeding the token if present.
    pub(crate) fn finish_bootstrap(&self, token: Option<String>) {
        self.tx.send_modify(|state| {
            state.access_token = token;
            state.is_bootstrapping = false;
        });
    }

    /// Current snapshot.
    pub(crate) fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Subscribe to session transitions.
    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("state", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_bootstrapping() {
        let handle = SessionHandle::new();
        let state = handle.snapshot();

        assert!(state.access_token.is_none());
        assert!(state.is_bootstrapping);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn finish_bootstrap_with_token() {
        let handle = SessionHandle::new();
        handle.finish_bootstrap(Some("tok1".into()));

        let state = handle.snapshot();
        assert_eq!(state.access_token.as_deref(), Some("tok1"));
        assert!(!state.is_bootstrapping);
        assert!(state.is_authenticated());
    }

    #[test]
    fn finish_bootstrap_without_token() {
        let handle = SessionHandle::new();
        handle.finish_bootstrap(None);

        let state = handle.snapshot();
        assert!(state.access_token.is_none());
        assert!(!state.is_bootstrapping);
    }

    #[test]
    fn set_and_clear_round_trip() {
        let handle = SessionHandle::new();

        handle.set_authenticated("tok1");
        assert_eq!(handle.access_token().as_deref(), Some("tok1"));

        handle.clear();
        assert!(handle.access_token().is_none());
        assert!(!handle.snapshot().is_bootstrapping);
    }

    #[test]
    fn subscribers_observe_transitions() {
        let handle = SessionHandle::new();
        let mut rx = handle.subscribe();

        handle.set_authenticated("tok1");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().access_token.as_deref(), Some("tok1"));

        handle.clear();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().access_token.is_none());
    }

    #[test]
    fn debug_output_does_not_expose_token() {
        let handle = SessionHandle::new();
        handle.set_authenticated("tok_secret_value");

        let debug_output = format!("{:?}", handle.snapshot());
        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains("tok_secret_value"));
    }
}
