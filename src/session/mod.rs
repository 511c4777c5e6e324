//! session
//!
//! Authenticated-session lifecycle: login, bootstrap, logout, and
//! transparent token refresh.
//!
//! # Architecture
//!
//! - [`SessionState`] / `SessionHandle` - process-wide session snapshot,
//!   observed by consumers through a watch channel
//! - [`SessionController`] - login, bootstrap-from-storage, logout
//! - `RefreshCoordinator` - single-flight refresh with FIFO replay,
//!   consulted by the private channel on 401
//! - [`LogoutHook`] - constructor-injected capability the coordinator
//!   invokes when a refresh is irrecoverable, so the low-level layer
//!   never depends on the controller
//!
//! # Security
//!
//! Token values never appear in logs, errors, or debug output. Types in
//! this module that hold tokens implement custom Debug to redact them.

pub mod controller;
pub mod coordinator;
pub mod errors;
pub mod state;

pub use controller::SessionController;
pub use coordinator::{RefreshBackend, RefreshedTokens};
pub use errors::SessionError;
pub use state::SessionState;

use std::fmt;
use std::sync::Arc;

/// Token store key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "auth.access_token";

/// Token store key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "auth.refresh_token";

/// Capability invoked when the session becomes irrecoverable.
///
/// The refresh coordinator receives one at construction instead of
/// depending on the controller, which keeps the dependency graph
/// one-directional and the initialization order explicit.
#[derive(Clone)]
pub struct LogoutHook(Arc<dyn Fn() + Send + Sync>);

impl LogoutHook {
    /// Wrap a logout callback.
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A hook that does nothing. Useful in tests.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub(crate) fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for LogoutHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LogoutHook(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn token_store_keys_are_namespaced() {
        assert_eq!(ACCESS_TOKEN_KEY, "auth.access_token");
        assert_eq!(REFRESH_TOKEN_KEY, "auth.refresh_token");
    }

    #[test]
    fn logout_hook_invokes_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let hook = {
            let count = Arc::clone(&count);
            LogoutHook::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        hook.invoke();
        hook.invoke();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn noop_hook_does_not_panic() {
        LogoutHook::noop().invoke();
    }
}
