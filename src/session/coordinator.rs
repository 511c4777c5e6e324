//! session::coordinator
//!
//! Single-flight token refresh with FIFO replay.
//!
//! # State machine
//!
//! The coordinator is consulted by the private channel when a response
//! comes back 401. It is either idle or refreshing:
//!
//! - Idle: the caller becomes the initiator. It reads the stored refresh
//!   token, performs the one refresh network call, and settles every
//!   caller that queued up behind it.
//! - Refreshing: the caller suspends on a completion handle pushed onto
//!   the pending queue. When the in-flight refresh resolves, handles are
//!   settled strictly in enqueue order.
//!
//! The flag and the queue live inside one mutex, which is never held
//! across an await. This preserves the at-most-one-refresh invariant on
//! a multi-threaded runtime.
//!
//! # Failure cascade
//!
//! A failed refresh is terminal for the session: both stored tokens are
//! wiped, queued callers are settled with "no token" (their replays go
//! out unauthenticated and fail upward on their own), the injected
//! logout hook clears the in-memory session, and the initiator is told
//! to propagate its original error.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::store::TokenStore;

use super::errors::SessionError;
use super::state::SessionHandle;
use super::{LogoutHook, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Fresh credentials returned by a refresh backend.
///
/// The server may rotate the refresh token; when it does not, the
/// existing one stays valid and is kept.
pub struct RefreshedTokens {
    /// The new access token.
    pub access_token: String,

    /// Rotated refresh token, if the server issued one.
    pub refresh_token: Option<String>,
}

// Custom Debug to avoid exposing token values
impl std::fmt::Debug for RefreshedTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshedTokens")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Exchanges a refresh token for fresh credentials.
///
/// Implemented by the credential-exchange API client; tests substitute
/// their own.
#[async_trait]
pub trait RefreshBackend: Send + Sync {
    /// Perform the refresh network call.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, SessionError>;
}

/// Outcome of consulting the coordinator after a 401.
#[derive(Debug)]
pub(crate) enum Recovery {
    /// Replay the original request with this token (`None` = no
    /// `Authorization` header; the replay fails upward on its own).
    Token(Option<String>),

    /// The refresh this caller initiated failed; propagate the caller's
    /// original error.
    SessionExpired,
}

/// Refresh-in-flight flag and pending queue, guarded together.
struct PendingState {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<Option<String>>>,
}

/// Coordinates token refresh across concurrent private-channel requests.
pub(crate) struct RefreshCoordinator {
    session: Arc<SessionHandle>,
    store: Arc<dyn TokenStore>,
    backend: Arc<dyn RefreshBackend>,
    pending: Mutex<PendingState>,
    on_logout: LogoutHook,
}

impl RefreshCoordinator {
    pub(crate) fn new(
        session: Arc<SessionHandle>,
        store: Arc<dyn TokenStore>,
        backend: Arc<dyn RefreshBackend>,
        on_logout: LogoutHook,
    ) -> Self {
        Self {
            session,
            store,
            backend,
            pending: Mutex::new(PendingState {
                refreshing: false,
                waiters: VecDeque::new(),
            }),
            on_logout,
        }
    }

    /// Recover from an authentication failure on the private channel.
    ///
    /// At most one refresh network call is in flight at any time; every
    /// other caller suspends on the queue and is settled in enqueue
    /// order when that call resolves.
    pub(crate) async fn recover(&self) -> Recovery {
        let waiter = {
            let mut pending = self.pending.lock().unwrap();
            if pending.refreshing {
                let (tx, rx) = oneshot::channel();
                pending.waiters.push_back(tx);
                Some(rx)
            } else {
                pending.refreshing = true;
                None
            }
        };

        if let Some(rx) = waiter {
            // Suspended behind the in-flight refresh. A dropped sender
            // cannot happen in practice (the flush settles every waiter),
            // but a lost handle degrades to an unauthenticated replay.
            return Recovery::Token(rx.await.unwrap_or(None));
        }

        let outcome = self.run_refresh().await;

        let waiters = {
            let mut pending = self.pending.lock().unwrap();
            pending.refreshing = false;
            std::mem::take(&mut pending.waiters)
        };

        let replay_token = outcome.as_ref().ok().cloned();
        for waiter in waiters {
            let _ = waiter.send(replay_token.clone());
        }

        match outcome {
            Ok(token) => Recovery::Token(Some(token)),
            Err(err) => {
                debug!("session refresh failed: {}", err);
                self.on_logout.invoke();
                Recovery::SessionExpired
            }
        }
    }

    /// Perform the single refresh call and settle persistent state.
    async fn run_refresh(&self) -> Result<String, SessionError> {
        let refresh_token = match self.store.get(REFRESH_TOKEN_KEY).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.wipe_credentials().await;
                return Err(SessionError::NotAuthenticated);
            }
            Err(err) => {
                self.wipe_credentials().await;
                return Err(err.into());
            }
        };

        match self.backend.refresh(&refresh_token).await {
            Ok(tokens) => {
                let next_refresh = tokens
                    .refresh_token
                    .clone()
                    .unwrap_or(refresh_token);
                self.persist_pair(&tokens.access_token, &next_refresh).await;
                self.session.set_authenticated(&tokens.access_token);
                debug!("access token refreshed");
                Ok(tokens.access_token)
            }
            Err(err) => {
                self.wipe_credentials().await;
                Err(err)
            }
        }
    }

    /// Persist the credential pair as a unit.
    ///
    /// A partial write is rolled back best-effort so the store never
    /// holds half a pair. The in-memory session keeps working either
    /// way; only the next process start loses the session.
    async fn persist_pair(&self, access: &str, refresh: &str) {
        let written = match self.store.set(ACCESS_TOKEN_KEY, access).await {
            Ok(()) => self.store.set(REFRESH_TOKEN_KEY, refresh).await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            warn!("cannot persist refreshed credentials: {}", err);
            self.wipe_credentials().await;
        }
    }

    /// Best-effort removal of both stored tokens.
    async fn wipe_credentials(&self) {
        if let Err(err) = self
            .store
            .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await
        {
            // The in-memory transition proceeds even when persistent
            // cleanup fails.
            warn!("cannot clear stored credentials: {}", err);
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pending = self.pending.lock().unwrap();
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &pending.refreshing)
            .field("queued", &pending.waiters.len())
            .finish_non_exhaustive()
    }
}
