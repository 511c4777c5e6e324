//! client
//!
//! Top-level facade wiring the session core to the API surface.
//!
//! # Construction order
//!
//! The dependency graph is one-directional: the controller is built
//! first, manufactures the logout capability, and only then is the
//! refresh coordinator constructed with that capability. The private
//! channel receives the finished coordinator. No component reaches back
//! up the stack at runtime.

use std::sync::Arc;

use crate::api::auth::AuthApi;
use crate::api::channels::PrivateChannel;
use crate::api::loans::LoansApi;
use crate::config::ClientConfig;
use crate::session::controller::SessionController;
use crate::session::coordinator::RefreshCoordinator;
use crate::store::TokenStore;

/// A wired client: session lifecycle plus the authenticated API surface.
///
/// ```ignore
/// use std::sync::Arc;
/// use keeptab::{Client, config::ClientConfig, store::create_store};
///
/// let config = ClientConfig::load()?;
/// let store = create_store(&config.store_provider)?;
/// let client = Client::new(&config, store);
///
/// client.session().bootstrap().await;
/// let loans = client.loans().list().await?;
/// ```
pub struct Client {
    session: SessionController,
    loans: LoansApi,
}

impl Client {
    /// Wire a client over a configuration and a token store.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        let http = reqwest::Client::new();
        let auth = AuthApi::new(http.clone(), config.api_base.clone());

        let session = SessionController::new(auth.clone(), Arc::clone(&store));
        let coordinator = Arc::new(RefreshCoordinator::new(
            session.handle(),
            Arc::clone(&store),
            Arc::new(auth),
            session.logout_hook(),
        ));
        let private = PrivateChannel::new(
            http,
            config.api_base.clone(),
            session.handle(),
            coordinator,
        );

        Self {
            session,
            loans: LoansApi::new(private),
        }
    }

    /// Session lifecycle: bootstrap, login, logout, state.
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Authenticated loan and reminder endpoints.
    pub fn loans(&self) -> &LoansApi {
        &self.loans
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
