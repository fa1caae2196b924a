//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
}

impl HttpState {
    /// Construct state from one registry serving both ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use user_registry::domain::UserRegistryService;
    /// use user_registry::inbound::http::state::HttpState;
    /// use user_registry::outbound::persistence::JsonFileUserStore;
    ///
    /// let store = JsonFileUserStore::open("data/users.json").expect("open store");
    /// let state = HttpState::from_registry(Arc::new(UserRegistryService::new(store)));
    /// ```
    pub fn from_registry<R>(registry: Arc<R>) -> Self
    where
        R: UsersQuery + UsersCommand + 'static,
    {
        Self {
            users: registry.clone(),
            users_command: registry,
        }
    }
}
