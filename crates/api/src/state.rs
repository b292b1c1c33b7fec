use std::sync::Arc;

use nimba_db::Repositories;

use crate::config::ServerConfig;
use crate::newsletter::Newsletter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub config: Arc<ServerConfig>,
    /// Subscription handling and outbound newsletter mail.
    pub newsletter: Arc<Newsletter>,
}
