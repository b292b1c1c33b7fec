//! Nimba24 API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! newsletter service) so integration tests, the server binary and the
//! `nimba-manage` CLI share them.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod newsletter;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
