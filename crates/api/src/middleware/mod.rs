//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the user behind a valid Bearer token and live session.
//! - [`rbac::RequireStaff`] -- an [`auth::AuthUser`] with the staff flag.

pub mod auth;
pub mod rbac;
