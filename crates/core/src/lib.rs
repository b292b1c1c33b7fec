//! Domain types and rules for the Nimba news site.
//!
//! This crate has no I/O. The repository layer (`nimba-db`), the mail layer
//! (`nimba-mail`) and the HTTP layer (`nimba-api`) all build on it.

pub mod advertisement;
pub mod article;
pub mod category;
pub mod error;
pub mod forms;
pub mod newsletter;
pub mod types;
