//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO where the entity can be edited

pub mod advertisement;
pub mod article;
pub mod category;
pub mod newsletter;
pub mod session;
pub mod user;
