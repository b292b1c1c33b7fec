pub mod advertisements;
pub mod articles;
pub mod auth;
pub mod dashboard;
pub mod newsletter;
pub mod public;
