//! Login session model.

use nimba_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table. Access tokens carry the session id.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for opening a session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    pub expires_at: Timestamp,
}
