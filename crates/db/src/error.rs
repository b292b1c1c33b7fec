/// Error returned by every repository method.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Any error raised by PostgreSQL or the driver.
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A unique constraint rejected the write (in-memory store only;
    /// PostgreSQL reports these through [`DbError::Sqlx`]).
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(&'static str),

    /// A referenced row does not exist (in-memory store only).
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(&'static str),
}
