/// The error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A database error occurred.
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    /// A value does not fit in a database integer column.
    #[error("value {0} does not fit in a database integer")]
    IntegerOverflow(u64),
    /// The data persisted in the database is invalid.
    #[error("invalid {field} persisted in database: {reason}")]
    InvalidData {
        /// The field holding the invalid data.
        field: &'static str,
        /// The reason the data is invalid.
        reason: String,
    },
    /// The number of blocks assigned to a chunk differs from the chunk's block count.
    #[error("chunk {index} spans {expected} blocks but {assigned} unassigned blocks were found")]
    ChunkBlocksMismatch {
        /// The index of the chunk.
        index: u64,
        /// The number of blocks the chunk spans.
        expected: u64,
        /// The number of blocks that were assigned.
        assigned: u64,
    },
}

impl DatabaseError {
    /// Returns a [`DatabaseError::InvalidData`] for the provided field.
    pub fn invalid_data(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidData { field, reason: reason.to_string() }
    }
}
