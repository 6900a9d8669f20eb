use scroll_db::DatabaseError;

/// An error occurring at a provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Reading blocks or chunks failed.
    #[error("provider read error: {0}")]
    Read(#[source] DatabaseError),
    /// Persisting a chunk failed. Nothing of the chunk was persisted.
    #[error("provider write error: {0}")]
    Write(#[source] DatabaseError),
}

impl ProviderError {
    /// Returns true if the error occurred while reading.
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read(_))
    }

    /// Returns true if the error occurred while writing.
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}
