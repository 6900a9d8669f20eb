use super::{transaction::DatabaseTransaction, DatabaseConnectionProvider};
use crate::{error::DatabaseError, DatabaseOperations};

use rollup_node_primitives::{Chunk, ChunkInfo};
use sea_orm::{Database as SeaOrmDatabase, DatabaseConnection, TransactionTrait};

/// The [`Database`] struct is responsible for interacting with the database.
///
/// The [`Database`] type wraps a [`sea_orm::DatabaseConnection`]. We implement
/// [`DatabaseConnectionProvider`] for [`Database`] such that it can be used to perform the
/// operations defined in [`crate::DatabaseOperations`]. Atomic operations can be performed using
/// the [`Database::tx`] method which returns a [`DatabaseTransaction`] that also implements the
/// [`DatabaseConnectionProvider`] trait and also the [`crate::DatabaseOperations`] trait.
#[derive(Debug)]
pub struct Database {
    /// The underlying database connection.
    connection: DatabaseConnection,
}

impl Database {
    /// Creates a new [`Database`] instance associated with the provided database URL.
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        let connection = SeaOrmDatabase::connect(database_url).await?;
        Ok(Self { connection })
    }

    /// Creates a new [`DatabaseTransaction`] which can be used for atomic operations.
    pub async fn tx(&self) -> Result<DatabaseTransaction, DatabaseError> {
        Ok(DatabaseTransaction::new(self.connection.begin().await?))
    }

    /// Persists the chunk at the next chunk index and assigns its blocks to it, atomically.
    ///
    /// Every block of the chunk's range must be present and unassigned, otherwise nothing is
    /// written and [`DatabaseError::ChunkBlocksMismatch`] is returned.
    pub async fn finalize_chunk(&self, chunk: &Chunk) -> Result<ChunkInfo, DatabaseError> {
        let tx = self.tx().await?;

        let index = tx.get_latest_chunk().await?.map(|(info, _)| info.index + 1).unwrap_or(0);
        let info = ChunkInfo::new(index, chunk.hash);

        tx.insert_chunk(info, chunk).await?;
        let assigned = tx
            .assign_l2_blocks_to_chunk(info, chunk.start_block.number, chunk.end_block.number)
            .await?;

        let expected = chunk.num_blocks();
        if assigned != expected {
            tracing::warn!(target: "scroll::db", chunk_index = index, expected, assigned, "Chunk block assignment mismatch, rolling back.");
            tx.rollback().await?;
            return Err(DatabaseError::ChunkBlocksMismatch { index, expected, assigned })
        }

        tx.commit().await?;
        tracing::debug!(target: "scroll::db", chunk_index = index, chunk_hash = ?chunk.hash, start = chunk.start_block.number, end = chunk.end_block.number, "Finalized chunk.");

        Ok(info)
    }
}

impl DatabaseConnectionProvider for Database {
    type Connection = DatabaseConnection;

    fn get_connection(&self) -> &Self::Connection {
        &self.connection
    }
}

impl From<DatabaseConnection> for Database {
    fn from(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}
