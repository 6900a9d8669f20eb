use crate::ProviderError;

use rollup_node_primitives::{Chunk, ChunkInfo};
use scroll_db::{Database, DatabaseOperations};

/// An instance of the trait persists finalized chunks.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait ChunkStore {
    /// Returns the most recently finalized chunk.
    async fn latest_chunk(&self) -> Result<Option<(ChunkInfo, Chunk)>, ProviderError>;

    /// Persists the chunk and assigns all the blocks of its range to it, atomically. Returns the
    /// [`ChunkInfo`] the chunk was stored at.
    async fn finalize_chunk(&self, chunk: &Chunk) -> Result<ChunkInfo, ProviderError>;
}

#[async_trait::async_trait]
impl ChunkStore for Database {
    async fn latest_chunk(&self) -> Result<Option<(ChunkInfo, Chunk)>, ProviderError> {
        tracing::trace!(target: "scroll::providers", "fetching latest chunk");
        self.get_latest_chunk().await.map_err(ProviderError::Read)
    }

    async fn finalize_chunk(&self, chunk: &Chunk) -> Result<ChunkInfo, ProviderError> {
        tracing::trace!(
            target: "scroll::providers",
            start_block = chunk.start_block.number,
            end_block = chunk.end_block.number,
            "finalizing chunk"
        );
        Self::finalize_chunk(self, chunk).await.map_err(ProviderError::Write)
    }
}
