use crate::{ChunkStore, L2BlockProvider, ProviderError};
use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;
use rollup_node_primitives::{Chunk, ChunkInfo, L2BlockData};
use scroll_db::{DatabaseError, DbErr};

/// An in-memory implementation of the [`L2BlockProvider`] and [`ChunkStore`] with failure
/// injection.
#[derive(Debug, Default)]
pub struct InMemoryChunkProvider {
    /// The blocks, keyed by block number, along with the index of the chunk they are assigned to.
    blocks: Mutex<BTreeMap<u64, (L2BlockData, Option<u64>)>>,
    /// The finalized chunks, in index order.
    chunks: Mutex<Vec<(ChunkInfo, Chunk)>>,
    /// Whether reads fail.
    fail_reads: AtomicBool,
    /// Whether writes fail.
    fail_writes: AtomicBool,
}

impl InMemoryChunkProvider {
    /// Returns a new provider holding the provided blocks.
    pub fn new(blocks: impl IntoIterator<Item = L2BlockData>) -> Self {
        let provider = Self::default();
        provider.push_blocks(blocks);
        provider
    }

    /// Adds the blocks to the provider.
    pub fn push_blocks(&self, blocks: impl IntoIterator<Item = L2BlockData>) {
        let mut stored = self.blocks.lock();
        for block in blocks {
            stored.insert(block.number(), (block, None));
        }
    }

    /// Sets whether reads fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    /// Sets whether writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Returns the finalized chunks.
    pub fn chunks(&self) -> Vec<(ChunkInfo, Chunk)> {
        self.chunks.lock().clone()
    }

    /// Returns the index of the chunk the block is assigned to.
    pub fn chunk_index_of(&self, block_number: u64) -> Option<u64> {
        self.blocks.lock().get(&block_number).and_then(|(_, assignment)| *assignment)
    }
}

fn injected(operation: &str) -> DatabaseError {
    DatabaseError::DatabaseError(DbErr::Custom(format!("injected {operation} failure")))
}

#[async_trait::async_trait]
impl L2BlockProvider for InMemoryChunkProvider {
    async fn unassigned_blocks_from(
        &self,
        block_number: u64,
        limit: u64,
    ) -> Result<Vec<L2BlockData>, ProviderError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(ProviderError::Read(injected("read")))
        }
        Ok(self
            .blocks
            .lock()
            .range(block_number..)
            .filter(|(_, (_, assignment))| assignment.is_none())
            .take(limit as usize)
            .map(|(_, (block, _))| block.clone())
            .collect())
    }
}

#[async_trait::async_trait]
impl ChunkStore for InMemoryChunkProvider {
    async fn latest_chunk(&self) -> Result<Option<(ChunkInfo, Chunk)>, ProviderError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(ProviderError::Read(injected("read")))
        }
        Ok(self.chunks.lock().last().cloned())
    }

    async fn finalize_chunk(&self, chunk: &Chunk) -> Result<ChunkInfo, ProviderError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(ProviderError::Write(injected("write")))
        }

        let mut blocks = self.blocks.lock();
        let mut chunks = self.chunks.lock();
        let index = chunks.last().map(|(info, _)| info.index + 1).unwrap_or(0);

        let assigned = blocks
            .range(chunk.block_range())
            .filter(|(_, (_, assignment))| assignment.is_none())
            .count() as u64;
        if assigned != chunk.num_blocks() {
            return Err(ProviderError::Write(DatabaseError::ChunkBlocksMismatch {
                index,
                expected: chunk.num_blocks(),
                assigned,
            }))
        }

        for (_, (_, assignment)) in blocks.range_mut(chunk.block_range()) {
            *assignment = Some(index);
        }
        let info = ChunkInfo::new(index, chunk.hash);
        chunks.push((info, chunk.clone()));

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use rollup_node_primitives::{CodecVersion, L2BlockHeader};

    fn block(number: u64) -> L2BlockData {
        L2BlockData {
            header: L2BlockHeader { number, ..Default::default() },
            ..Default::default()
        }
    }

    fn chunk(start: &L2BlockData, end: &L2BlockData) -> Chunk {
        Chunk {
            hash: B256::with_last_byte(start.number() as u8),
            start_block: start.block_info(),
            end_block: end.block_info(),
            start_block_timestamp: 0,
            codec_version: CodecVersion::Legacy,
            totals: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_provider_assigns_blocks() -> eyre::Result<()> {
        let blocks = (1..=5).map(block).collect::<Vec<_>>();
        let provider = InMemoryChunkProvider::new(blocks.clone());

        let info = provider.finalize_chunk(&chunk(&blocks[0], &blocks[2])).await?;
        assert_eq!(info.index, 0);
        assert_eq!(provider.chunk_index_of(3), Some(0));
        assert_eq!(provider.chunk_index_of(4), None);
        assert_eq!(provider.unassigned_blocks_from(1, 10).await?, blocks[3..].to_vec());

        // Overlapping chunks are rejected and nothing is assigned.
        let err = provider.finalize_chunk(&chunk(&blocks[2], &blocks[4])).await.unwrap_err();
        assert!(err.is_write());
        assert_eq!(provider.chunk_index_of(4), None);
        assert_eq!(provider.chunks().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_in_memory_provider_injects_failures() {
        let provider = InMemoryChunkProvider::new((1..=2).map(block));

        provider.set_fail_reads(true);
        assert!(provider.unassigned_blocks_from(1, 10).await.unwrap_err().is_read());
        assert!(provider.latest_chunk().await.unwrap_err().is_read());
        provider.set_fail_reads(false);

        provider.set_fail_writes(true);
        let blocks = provider.unassigned_blocks_from(1, 10).await.unwrap();
        let err = provider.finalize_chunk(&chunk(&blocks[0], &blocks[1])).await.unwrap_err();
        assert!(err.is_write());
        assert!(provider.chunks().is_empty());
    }
}
