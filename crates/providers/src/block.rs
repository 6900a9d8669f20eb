use crate::ProviderError;

use rollup_node_primitives::L2BlockData;
use scroll_db::{Database, DatabaseOperations};

/// An instance of the trait can provide the L2 blocks which are not yet assigned to a chunk.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait L2BlockProvider {
    /// Returns up to `limit` unassigned blocks starting at the provided block number, in ascending
    /// block number order. An empty result means no more blocks are currently available.
    async fn unassigned_blocks_from(
        &self,
        block_number: u64,
        limit: u64,
    ) -> Result<Vec<L2BlockData>, ProviderError>;
}

#[async_trait::async_trait]
impl L2BlockProvider for Database {
    async fn unassigned_blocks_from(
        &self,
        block_number: u64,
        limit: u64,
    ) -> Result<Vec<L2BlockData>, ProviderError> {
        tracing::trace!(
            target: "scroll::providers",
            block_number,
            limit,
            "fetching unassigned blocks"
        );
        self.get_unassigned_l2_blocks(block_number, limit).await.map_err(ProviderError::Read)
    }
}
