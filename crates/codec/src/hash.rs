use crate::{constants::BLOCK_CONTEXT_HASH_BYTES_SIZE, BlockContext};

use alloy_primitives::{Keccak256, B256};
use rollup_node_primitives::L2BlockData;

/// Computes the hash of a chunk containing the provided blocks.
///
/// The hash commits to the leading bytes of every block context followed by the hash of every
/// transaction, L1 messages included, in block order.
pub fn chunk_hash(blocks: &[L2BlockData]) -> B256 {
    let mut hasher = Keccak256::new();
    for block in blocks {
        hasher.update(&BlockContext::from(block).encode()[..BLOCK_CONTEXT_HASH_BYTES_SIZE]);
    }
    for block in blocks {
        for hash in block.transaction_hashes() {
            hasher.update(hash);
        }
    }
    hasher.finalize()
}
