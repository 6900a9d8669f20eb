//! Resource estimation for blocks and chunks.
//!
//! The [`ChunkEstimator`] tracks the resource usage of a chunk under construction. The usage of
//! the blob capacity is not additive over blocks, so instead of exposing per block deltas the
//! estimator answers "what are the totals of this chunk plus one block" via
//! [`ChunkEstimator::with_block`], recomputing the blob size over the whole prospective chunk.
//!
//! With blob compression enabled, [`ChunkEstimator::with_block`] reports the zstd compression
//! bound of the payload instead of compressing it. The bound is never below the exact size, so a
//! chunk within its limits under the bound is within them exactly. [`ChunkEstimator::exact`]
//! compresses the payload when the exact size is needed.

pub mod blob;
pub mod legacy;

pub use row::ChunkRowConsumption;
mod row;

use crate::CodecError;
use rollup_node_primitives::{ChunkTotals, CodecVersion, L2BlockData};

/// Configuration of the resource estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// The multiplier applied to the estimated L1 commit gas, to account for the cost increase
    /// between estimation and submission.
    pub gas_cost_increase_multiplier: f64,
    /// Whether the blob payload is zstd compressed.
    pub blob_compression: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self { gas_cost_increase_multiplier: 1.0, blob_compression: false }
    }
}

/// The standalone resource usage of a single block.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BlockResources {
    /// The number of transactions, L1 messages included.
    pub tx_num: u64,
    /// The L1 commit gas of the block, excluding any chunk overhead and unscaled.
    pub l1_commit_gas: u64,
    /// The L1 commit calldata size of the block.
    pub l1_commit_calldata_size: u64,
    /// The highest sub-circuit row consumption of the block.
    pub row_consumption: u64,
    /// The size of the L2 transaction payloads of the block, before padding or compression.
    pub blob_payload_size: u64,
}

/// Returns the standalone resource usage of the block.
pub fn estimate_block(block: &L2BlockData) -> Result<BlockResources, CodecError> {
    let rows = block
        .row_consumption
        .as_ref()
        .ok_or(CodecError::MissingRowConsumption(block.number()))?;
    Ok(BlockResources {
        tx_num: block.num_transactions(),
        l1_commit_gas: legacy::block_l1_commit_gas(block),
        l1_commit_calldata_size: legacy::block_l1_commit_calldata_size(block),
        row_consumption: rows.max_rows(),
        blob_payload_size: block.l2_transactions().map(|tx| tx.len() as u64).sum(),
    })
}

/// The codec specific part of the estimator state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CodecState {
    /// The legacy codec tracks the commit gas and calldata size.
    Legacy {
        /// The sum of the blocks' unscaled commit gas.
        blocks_l1_commit_gas: u64,
        /// The sum of the blocks' calldata size.
        l1_commit_calldata_size: u64,
    },
    /// The blob codec tracks the raw blob payload.
    BlobCapacity {
        /// The concatenated L2 transaction payloads of the chunk.
        transactions_data: Vec<u8>,
        /// The padded blob size of the chunk.
        blob_size: u64,
        /// Whether `blob_size` is exact rather than the compression bound.
        exact: bool,
    },
}

/// Estimates the resource usage of a chunk, one block at a time.
///
/// The estimator is deterministic and side-effect free: [`ChunkEstimator::with_block`] returns
/// the estimator of the prospective chunk and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkEstimator {
    version: CodecVersion,
    config: EstimatorConfig,
    num_blocks: u64,
    tx_num: u64,
    rows: ChunkRowConsumption,
    state: CodecState,
}

impl ChunkEstimator {
    /// Returns the estimator of an empty chunk encoded with the provided codec version.
    pub fn new(version: CodecVersion, config: EstimatorConfig) -> Self {
        let state = match version {
            CodecVersion::Legacy => {
                CodecState::Legacy { blocks_l1_commit_gas: 0, l1_commit_calldata_size: 0 }
            }
            CodecVersion::BlobCapacity => {
                CodecState::BlobCapacity {
                    transactions_data: Vec::new(),
                    blob_size: 0,
                    exact: true,
                }
            }
        };
        Self { version, config, num_blocks: 0, tx_num: 0, rows: ChunkRowConsumption::default(), state }
    }

    /// Returns the codec version of the chunk.
    pub const fn version(&self) -> CodecVersion {
        self.version
    }

    /// Returns the number of blocks in the chunk.
    pub const fn num_blocks(&self) -> u64 {
        self.num_blocks
    }

    /// Returns the estimator of the chunk extended with the provided block.
    pub fn with_block(&self, block: &L2BlockData) -> Result<Self, CodecError> {
        let resources = estimate_block(block)?;

        let mut next = self.clone();
        next.num_blocks += 1;
        next.tx_num += resources.tx_num;
        if let Some(rows) = &block.row_consumption {
            next.rows.add(rows);
        }

        match &mut next.state {
            CodecState::Legacy { blocks_l1_commit_gas, l1_commit_calldata_size } => {
                *blocks_l1_commit_gas += resources.l1_commit_gas;
                *l1_commit_calldata_size += resources.l1_commit_calldata_size;
            }
            CodecState::BlobCapacity { transactions_data, blob_size, exact } => {
                for tx in block.l2_transactions() {
                    transactions_data.extend_from_slice(tx);
                }
                if self.config.blob_compression {
                    *blob_size = blob::compressed_blob_size_bound(transactions_data.len() as u64);
                    *exact = false;
                } else {
                    *blob_size = blob::blob_size(transactions_data, false)?;
                }
            }
        }

        Ok(next)
    }

    /// Returns true if the reported blob size is exact.
    pub const fn is_exact(&self) -> bool {
        match &self.state {
            CodecState::Legacy { .. } => true,
            CodecState::BlobCapacity { exact, .. } => *exact,
        }
    }

    /// Returns the estimator with the exact blob size, compressing the payload if needed.
    pub fn exact(mut self) -> Result<Self, CodecError> {
        if let CodecState::BlobCapacity { transactions_data, blob_size, exact } = &mut self.state {
            if !*exact {
                *blob_size = blob::blob_size(transactions_data, self.config.blob_compression)?;
                *exact = true;
            }
        }
        Ok(self)
    }

    /// Returns the totals of the chunk. Resources which the chunk's codec does not track are
    /// reported as zero. The blob size is an upper bound unless [`ChunkEstimator::is_exact`].
    pub fn totals(&self) -> ChunkTotals {
        let mut totals = ChunkTotals {
            num_blocks: self.num_blocks,
            tx_num: self.tx_num,
            row_consumption: self.rows.max(),
            ..Default::default()
        };
        match &self.state {
            CodecState::Legacy { blocks_l1_commit_gas, l1_commit_calldata_size } => {
                if self.num_blocks > 0 {
                    let gas = blocks_l1_commit_gas +
                        legacy::chunk_l1_commit_overhead_gas(self.num_blocks, self.tx_num);
                    totals.l1_commit_gas =
                        legacy::scale_gas(gas, self.config.gas_cost_increase_multiplier);
                }
                totals.l1_commit_calldata_size = *l1_commit_calldata_size;
            }
            CodecState::BlobCapacity { blob_size, .. } => totals.blob_size = *blob_size,
        }
        totals
    }
}

/// Recomputes the totals of a chunk containing the provided blocks from scratch.
///
/// For the same blocks the result equals the totals of a [`ChunkEstimator`] fed one block at a
/// time, which allows a finalized chunk to be verified when it is later built into a batch.
pub fn estimate_chunk(
    blocks: &[L2BlockData],
    version: CodecVersion,
    config: EstimatorConfig,
) -> Result<ChunkTotals, CodecError> {
    let mut estimator = ChunkEstimator::new(version, config);
    for block in blocks {
        estimator = estimator.with_block(block)?;
    }
    Ok(estimator.exact()?.totals())
}
