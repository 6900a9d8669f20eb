//! The accumulator of the chunk under construction.

use crate::ChunkProposerConfig;

use rollup_node_primitives::{Chunk, ChunkTotals, CodecVersion, ForkSchedule, L2BlockData};
use scroll_codec::{
    chunk_hash, codec_version_for_block, constants::MAX_BLOCKS_PER_LEGACY_CHUNK, ChunkEstimator,
    CodecError,
};

/// The reason a chunk was closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum CutReason {
    /// The block number limit.
    BlockNum,
    /// The transaction number limit.
    TxNum,
    /// The L1 commit gas limit.
    L1CommitGas,
    /// The L1 commit calldata size limit.
    L1CommitCalldataSize,
    /// The row consumption limit.
    RowConsumption,
    /// The blob size limit.
    BlobSize,
    /// The next block activates a hardfork.
    ForkBoundary,
    /// The chunk timed out.
    Timeout,
}

impl CutReason {
    /// Returns the str representation of the [`CutReason`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BlockNum => "block_num",
            Self::TxNum => "tx_num",
            Self::L1CommitGas => "l1_commit_gas",
            Self::L1CommitCalldataSize => "l1_commit_calldata_size",
            Self::RowConsumption => "row_consumption",
            Self::BlobSize => "blob_size",
            Self::ForkBoundary => "fork_boundary",
            Self::Timeout => "timeout",
        }
    }
}

impl core::fmt::Display for CutReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The limits a chunk is built under, selected by the codec version of the chunk.
///
/// A limit of zero is inert.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintSet {
    /// The limits of a chunk committed in calldata.
    Legacy {
        /// The maximum number of blocks, capped by the one byte block count of the encoding.
        max_block_num: u64,
        /// The maximum number of transactions.
        max_tx_num: u64,
        /// The maximum scaled L1 commit gas.
        max_l1_commit_gas: u64,
        /// The maximum L1 commit calldata size.
        max_l1_commit_calldata_size: u64,
        /// The maximum row consumption.
        max_row_consumption: u64,
    },
    /// The limits of a chunk committed in a blob.
    BlobCapacity {
        /// The maximum number of blocks.
        max_block_num: u64,
        /// The maximum number of transactions.
        max_tx_num: u64,
        /// The maximum row consumption.
        max_row_consumption: u64,
        /// The maximum padded blob size.
        max_blob_size: u64,
    },
}

impl ConstraintSet {
    /// Returns the [`ConstraintSet`] of the codec version.
    pub fn new(version: CodecVersion, config: &ChunkProposerConfig) -> Self {
        match version {
            CodecVersion::Legacy => Self::Legacy {
                max_block_num: match config.max_block_num_per_chunk {
                    0 => MAX_BLOCKS_PER_LEGACY_CHUNK,
                    max => max.min(MAX_BLOCKS_PER_LEGACY_CHUNK),
                },
                max_tx_num: config.max_tx_num_per_chunk,
                max_l1_commit_gas: config.max_l1_commit_gas_per_chunk,
                max_l1_commit_calldata_size: config.max_l1_commit_calldata_size_per_chunk,
                max_row_consumption: config.max_row_consumption_per_chunk,
            },
            CodecVersion::BlobCapacity => Self::BlobCapacity {
                max_block_num: config.max_block_num_per_chunk,
                max_tx_num: config.max_tx_num_per_chunk,
                max_row_consumption: config.max_row_consumption_per_chunk,
                max_blob_size: config.max_blob_size,
            },
        }
    }

    /// Returns the codec version of the [`ConstraintSet`].
    pub const fn version(&self) -> CodecVersion {
        match self {
            Self::Legacy { .. } => CodecVersion::Legacy,
            Self::BlobCapacity { .. } => CodecVersion::BlobCapacity,
        }
    }

    /// Returns the first limit exceeded by the totals, if any.
    ///
    /// All the limits are evaluated against the same totals, in a fixed order.
    pub fn violation(&self, totals: &ChunkTotals) -> Option<CutReason> {
        let checks = match *self {
            Self::Legacy {
                max_block_num,
                max_tx_num,
                max_l1_commit_gas,
                max_l1_commit_calldata_size,
                max_row_consumption,
            } => vec![
                (CutReason::BlockNum, totals.num_blocks, max_block_num),
                (CutReason::TxNum, totals.tx_num, max_tx_num),
                (CutReason::L1CommitGas, totals.l1_commit_gas, max_l1_commit_gas),
                (
                    CutReason::L1CommitCalldataSize,
                    totals.l1_commit_calldata_size,
                    max_l1_commit_calldata_size,
                ),
                (CutReason::RowConsumption, totals.row_consumption, max_row_consumption),
            ],
            Self::BlobCapacity { max_block_num, max_tx_num, max_row_consumption, max_blob_size } => {
                vec![
                    (CutReason::BlockNum, totals.num_blocks, max_block_num),
                    (CutReason::TxNum, totals.tx_num, max_tx_num),
                    (CutReason::RowConsumption, totals.row_consumption, max_row_consumption),
                    (CutReason::BlobSize, totals.blob_size, max_blob_size),
                ]
            }
        };
        checks.into_iter().find(|(_, value, limit)| *limit != 0 && value > limit).map(|(r, ..)| r)
    }

    /// Returns the first limit exceeded by the estimated chunk. The compressed blob size is only
    /// computed when its bound exceeds the blob size limit.
    fn check(
        &self,
        estimator: ChunkEstimator,
    ) -> Result<(ChunkEstimator, Option<CutReason>), CodecError> {
        let violation = self.violation(&estimator.totals());
        if violation == Some(CutReason::BlobSize) && !estimator.is_exact() {
            let estimator = estimator.exact()?;
            let violation = self.violation(&estimator.totals());
            return Ok((estimator, violation))
        }
        Ok((estimator, violation))
    }
}

/// The outcome of [`ChunkAccumulator::try_append`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[must_use]
pub enum AppendOutcome {
    /// The block was appended to the chunk.
    Appended,
    /// The block exceeds a limit on its own. It was appended to the empty chunk, which is now
    /// full.
    Oversized(CutReason),
    /// The block does not fit in the chunk, which was left untouched. The chunk must be closed
    /// before the block is retried.
    Rejected(CutReason),
}

/// The chunk under construction.
#[derive(Debug, Clone)]
struct Candidate {
    /// The limits of the chunk, fixed by its first block.
    constraints: ConstraintSet,
    /// The resource estimation of the chunk.
    estimator: ChunkEstimator,
    /// The blocks of the chunk.
    blocks: Vec<L2BlockData>,
    /// Set when the first block of the chunk exceeded a limit on its own.
    full: Option<CutReason>,
}

/// Accumulates contiguous blocks into a chunk while every limit of the chunk's codec version is
/// respected.
///
/// The accumulator is built for a single proposal attempt, with an immutable configuration and
/// hardfork schedule.
#[derive(Debug, Clone)]
pub struct ChunkAccumulator {
    config: ChunkProposerConfig,
    schedule: ForkSchedule,
    candidate: Option<Candidate>,
}

impl ChunkAccumulator {
    /// Returns a new empty [`ChunkAccumulator`].
    pub const fn new(config: ChunkProposerConfig, schedule: ForkSchedule) -> Self {
        Self { config, schedule, candidate: None }
    }

    /// Returns true if no block was appended to the chunk.
    pub const fn is_empty(&self) -> bool {
        self.candidate.is_none()
    }

    /// Returns the number of blocks in the chunk.
    pub fn num_blocks(&self) -> usize {
        self.candidate.as_ref().map(|candidate| candidate.blocks.len()).unwrap_or_default()
    }

    /// Returns the codec version of the chunk, if it is not empty.
    pub fn version(&self) -> Option<CodecVersion> {
        self.candidate.as_ref().map(|candidate| candidate.constraints.version())
    }

    /// Returns the running totals of the chunk. With blob compression the blob size is an upper
    /// bound until the chunk is finalized.
    pub fn totals(&self) -> ChunkTotals {
        self.candidate.as_ref().map(|candidate| candidate.estimator.totals()).unwrap_or_default()
    }

    /// Returns the reason the chunk is full, if its only block exceeds a limit.
    pub fn full(&self) -> Option<CutReason> {
        self.candidate.as_ref().and_then(|candidate| candidate.full)
    }

    /// Returns the timestamp of the first block of the chunk.
    pub fn first_block_timestamp(&self) -> Option<u64> {
        self.first_block().map(L2BlockData::timestamp)
    }

    /// Returns the number of the last block of the chunk.
    pub fn last_block_number(&self) -> Option<u64> {
        self.candidate.as_ref().and_then(|candidate| candidate.blocks.last()).map(|b| b.number())
    }

    fn first_block(&self) -> Option<&L2BlockData> {
        self.candidate.as_ref().and_then(|candidate| candidate.blocks.first())
    }

    /// Tries to append the block to the chunk.
    ///
    /// A block activating a hardfork or switching the codec version is rejected from a non-empty
    /// chunk. Otherwise the totals of the prospective chunk are checked against the limits of the
    /// chunk's codec version: a block which does not fit is rejected, unless the chunk is empty in
    /// which case the block is appended and the chunk marked full.
    pub fn try_append(&mut self, block: &L2BlockData) -> Result<AppendOutcome, CodecError> {
        let version = codec_version_for_block(block.number(), &self.schedule);

        let Some(candidate) = self.candidate.as_mut() else {
            let constraints = ConstraintSet::new(version, &self.config);
            let estimator = ChunkEstimator::new(version, self.config.estimator_config())
                .with_block(block)?;
            let (estimator, full) = constraints.check(estimator)?;
            self.candidate =
                Some(Candidate { constraints, estimator, blocks: vec![block.clone()], full });
            return Ok(full.map_or(AppendOutcome::Appended, AppendOutcome::Oversized))
        };

        if let Some(reason) = candidate.full {
            return Ok(AppendOutcome::Rejected(reason))
        }
        if self.schedule.is_fork_block(block.number()) ||
            version != candidate.constraints.version()
        {
            return Ok(AppendOutcome::Rejected(CutReason::ForkBoundary))
        }

        let (estimator, violation) =
            candidate.constraints.check(candidate.estimator.with_block(block)?)?;
        if let Some(reason) = violation {
            return Ok(AppendOutcome::Rejected(reason))
        }

        candidate.estimator = estimator;
        candidate.blocks.push(block.clone());
        Ok(AppendOutcome::Appended)
    }

    /// Returns true if the chunk is not empty and its first block is at least
    /// `chunk_timeout_sec` old at the provided time.
    pub fn is_overdue(&self, now: u64) -> bool {
        self.first_block_timestamp()
            .is_some_and(|timestamp| now.saturating_sub(timestamp) >= self.config.chunk_timeout_sec)
    }

    /// Closes the chunk and returns it, leaving the accumulator empty. Returns [`None`] if the
    /// chunk is empty.
    pub fn finalize(&mut self) -> Result<Option<Chunk>, CodecError> {
        let Some(candidate) = self.candidate.take() else { return Ok(None) };
        let (Some(first), Some(last)) = (candidate.blocks.first(), candidate.blocks.last()) else {
            return Ok(None)
        };

        Ok(Some(Chunk {
            hash: chunk_hash(&candidate.blocks),
            start_block: first.block_info(),
            end_block: last.block_info(),
            start_block_timestamp: first.timestamp(),
            codec_version: candidate.constraints.version(),
            totals: candidate.estimator.exact()?.totals(),
        }))
    }
}
