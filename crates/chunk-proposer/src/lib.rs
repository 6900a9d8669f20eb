//! This library contains the chunk proposer, which is responsible for grouping contiguous L2
//! blocks into chunks that respect the limits of their codec version.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rollup_node_primitives::{ChunkInfo, CodecVersion, ForkSchedule, Hardforks};
use rollup_node_providers::{ChunkStore, L2BlockProvider};

mod accumulator;
pub use accumulator::{AppendOutcome, ChunkAccumulator, ConstraintSet, CutReason};

mod config;
pub use config::{
    ChunkProposerArgs, ChunkProposerConfig, DEFAULT_BLOCK_LOAD_LIMIT, DEFAULT_CHUNK_TIMEOUT_SEC,
    DEFAULT_GAS_COST_INCREASE_MULTIPLIER, DEFAULT_MAX_BLOCK_NUM_PER_CHUNK,
    DEFAULT_MAX_L1_COMMIT_CALLDATA_SIZE_PER_CHUNK, DEFAULT_MAX_L1_COMMIT_GAS_PER_CHUNK,
    DEFAULT_MAX_ROW_CONSUMPTION_PER_CHUNK, DEFAULT_MAX_TX_NUM_PER_CHUNK,
    DEFAULT_START_BLOCK_NUMBER,
};

mod error;
pub use error::{ChunkProposerError, ConfigError};

mod metrics;
use metrics::MetricsHandler;

/// The chunk proposer groups the unassigned L2 blocks into chunks.
///
/// Every call to [`ChunkProposer::propose_once`] rebuilds the chunk under construction from the
/// unassigned blocks, so the proposer holds no state between calls. Calls must not overlap with
/// each other or with any other writer of the chunks.
#[derive(Debug)]
pub struct ChunkProposer<P, H> {
    /// The provider of the unassigned blocks and store of the finalized chunks.
    provider: P,
    /// The source of the hardfork activation heights.
    hardforks: H,
    /// The chunk proposer configuration.
    config: ChunkProposerConfig,
    /// The chunk proposer metrics.
    metrics: MetricsHandler,
}

impl<P, H> ChunkProposer<P, H>
where
    P: L2BlockProvider + ChunkStore + Send + Sync,
    H: Hardforks + Send + Sync,
{
    /// Creates a new chunk proposer.
    pub fn new(
        provider: P,
        hardforks: H,
        config: ChunkProposerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { provider, hardforks, config, metrics: MetricsHandler::default() })
    }

    /// Returns the chunk proposer configuration.
    pub const fn config(&self) -> &ChunkProposerConfig {
        &self.config
    }

    /// Proposes all the chunks which can be closed from the currently unassigned blocks, using
    /// the system time to evaluate the chunk timeout. Returns the proposed chunks.
    pub async fn propose_once(&self) -> Result<Vec<ChunkInfo>, ChunkProposerError> {
        let now =
            SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
        self.propose_at(now).await
    }

    /// Proposes all the chunks which can be closed from the currently unassigned blocks, at the
    /// provided unix time in seconds. Returns the proposed chunks.
    ///
    /// A chunk is closed when the next block does not fit in it, when the next block activates a
    /// hardfork, when its only block exceeds a limit on its own, or when all available blocks were
    /// consumed and the chunk is older than the chunk timeout. A chunk is never closed only
    /// because no more blocks are available.
    pub async fn propose_at(&self, now: u64) -> Result<Vec<ChunkInfo>, ChunkProposerError> {
        let start = Instant::now();
        let result = self.propose(now).await;
        self.metrics.record_proposal_duration(start.elapsed());

        match &result {
            Ok(chunks) if !chunks.is_empty() => {
                tracing::info!(target: "rollup_node::chunk_proposer", count = chunks.len(), "Proposed chunks.");
            }
            Ok(_) => {
                tracing::trace!(target: "rollup_node::chunk_proposer", "No chunk to propose.");
            }
            Err(err) => {
                tracing::error!(target: "rollup_node::chunk_proposer", ?err, "Failed to propose chunks.");
            }
        }

        result
    }

    async fn propose(&self, now: u64) -> Result<Vec<ChunkInfo>, ChunkProposerError> {
        let schedule = ForkSchedule::snapshot(&self.hardforks);
        for version in [CodecVersion::Legacy, CodecVersion::BlobCapacity] {
            let inert = self.config.inert_limits(version);
            if !inert.is_empty() {
                tracing::warn!(target: "rollup_node::chunk_proposer", %version, ?inert, "Limits set to zero are disabled.");
            }
        }

        let mut next_block_number = match self.provider.latest_chunk().await? {
            Some((_, chunk)) => chunk.end_block.number + 1,
            None => self.config.start_block_number,
        };
        tracing::trace!(target: "rollup_node::chunk_proposer", next_block_number, "Starting chunk proposal.");

        let mut accumulator = ChunkAccumulator::new(self.config.clone(), schedule);
        let mut proposed = Vec::new();

        loop {
            let blocks = self
                .provider
                .unassigned_blocks_from(next_block_number, self.config.block_load_limit)
                .await?;
            if blocks.is_empty() {
                break
            }

            for block in blocks {
                if block.number() != next_block_number {
                    return Err(ChunkProposerError::NonContiguousBlock {
                        got: block.number(),
                        expected: next_block_number,
                    })
                }

                let mut outcome = accumulator.try_append(&block)?;
                if let AppendOutcome::Rejected(reason) = outcome {
                    proposed.extend(self.finalize_chunk(&mut accumulator, reason).await?);
                    // the accumulator is empty, the block is either appended or oversized.
                    outcome = accumulator.try_append(&block)?;
                }
                if let AppendOutcome::Oversized(reason) = outcome {
                    tracing::warn!(target: "rollup_node::chunk_proposer", block_number = block.number(), %reason, "Block exceeds a chunk limit on its own.");
                    self.metrics.record_oversized_block();
                    proposed.extend(self.finalize_chunk(&mut accumulator, reason).await?);
                }

                next_block_number += 1;
            }
        }

        if accumulator.is_overdue(now) {
            proposed.extend(self.finalize_chunk(&mut accumulator, CutReason::Timeout).await?);
        } else if !accumulator.is_empty() {
            tracing::debug!(
                target: "rollup_node::chunk_proposer",
                num_blocks = accumulator.num_blocks(),
                first_block_timestamp = ?accumulator.first_block_timestamp(),
                "Chunk under construction is not ready to be proposed."
            );
        }

        Ok(proposed)
    }

    /// Closes the chunk under construction and persists it.
    async fn finalize_chunk(
        &self,
        accumulator: &mut ChunkAccumulator,
        reason: CutReason,
    ) -> Result<Option<ChunkInfo>, ChunkProposerError> {
        let Some(chunk) = accumulator.finalize()? else { return Ok(None) };
        let info = self.provider.finalize_chunk(&chunk).await?;

        tracing::info!(
            target: "rollup_node::chunk_proposer",
            chunk_index = info.index,
            chunk_hash = ?info.hash,
            start_block = chunk.start_block.number,
            end_block = chunk.end_block.number,
            codec_version = %chunk.codec_version,
            %reason,
            totals = ?chunk.totals,
            "Proposed chunk."
        );
        self.metrics.record_chunk(&chunk, reason);

        Ok(Some(info))
    }
}
