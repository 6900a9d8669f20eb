use crate::CutReason;

use metrics::{Counter, Histogram};
use metrics_derive::Metrics;
use rollup_node_primitives::Chunk;
use std::{collections::HashMap, time::Duration};
use strum::IntoEnumIterator;

/// The metric handler for the [`super::ChunkProposer`].
#[derive(Debug)]
pub(crate) struct MetricsHandler {
    /// The chunk proposer metrics.
    proposer: ChunkProposerMetrics,
    /// The metrics of the chunks, per cut reason.
    cuts: HashMap<CutReason, ChunkCutMetrics>,
}

impl MetricsHandler {
    /// Records a finalized chunk and the reason it was cut.
    pub(crate) fn record_chunk(&self, chunk: &Chunk, reason: CutReason) {
        if let Some(metrics) = self.cuts.get(&reason) {
            metrics.proposed_chunks_by_reason.increment(1);
        }
        self.proposer.proposed_chunks.increment(1);
        self.proposer.blocks_per_chunk.record(chunk.totals.num_blocks as f64);
        self.proposer.txs_per_chunk.record(chunk.totals.tx_num as f64);
        self.proposer.chunk_blob_size.record(chunk.totals.blob_size as f64);
        self.proposer.chunk_l1_commit_gas.record(chunk.totals.l1_commit_gas as f64);
    }

    /// Records a block exceeding a limit on its own.
    pub(crate) fn record_oversized_block(&self) {
        self.proposer.oversized_blocks.increment(1);
    }

    /// Records the duration of a proposal attempt.
    pub(crate) fn record_proposal_duration(&self, duration: Duration) {
        self.proposer.proposal_duration.record(duration.as_secs_f64());
    }
}

impl Default for MetricsHandler {
    fn default() -> Self {
        Self {
            proposer: ChunkProposerMetrics::default(),
            cuts: CutReason::iter()
                .map(|reason| {
                    let label = reason.as_str();
                    (reason, ChunkCutMetrics::new_with_labels(&[("reason", label)]))
                })
                .collect(),
        }
    }
}

/// The metrics for the [`super::ChunkProposer`].
#[derive(Metrics, Clone)]
#[metrics(scope = "chunk_proposer")]
pub(crate) struct ChunkProposerMetrics {
    /// The number of proposed chunks.
    pub(crate) proposed_chunks: Counter,
    /// The number of blocks which exceeded a limit on their own.
    pub(crate) oversized_blocks: Counter,
    /// The number of blocks per chunk.
    pub(crate) blocks_per_chunk: Histogram,
    /// The number of transactions per chunk.
    pub(crate) txs_per_chunk: Histogram,
    /// The estimated blob size per chunk.
    pub(crate) chunk_blob_size: Histogram,
    /// The estimated L1 commit gas per chunk.
    pub(crate) chunk_l1_commit_gas: Histogram,
    /// The duration of a proposal attempt.
    pub(crate) proposal_duration: Histogram,
}

/// The metrics of the chunks cut for a given reason.
#[derive(Metrics, Clone)]
#[metrics(scope = "chunk_proposer")]
pub(crate) struct ChunkCutMetrics {
    /// The number of chunks cut.
    pub(crate) proposed_chunks_by_reason: Counter,
}
