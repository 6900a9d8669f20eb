use crate::ConfigError;
use rollup_node_primitives::CodecVersion;
use scroll_codec::{constants::MAX_BLOB_BYTES_SIZE, estimation::EstimatorConfig};

/// The default maximum number of blocks in a chunk.
pub const DEFAULT_MAX_BLOCK_NUM_PER_CHUNK: u64 = 100;
/// The default maximum number of transactions in a chunk.
pub const DEFAULT_MAX_TX_NUM_PER_CHUNK: u64 = 100;
/// The default maximum L1 commit gas of a chunk.
pub const DEFAULT_MAX_L1_COMMIT_GAS_PER_CHUNK: u64 = 5_000_000;
/// The default maximum L1 commit calldata size of a chunk.
pub const DEFAULT_MAX_L1_COMMIT_CALLDATA_SIZE_PER_CHUNK: u64 = 123_740;
/// The default maximum row consumption of a chunk.
pub const DEFAULT_MAX_ROW_CONSUMPTION_PER_CHUNK: u64 = 1_000_000;
/// The default chunk timeout in seconds.
pub const DEFAULT_CHUNK_TIMEOUT_SEC: u64 = 300;
/// The default gas cost increase multiplier.
pub const DEFAULT_GAS_COST_INCREASE_MULTIPLIER: f64 = 1.2;
/// The default first block considered for chunk proposing, the first block after genesis.
pub const DEFAULT_START_BLOCK_NUMBER: u64 = 1;
/// The default number of blocks loaded from the block provider at once.
pub const DEFAULT_BLOCK_LOAD_LIMIT: u64 = 256;

/// Configuration for the chunk proposer.
///
/// A limit of zero is inert: it can never be the cause of a cut.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkProposerConfig {
    /// The maximum number of blocks in a chunk.
    pub max_block_num_per_chunk: u64,
    /// The maximum number of transactions in a chunk, L1 messages included.
    pub max_tx_num_per_chunk: u64,
    /// The maximum scaled L1 commit gas of a chunk. Only applies to legacy chunks.
    pub max_l1_commit_gas_per_chunk: u64,
    /// The maximum L1 commit calldata size of a chunk. Only applies to legacy chunks.
    pub max_l1_commit_calldata_size_per_chunk: u64,
    /// The maximum row consumption of a chunk.
    pub max_row_consumption_per_chunk: u64,
    /// The maximum padded blob size of a chunk. Only applies to blob chunks.
    pub max_blob_size: u64,
    /// The number of seconds after the first block of a chunk after which the chunk is closed.
    pub chunk_timeout_sec: u64,
    /// The multiplier applied to the estimated L1 commit gas.
    pub gas_cost_increase_multiplier: f64,
    /// Whether the blob payload is compressed.
    pub blob_compression: bool,
    /// The first block considered when no chunk was finalized yet.
    pub start_block_number: u64,
    /// The number of blocks loaded from the block provider at once.
    pub block_load_limit: u64,
}

impl Default for ChunkProposerConfig {
    fn default() -> Self {
        Self {
            max_block_num_per_chunk: DEFAULT_MAX_BLOCK_NUM_PER_CHUNK,
            max_tx_num_per_chunk: DEFAULT_MAX_TX_NUM_PER_CHUNK,
            max_l1_commit_gas_per_chunk: DEFAULT_MAX_L1_COMMIT_GAS_PER_CHUNK,
            max_l1_commit_calldata_size_per_chunk: DEFAULT_MAX_L1_COMMIT_CALLDATA_SIZE_PER_CHUNK,
            max_row_consumption_per_chunk: DEFAULT_MAX_ROW_CONSUMPTION_PER_CHUNK,
            max_blob_size: MAX_BLOB_BYTES_SIZE,
            chunk_timeout_sec: DEFAULT_CHUNK_TIMEOUT_SEC,
            gas_cost_increase_multiplier: DEFAULT_GAS_COST_INCREASE_MULTIPLIER,
            blob_compression: false,
            start_block_number: DEFAULT_START_BLOCK_NUMBER,
            block_load_limit: DEFAULT_BLOCK_LOAD_LIMIT,
        }
    }
}

impl ChunkProposerConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let multiplier = self.gas_cost_increase_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::InvalidGasCostIncreaseMultiplier(multiplier))
        }
        if self.block_load_limit == 0 {
            return Err(ConfigError::ZeroBlockLoadLimit)
        }
        Ok(())
    }

    /// Returns the configuration of the resource estimation.
    pub const fn estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            gas_cost_increase_multiplier: self.gas_cost_increase_multiplier,
            blob_compression: self.blob_compression,
        }
    }

    /// Returns the names of the limits relevant to the codec version which are set to zero.
    ///
    /// The block number limit of a legacy chunk falls back to the block count of the encoding and
    /// is never inert.
    pub fn inert_limits(&self, version: CodecVersion) -> Vec<&'static str> {
        let mut limits = vec![
            ("max_tx_num_per_chunk", self.max_tx_num_per_chunk),
            ("max_row_consumption_per_chunk", self.max_row_consumption_per_chunk),
        ];
        match version {
            CodecVersion::Legacy => limits.extend([
                ("max_l1_commit_gas_per_chunk", self.max_l1_commit_gas_per_chunk),
                (
                    "max_l1_commit_calldata_size_per_chunk",
                    self.max_l1_commit_calldata_size_per_chunk,
                ),
            ]),
            CodecVersion::BlobCapacity => limits.extend([
                ("max_block_num_per_chunk", self.max_block_num_per_chunk),
                ("max_blob_size", self.max_blob_size),
            ]),
        }
        limits.into_iter().filter(|(_, limit)| *limit == 0).map(|(name, _)| name).collect()
    }
}

/// The chunk proposer arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct ChunkProposerArgs {
    /// The maximum number of blocks in a chunk.
    #[arg(long = "chunk-proposer.max-block-num", id = "chunk_proposer_max_block_num", value_name = "MAX_BLOCK_NUM", env = "CHUNK_PROPOSER_MAX_BLOCK_NUM", default_value_t = DEFAULT_MAX_BLOCK_NUM_PER_CHUNK)]
    pub max_block_num_per_chunk: u64,
    /// The maximum number of transactions in a chunk.
    #[arg(long = "chunk-proposer.max-tx-num", id = "chunk_proposer_max_tx_num", value_name = "MAX_TX_NUM", env = "CHUNK_PROPOSER_MAX_TX_NUM", default_value_t = DEFAULT_MAX_TX_NUM_PER_CHUNK)]
    pub max_tx_num_per_chunk: u64,
    /// The maximum L1 commit gas of a legacy chunk.
    #[arg(long = "chunk-proposer.max-l1-commit-gas", id = "chunk_proposer_max_l1_commit_gas", value_name = "MAX_L1_COMMIT_GAS", env = "CHUNK_PROPOSER_MAX_L1_COMMIT_GAS", default_value_t = DEFAULT_MAX_L1_COMMIT_GAS_PER_CHUNK)]
    pub max_l1_commit_gas_per_chunk: u64,
    /// The maximum L1 commit calldata size of a legacy chunk.
    #[arg(long = "chunk-proposer.max-l1-commit-calldata-size", id = "chunk_proposer_max_l1_commit_calldata_size", value_name = "MAX_L1_COMMIT_CALLDATA_SIZE", env = "CHUNK_PROPOSER_MAX_L1_COMMIT_CALLDATA_SIZE", default_value_t = DEFAULT_MAX_L1_COMMIT_CALLDATA_SIZE_PER_CHUNK)]
    pub max_l1_commit_calldata_size_per_chunk: u64,
    /// The maximum row consumption of a chunk.
    #[arg(long = "chunk-proposer.max-row-consumption", id = "chunk_proposer_max_row_consumption", value_name = "MAX_ROW_CONSUMPTION", env = "CHUNK_PROPOSER_MAX_ROW_CONSUMPTION", default_value_t = DEFAULT_MAX_ROW_CONSUMPTION_PER_CHUNK)]
    pub max_row_consumption_per_chunk: u64,
    /// The maximum padded blob size of a blob chunk.
    #[arg(long = "chunk-proposer.max-blob-size", id = "chunk_proposer_max_blob_size", value_name = "MAX_BLOB_SIZE", env = "CHUNK_PROPOSER_MAX_BLOB_SIZE", default_value_t = MAX_BLOB_BYTES_SIZE)]
    pub max_blob_size: u64,
    /// The chunk timeout in seconds.
    #[arg(long = "chunk-proposer.timeout", id = "chunk_proposer_timeout", value_name = "CHUNK_TIMEOUT_SEC", env = "CHUNK_PROPOSER_TIMEOUT", default_value_t = DEFAULT_CHUNK_TIMEOUT_SEC)]
    pub chunk_timeout_sec: u64,
    /// The multiplier applied to the estimated L1 commit gas.
    #[arg(long = "chunk-proposer.gas-cost-increase-multiplier", id = "chunk_proposer_gas_cost_increase_multiplier", value_name = "MULTIPLIER", env = "CHUNK_PROPOSER_GAS_COST_INCREASE_MULTIPLIER", default_value_t = DEFAULT_GAS_COST_INCREASE_MULTIPLIER)]
    pub gas_cost_increase_multiplier: f64,
    /// Whether the blob payload is compressed.
    #[arg(long = "chunk-proposer.blob-compression", id = "chunk_proposer_blob_compression", env = "CHUNK_PROPOSER_BLOB_COMPRESSION", default_value_t = false)]
    pub blob_compression: bool,
    /// The first block considered when no chunk was finalized yet.
    #[arg(long = "chunk-proposer.start-block", id = "chunk_proposer_start_block", value_name = "BLOCK_NUMBER", env = "CHUNK_PROPOSER_START_BLOCK", default_value_t = DEFAULT_START_BLOCK_NUMBER)]
    pub start_block_number: u64,
    /// The number of blocks loaded from the block provider at once.
    #[arg(long = "chunk-proposer.block-load-limit", id = "chunk_proposer_block_load_limit", value_name = "LIMIT", env = "CHUNK_PROPOSER_BLOCK_LOAD_LIMIT", default_value_t = DEFAULT_BLOCK_LOAD_LIMIT)]
    pub block_load_limit: u64,
}

impl Default for ChunkProposerArgs {
    fn default() -> Self {
        ChunkProposerConfig::default().into()
    }
}

impl From<ChunkProposerConfig> for ChunkProposerArgs {
    fn from(config: ChunkProposerConfig) -> Self {
        Self {
            max_block_num_per_chunk: config.max_block_num_per_chunk,
            max_tx_num_per_chunk: config.max_tx_num_per_chunk,
            max_l1_commit_gas_per_chunk: config.max_l1_commit_gas_per_chunk,
            max_l1_commit_calldata_size_per_chunk: config.max_l1_commit_calldata_size_per_chunk,
            max_row_consumption_per_chunk: config.max_row_consumption_per_chunk,
            max_blob_size: config.max_blob_size,
            chunk_timeout_sec: config.chunk_timeout_sec,
            gas_cost_increase_multiplier: config.gas_cost_increase_multiplier,
            blob_compression: config.blob_compression,
            start_block_number: config.start_block_number,
            block_load_limit: config.block_load_limit,
        }
    }
}

impl TryFrom<ChunkProposerArgs> for ChunkProposerConfig {
    type Error = ConfigError;

    fn try_from(args: ChunkProposerArgs) -> Result<Self, Self::Error> {
        let config = Self {
            max_block_num_per_chunk: args.max_block_num_per_chunk,
            max_tx_num_per_chunk: args.max_tx_num_per_chunk,
            max_l1_commit_gas_per_chunk: args.max_l1_commit_gas_per_chunk,
            max_l1_commit_calldata_size_per_chunk: args.max_l1_commit_calldata_size_per_chunk,
            max_row_consumption_per_chunk: args.max_row_consumption_per_chunk,
            max_blob_size: args.max_blob_size,
            chunk_timeout_sec: args.chunk_timeout_sec,
            gas_cost_increase_multiplier: args.gas_cost_increase_multiplier,
            blob_compression: args.blob_compression,
            start_block_number: args.start_block_number,
            block_load_limit: args.block_load_limit,
        };
        config.validate()?;
        Ok(config)
    }
}
