use rollup_node_providers::ProviderError;
use scroll_codec::CodecError;

/// An error type for the chunk proposer.
#[derive(Debug, thiserror::Error)]
pub enum ChunkProposerError {
    /// The chunk proposer encountered an error when interacting with a provider.
    #[error("Encountered an error interacting with the provider: {0}")]
    Provider(#[from] ProviderError),
    /// The chunk proposer encountered an error when estimating the resources of a block.
    #[error("Encountered an error estimating block resources: {0}")]
    Codec(#[from] CodecError),
    /// The unassigned blocks received are not contiguous.
    #[error("Unassigned blocks are not contiguous: got {got}, expected {expected}")]
    NonContiguousBlock {
        /// The block number received.
        got: u64,
        /// The expected block number.
        expected: u64,
    },
}

impl ChunkProposerError {
    /// Returns true if the error was caused by reading invalid or unavailable blocks.
    pub const fn is_read_error(&self) -> bool {
        match self {
            Self::Provider(err) => err.is_read(),
            Self::Codec(_) | Self::NonContiguousBlock { .. } => true,
        }
    }
}

/// An error in the chunk proposer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The gas cost increase multiplier is not a finite number greater or equal to one.
    #[error("invalid gas cost increase multiplier {0}, expected a finite value >= 1.0")]
    InvalidGasCostIncreaseMultiplier(f64),
    /// The block load limit is zero.
    #[error("block load limit must be greater than zero")]
    ZeroBlockLoadLimit,
}
