//! The crate exposes the providers the chunk proposer reads blocks from and writes chunks to,
//! along with their database implementations.

pub use block::L2BlockProvider;
mod block;

pub use chunk::ChunkStore;
mod chunk;

pub use error::ProviderError;
mod error;

/// Test utilities for the providers.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
