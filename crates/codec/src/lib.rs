//! The codec implementation for Scroll chunks: block context encoding, codec version selection,
//! chunk hashing and the resource estimation used to pack blocks into chunks.

pub use block::BlockContext;
pub mod block;

pub mod constants;

pub use error::CodecError;
mod error;

pub use estimation::{estimate_block, estimate_chunk, BlockResources, ChunkEstimator, EstimatorConfig};
pub mod estimation;

pub use hash::chunk_hash;
mod hash;

pub use version::codec_version_for_block;
mod version;
