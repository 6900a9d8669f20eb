//! Primitive types for the Rollup Node chunk proposer.

pub use block::{
    is_l1_message, BlockInfo, L2BlockData, L2BlockHeader, L1_MESSAGE_TRANSACTION_TYPE,
};
mod block;

pub use chain::{ForkSchedule, Hardfork, Hardforks};
mod chain;

pub use chunk::{Chunk, ChunkInfo, ChunkTotals, CodecVersion};
mod chunk;

pub use error::RollupNodePrimitiveError;
mod error;

pub use row::{RowConsumption, SubCircuitRowUsage};
mod row;
