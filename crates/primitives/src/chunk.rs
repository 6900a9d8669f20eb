use crate::{BlockInfo, RollupNodePrimitiveError};
use alloy_primitives::B256;
use core::ops::RangeInclusive;

/// The codec version of a chunk, which selects the constraint set the chunk is built under.
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum CodecVersion {
    /// The legacy codec, committing the chunk data in calldata. Bounded by the commit gas and
    /// calldata size.
    #[default]
    Legacy = 0,
    /// The blob codec, committing the chunk data in a blob. Bounded by the blob capacity.
    BlobCapacity = 1,
}

impl CodecVersion {
    /// Returns the name of the codec version.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::BlobCapacity => "blob_capacity",
        }
    }
}

impl TryFrom<u8> for CodecVersion {
    type Error = RollupNodePrimitiveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Legacy),
            1 => Ok(Self::BlobCapacity),
            v => Err(RollupNodePrimitiveError::UnknownCodecVersion(v)),
        }
    }
}

impl core::fmt::Display for CodecVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The aggregated resource usage of a chunk.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct ChunkTotals {
    /// The number of blocks.
    pub num_blocks: u64,
    /// The number of transactions, L1 messages included.
    pub tx_num: u64,
    /// The estimated L1 commit gas, scaled by the gas cost increase multiplier.
    pub l1_commit_gas: u64,
    /// The estimated L1 commit calldata size in bytes.
    pub l1_commit_calldata_size: u64,
    /// The highest sub-circuit row consumption.
    pub row_consumption: u64,
    /// The estimated padded blob size in bytes.
    pub blob_size: u64,
}

/// Identifies a finalized chunk.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct ChunkInfo {
    /// The index of the chunk.
    pub index: u64,
    /// The hash of the chunk.
    pub hash: B256,
}

impl ChunkInfo {
    /// Returns a new instance of [`ChunkInfo`].
    pub const fn new(index: u64, hash: B256) -> Self {
        Self { index, hash }
    }
}

/// A [`Chunk`] is a contiguous range of L2 blocks which are settled together to L1.
///
/// A chunk is immutable once finalized. All the blocks of a chunk share the same
/// [`CodecVersion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The hash of the chunk.
    pub hash: B256,
    /// The first block of the chunk.
    pub start_block: BlockInfo,
    /// The last block of the chunk.
    pub end_block: BlockInfo,
    /// The timestamp of the first block of the chunk.
    pub start_block_timestamp: u64,
    /// The codec version of the chunk.
    pub codec_version: CodecVersion,
    /// The aggregated resource usage of the chunk.
    pub totals: ChunkTotals,
}

impl Chunk {
    /// Returns the range of block numbers contained in the chunk.
    pub const fn block_range(&self) -> RangeInclusive<u64> {
        self.start_block.number..=self.end_block.number
    }

    /// Returns the number of blocks in the chunk.
    pub const fn num_blocks(&self) -> u64 {
        self.end_block.number - self.start_block.number + 1
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for Chunk {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let start = u.int_in_range(1..=u32::MAX as u64)?;
        let len = u.int_in_range(1..=1_000)?;
        let start_block = BlockInfo::new(start, B256::arbitrary(u)?);
        let end_block = BlockInfo::new(start + len - 1, B256::arbitrary(u)?);
        let mut totals = ChunkTotals::arbitrary(u)?;
        totals.num_blocks = len;
        // values are persisted as signed 64 bit integers.
        totals.tx_num >>= 1;
        totals.l1_commit_gas >>= 1;
        totals.l1_commit_calldata_size >>= 1;
        totals.row_consumption >>= 1;
        totals.blob_size >>= 1;
        Ok(Self {
            hash: B256::arbitrary(u)?,
            start_block,
            end_block,
            start_block_timestamp: u.int_in_range(0..=u32::MAX as u64)?,
            codec_version: CodecVersion::arbitrary(u)?,
            totals,
        })
    }
}
