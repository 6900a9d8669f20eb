//! Constants of the chunk encoding and of the L1 commit cost model.

use alloy_eips::eip4844::BYTES_PER_BLOB;

/// The gas cost of a non-zero byte of calldata.
pub const CALLDATA_NON_ZERO_BYTE_GAS: u64 = 16;

/// The size in bytes of an encoded block context.
pub const BLOCK_CONTEXT_BYTES_SIZE: usize = 60;

/// The number of leading block context bytes included in the chunk hash.
pub const BLOCK_CONTEXT_HASH_BYTES_SIZE: usize = 58;

/// The size in bytes of the length prefix of a transaction in the calldata encoding.
pub const TRANSACTION_LENGTH_PREFIX_BYTES_SIZE: u64 = 4;

/// The length in bytes of the Keccak 256 hash digest.
pub const KECCAK_256_DIGEST_BYTES_SIZE: u64 = 32;

/// The cost of a cold storage load.
pub const COLD_SLOAD_GAS: u64 = 2100;

/// The cost of a warm storage load or a warm account access.
pub const WARM_ACCESS_GAS: u64 = 100;

/// The size in bytes of the call data used to read an L1 message from the queue.
pub const L1_MESSAGE_QUEUE_CALL_BYTES_SIZE: u64 = 36;

/// The maximum number of chunks a batch can commit to.
pub const MAX_NUM_CHUNKS_PER_BATCH: u64 = 15;

/// The size in bytes of the blob metadata section: the number of chunks followed by the size
/// of each chunk.
pub const BLOB_METADATA_BYTES_SIZE: u64 = 2 + 4 * MAX_NUM_CHUNKS_PER_BATCH;

/// The number of bytes of a blob field element which can carry data. The first byte of every 32
/// bytes field element is left empty to keep the element below the BLS modulus.
pub const USABLE_BYTES_PER_FIELD_ELEMENT: u64 = 31;

/// The size in bytes of a field element.
pub const BYTES_PER_FIELD_ELEMENT: u64 = 32;

/// The maximum padded size in bytes of a blob.
pub const MAX_BLOB_BYTES_SIZE: u64 = BYTES_PER_BLOB as u64;

/// The legacy chunk encoding stores the number of blocks in a single byte.
pub const MAX_BLOCKS_PER_LEGACY_CHUNK: u64 = u8::MAX as u64;

/// The zstd compression level applied to the blob payload.
pub const ZSTD_COMPRESSION_LEVEL: i32 = 22;
