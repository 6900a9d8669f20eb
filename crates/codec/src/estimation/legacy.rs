//! The L1 commit cost model of the legacy calldata codec.

use crate::constants::{
    BLOCK_CONTEXT_BYTES_SIZE, BLOCK_CONTEXT_HASH_BYTES_SIZE, CALLDATA_NON_ZERO_BYTE_GAS,
    COLD_SLOAD_GAS, KECCAK_256_DIGEST_BYTES_SIZE, L1_MESSAGE_QUEUE_CALL_BYTES_SIZE,
    TRANSACTION_LENGTH_PREFIX_BYTES_SIZE, WARM_ACCESS_GAS,
};

use rollup_node_primitives::L2BlockData;

/// Returns the gas cost of expanding memory to the provided size in bytes.
pub const fn memory_expansion_cost(memory_byte_size: u64) -> u64 {
    let memory_size_word = memory_byte_size.div_ceil(32);
    memory_size_word * memory_size_word / 512 + 3 * memory_size_word
}

/// Returns the gas cost of hashing the provided number of bytes with keccak256.
pub const fn keccak256_gas(size: u64) -> u64 {
    memory_expansion_cost(size) + 30 + 6 * size.div_ceil(32)
}

/// Returns the L1 commit gas of a single block, excluding the chunk level overhead.
///
/// Every calldata byte is priced as a non-zero byte, which over-estimates the cost.
pub fn block_l1_commit_gas(block: &L2BlockData) -> u64 {
    let mut total = 0;
    let mut num_l1_messages = 0;
    for tx in &block.transactions {
        if rollup_node_primitives::is_l1_message(tx) {
            num_l1_messages += 1;
            continue;
        }
        let payload_length = tx.len() as u64;
        total += CALLDATA_NON_ZERO_BYTE_GAS * payload_length;
        total += CALLDATA_NON_ZERO_BYTE_GAS * TRANSACTION_LENGTH_PREFIX_BYTES_SIZE;
        total += keccak256_gas(payload_length);
    }

    total += CALLDATA_NON_ZERO_BYTE_GAS * BLOCK_CONTEXT_BYTES_SIZE as u64;

    // reading each L1 message from the queue: cold sload, static call and warm access to the
    // queue, memory expansion for the proxy and the implementation calls.
    total += num_l1_messages *
        (COLD_SLOAD_GAS +
            2 * WARM_ACCESS_GAS +
            2 * memory_expansion_cost(L1_MESSAGE_QUEUE_CALL_BYTES_SIZE));

    total
}

/// Returns the chunk level L1 commit gas on top of the sum of the blocks' gas.
pub const fn chunk_l1_commit_overhead_gas(num_blocks: u64, total_tx_num: u64) -> u64 {
    if num_blocks == 0 {
        return 0
    }
    let mut total = WARM_ACCESS_GAS * num_blocks;
    // the block count of the chunk encoding.
    total += CALLDATA_NON_ZERO_BYTE_GAS;
    total += CALLDATA_NON_ZERO_BYTE_GAS * num_blocks * BLOCK_CONTEXT_BYTES_SIZE as u64;
    total += keccak256_gas(
        BLOCK_CONTEXT_HASH_BYTES_SIZE as u64 * num_blocks +
            KECCAK_256_DIGEST_BYTES_SIZE * total_tx_num,
    );
    total
}

/// Returns the L1 commit calldata size in bytes of a single block.
pub fn block_l1_commit_calldata_size(block: &L2BlockData) -> u64 {
    BLOCK_CONTEXT_BYTES_SIZE as u64 +
        block
            .l2_transactions()
            .map(|tx| TRANSACTION_LENGTH_PREFIX_BYTES_SIZE + tx.len() as u64)
            .sum::<u64>()
}

/// Scales the provided gas by the multiplier, rounding down.
pub fn scale_gas(gas: u64, multiplier: f64) -> u64 {
    (gas as f64 * multiplier) as u64
}
