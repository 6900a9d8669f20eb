//! Block context implementation.

use crate::constants::BLOCK_CONTEXT_BYTES_SIZE;

use alloy_primitives::U256;
use rollup_node_primitives::L2BlockData;

/// The block's context, as committed in a chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// The block number.
    pub number: u64,
    /// The block timestamp.
    pub timestamp: u64,
    /// The block base fee.
    pub base_fee: U256,
    /// The block gas limit.
    pub gas_limit: u64,
    /// The block's transaction count, L1 messages included.
    pub num_transactions: u16,
    /// The block's l1 message count.
    pub num_l1_messages: u16,
}

impl BlockContext {
    /// The size in bytes of an encoded [`BlockContext`].
    pub const BYTES_LENGTH: usize = BLOCK_CONTEXT_BYTES_SIZE;

    /// Encodes the [`BlockContext`] as
    /// `number || timestamp || base_fee || gas_limit || num_transactions || num_l1_messages`,
    /// all fields big endian.
    pub fn encode(&self) -> [u8; Self::BYTES_LENGTH] {
        let mut buf = [0u8; Self::BYTES_LENGTH];
        buf[0..8].copy_from_slice(&self.number.to_be_bytes());
        buf[8..16].copy_from_slice(&self.timestamp.to_be_bytes());
        buf[16..48].copy_from_slice(&self.base_fee.to_be_bytes::<32>());
        buf[48..56].copy_from_slice(&self.gas_limit.to_be_bytes());
        buf[56..58].copy_from_slice(&self.num_transactions.to_be_bytes());
        buf[58..60].copy_from_slice(&self.num_l1_messages.to_be_bytes());
        buf
    }
}

impl From<&L2BlockData> for BlockContext {
    fn from(block: &L2BlockData) -> Self {
        Self {
            number: block.header.number,
            timestamp: block.header.timestamp,
            base_fee: block.header.base_fee,
            gas_limit: block.header.gas_limit,
            num_transactions: u16::try_from(block.num_transactions()).unwrap_or(u16::MAX),
            num_l1_messages: u16::try_from(block.num_l1_messages()).unwrap_or(u16::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{bytes, hex};
    use rollup_node_primitives::L2BlockHeader;

    #[test]
    fn test_should_encode_block_context() {
        let block = L2BlockData {
            header: L2BlockHeader {
                number: 680,
                timestamp: 1696933798,
                base_fee: U256::from(0x1234),
                gas_limit: 10000000,
                ..Default::default()
            },
            transactions: vec![bytes!("7e00"), bytes!("02ff")],
            row_consumption: None,
        };

        let encoded = BlockContext::from(&block).encode();

        let expected = hex!("00000000000002a800000000652527a60000000000000000000000000000000000000000000000000000000000001234000000000098968000020001");
        assert_eq!(encoded, expected);
    }
}
