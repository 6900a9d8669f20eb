use crate::RowConsumption;

use alloy_primitives::{keccak256, Bytes, B256, U256};

/// The EIP-2718 type byte of an L1 message transaction.
pub const L1_MESSAGE_TRANSACTION_TYPE: u8 = 0x7e;

/// Returns true if the provided EIP-2718 encoded transaction is an L1 message.
pub fn is_l1_message(transaction: &[u8]) -> bool {
    transaction.first() == Some(&L1_MESSAGE_TRANSACTION_TYPE)
}

/// Information about a block.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    /// The block number.
    pub number: u64,
    /// The block hash.
    pub hash: B256,
}

impl BlockInfo {
    /// Returns a new instance of [`BlockInfo`].
    pub const fn new(number: u64, hash: B256) -> Self {
        Self { number, hash }
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for BlockInfo {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let number = u.int_in_range(0..=u32::MAX)?;
        let hash = B256::arbitrary(u)?;
        Ok(Self { number: number as u64, hash })
    }
}

/// The header fields of an L2 block which are relevant to chunk proposing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct L2BlockHeader {
    /// The block number.
    pub number: u64,
    /// The block hash.
    pub hash: B256,
    /// The hash of the parent block.
    pub parent_hash: B256,
    /// The block timestamp in seconds.
    pub timestamp: u64,
    /// The block base fee.
    pub base_fee: U256,
    /// The block gas limit.
    pub gas_limit: u64,
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for L2BlockHeader {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(Self {
            number: u.int_in_range(0..=u32::MAX)? as u64,
            hash: B256::arbitrary(u)?,
            parent_hash: B256::arbitrary(u)?,
            timestamp: u.int_in_range(0..=u32::MAX)? as u64,
            base_fee: U256::from(u.int_in_range(0..=u64::MAX >> 1)?),
            gas_limit: u.int_in_range(0..=i64::MAX as u64)?,
        })
    }
}

/// An L2 block as produced by the execution layer, along with the trace metrics needed to
/// estimate the resources it consumes in a chunk.
///
/// Blocks are immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct L2BlockData {
    /// The block header.
    pub header: L2BlockHeader,
    /// The EIP-2718 encoded transactions of the block, L1 messages included.
    pub transactions: Vec<Bytes>,
    /// The row consumption of the block, reported by the trace generation.
    pub row_consumption: Option<RowConsumption>,
}

impl L2BlockData {
    /// Returns a new instance of an [`L2BlockData`].
    pub const fn new(
        header: L2BlockHeader,
        transactions: Vec<Bytes>,
        row_consumption: Option<RowConsumption>,
    ) -> Self {
        Self { header, transactions, row_consumption }
    }

    /// Returns the block number.
    pub const fn number(&self) -> u64 {
        self.header.number
    }

    /// Returns the block timestamp.
    pub const fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    /// Returns the [`BlockInfo`] for the block.
    pub const fn block_info(&self) -> BlockInfo {
        BlockInfo { number: self.header.number, hash: self.header.hash }
    }

    /// Returns the total number of transactions in the block, L1 messages included.
    pub fn num_transactions(&self) -> u64 {
        self.transactions.len() as u64
    }

    /// Returns the number of L1 messages in the block.
    pub fn num_l1_messages(&self) -> u64 {
        self.transactions.iter().filter(|tx| is_l1_message(tx)).count() as u64
    }

    /// Returns an iterator over the L2 transactions of the block.
    pub fn l2_transactions(&self) -> impl Iterator<Item = &Bytes> {
        self.transactions.iter().filter(|tx| !is_l1_message(tx))
    }

    /// Returns an iterator over the hashes of all the transactions of the block.
    pub fn transaction_hashes(&self) -> impl Iterator<Item = B256> + '_ {
        self.transactions.iter().map(keccak256)
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for L2BlockData {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let header = L2BlockHeader::arbitrary(u)?;
        let count = u.int_in_range(0..=8)?;
        let mut transactions = Vec::with_capacity(count);
        for _ in 0..count {
            let len = u.int_in_range(1..=256)?;
            transactions.push(Bytes::from(u.bytes(len)?.to_vec()));
        }
        let row_consumption = Option::<RowConsumption>::arbitrary(u)?;
        Ok(Self { header, transactions, row_consumption })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::bytes;

    #[test]
    fn test_should_split_l1_messages_from_l2_transactions() {
        let block = L2BlockData {
            header: L2BlockHeader { number: 7, timestamp: 100, ..Default::default() },
            transactions: vec![bytes!("7e01"), bytes!("02aabb"), bytes!("f801"), bytes!("7e02")],
            row_consumption: None,
        };

        assert_eq!(block.num_transactions(), 4);
        assert_eq!(block.num_l1_messages(), 2);
        assert_eq!(block.l2_transactions().cloned().collect::<Vec<_>>(), vec![
            bytes!("02aabb"),
            bytes!("f801")
        ]);
        assert_eq!(block.transaction_hashes().count(), 4);
        assert_eq!(block.block_info(), BlockInfo::new(7, B256::ZERO));
    }

    #[test]
    fn test_empty_transaction_is_not_an_l1_message() {
        assert!(!is_l1_message(&[]));
        assert!(is_l1_message(&[L1_MESSAGE_TRANSACTION_TYPE, 0x01]));
    }
}
