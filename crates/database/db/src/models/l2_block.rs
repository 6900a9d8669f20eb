use super::{to_b256, to_i64};
use crate::DatabaseError;

use alloy_primitives::{Bytes, U256};
use rollup_node_primitives::{ChunkInfo, L2BlockData, L2BlockHeader, RowConsumption};
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents an L2 block and the chunk it is assigned to, if any.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "l2_block")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    block_number: i64,
    block_hash: Vec<u8>,
    parent_hash: Vec<u8>,
    timestamp: i64,
    base_fee: Vec<u8>,
    gas_limit: i64,
    tx_num: i64,
    transactions: Vec<u8>,
    row_consumption: Option<String>,
    chunk_index: Option<i64>,
    chunk_hash: Option<Vec<u8>>,
}

impl Model {
    /// Returns the [`ChunkInfo`] of the chunk the block is assigned to.
    pub(crate) fn chunk_info(&self) -> Result<Option<ChunkInfo>, DatabaseError> {
        match (self.chunk_index, &self.chunk_hash) {
            (Some(index), Some(hash)) => {
                Ok(Some(ChunkInfo::new(index as u64, to_b256(hash, "chunk hash")?)))
            }
            _ => Ok(None),
        }
    }
}

/// The relation for the L2 block model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A relation with the chunk table, where the chunk index column of the block table belongs
    /// to the index column of the chunk table.
    #[sea_orm(
        belongs_to = "super::chunk::Entity",
        from = "Column::ChunkIndex",
        to = "super::chunk::Column::Index"
    )]
    Chunk,
}

impl Related<super::chunk::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chunk.def()
    }
}

/// The active model behavior for the L2 block model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&L2BlockData> for ActiveModel {
    type Error = DatabaseError;

    fn try_from(block: &L2BlockData) -> Result<Self, Self::Error> {
        let row_consumption = block
            .row_consumption
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|err| DatabaseError::invalid_data("row consumption", err))?;

        Ok(Self {
            block_number: ActiveValue::Set(to_i64(block.header.number)?),
            block_hash: ActiveValue::Set(block.header.hash.to_vec()),
            parent_hash: ActiveValue::Set(block.header.parent_hash.to_vec()),
            timestamp: ActiveValue::Set(to_i64(block.header.timestamp)?),
            base_fee: ActiveValue::Set(block.header.base_fee.to_be_bytes::<32>().to_vec()),
            gas_limit: ActiveValue::Set(to_i64(block.header.gas_limit)?),
            tx_num: ActiveValue::Set(to_i64(block.num_transactions())?),
            transactions: ActiveValue::Set(encode_transactions(&block.transactions)?),
            row_consumption: ActiveValue::Set(row_consumption),
            chunk_index: ActiveValue::Set(None),
            chunk_hash: ActiveValue::Set(None),
        })
    }
}

impl TryFrom<Model> for L2BlockData {
    type Error = DatabaseError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        let header = L2BlockHeader {
            number: value.block_number as u64,
            hash: to_b256(&value.block_hash, "block hash")?,
            parent_hash: to_b256(&value.parent_hash, "parent hash")?,
            timestamp: value.timestamp as u64,
            base_fee: U256::try_from_be_slice(&value.base_fee)
                .ok_or_else(|| DatabaseError::invalid_data("base fee", "exceeds 32 bytes"))?,
            gas_limit: value.gas_limit as u64,
        };
        let transactions = decode_transactions(&value.transactions)?;
        if transactions.len() as i64 != value.tx_num {
            return Err(DatabaseError::invalid_data(
                "transactions",
                format!("expected {} transactions, decoded {}", value.tx_num, transactions.len()),
            ))
        }
        let row_consumption = value
            .row_consumption
            .as_deref()
            .map(serde_json::from_str::<RowConsumption>)
            .transpose()
            .map_err(|err| DatabaseError::invalid_data("row consumption", err))?;

        Ok(Self { header, transactions, row_consumption })
    }
}

/// Encodes the transactions as a sequence of 4 bytes big endian length prefixed payloads.
fn encode_transactions(transactions: &[Bytes]) -> Result<Vec<u8>, DatabaseError> {
    let mut buf = Vec::with_capacity(transactions.iter().map(|tx| tx.len() + 4).sum());
    for tx in transactions {
        let len = u32::try_from(tx.len())
            .map_err(|_| DatabaseError::invalid_data("transactions", "payload exceeds 4GiB"))?;
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(tx);
    }
    Ok(buf)
}

/// Decodes the length prefixed transactions written by [`encode_transactions`].
fn decode_transactions(mut buf: &[u8]) -> Result<Vec<Bytes>, DatabaseError> {
    let mut transactions = Vec::new();
    while !buf.is_empty() {
        let (prefix, rest) = buf
            .split_first_chunk::<4>()
            .ok_or_else(|| DatabaseError::invalid_data("transactions", "truncated length"))?;
        let len = u32::from_be_bytes(*prefix) as usize;
        if rest.len() < len {
            return Err(DatabaseError::invalid_data("transactions", "truncated payload"))
        }
        let (tx, rest) = rest.split_at(len);
        transactions.push(Bytes::copy_from_slice(tx));
        buf = rest;
    }
    Ok(transactions)
}
