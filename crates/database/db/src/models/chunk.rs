use super::{to_b256, to_i64};
use crate::DatabaseError;

use rollup_node_primitives::{BlockInfo, Chunk, ChunkInfo, ChunkTotals, CodecVersion};
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a finalized chunk.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "chunk")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    index: i64,
    hash: Vec<u8>,
    start_block_number: i64,
    start_block_hash: Vec<u8>,
    end_block_number: i64,
    end_block_hash: Vec<u8>,
    start_block_timestamp: i64,
    codec_version: i16,
    num_blocks: i64,
    total_tx_num: i64,
    total_l1_commit_gas: i64,
    total_l1_commit_calldata_size: i64,
    row_consumption: i64,
    blob_size: i64,
}

/// The relation for the chunk model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The blocks assigned to the chunk.
    #[sea_orm(has_many = "super::l2_block::Entity")]
    L2Block,
}

impl Related<super::l2_block::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::L2Block.def()
    }
}

/// The active model behavior for the chunk model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(ChunkInfo, &Chunk)> for ActiveModel {
    type Error = DatabaseError;

    fn try_from((info, chunk): (ChunkInfo, &Chunk)) -> Result<Self, Self::Error> {
        Ok(Self {
            index: ActiveValue::Set(to_i64(info.index)?),
            hash: ActiveValue::Set(info.hash.to_vec()),
            start_block_number: ActiveValue::Set(to_i64(chunk.start_block.number)?),
            start_block_hash: ActiveValue::Set(chunk.start_block.hash.to_vec()),
            end_block_number: ActiveValue::Set(to_i64(chunk.end_block.number)?),
            end_block_hash: ActiveValue::Set(chunk.end_block.hash.to_vec()),
            start_block_timestamp: ActiveValue::Set(to_i64(chunk.start_block_timestamp)?),
            codec_version: ActiveValue::Set(chunk.codec_version as i16),
            num_blocks: ActiveValue::Set(to_i64(chunk.totals.num_blocks)?),
            total_tx_num: ActiveValue::Set(to_i64(chunk.totals.tx_num)?),
            total_l1_commit_gas: ActiveValue::Set(to_i64(chunk.totals.l1_commit_gas)?),
            total_l1_commit_calldata_size: ActiveValue::Set(to_i64(
                chunk.totals.l1_commit_calldata_size,
            )?),
            row_consumption: ActiveValue::Set(to_i64(chunk.totals.row_consumption)?),
            blob_size: ActiveValue::Set(to_i64(chunk.totals.blob_size)?),
        })
    }
}

impl TryFrom<Model> for (ChunkInfo, Chunk) {
    type Error = DatabaseError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        let hash = to_b256(&value.hash, "chunk hash")?;
        let codec_version = u8::try_from(value.codec_version)
            .ok()
            .and_then(|version| CodecVersion::try_from(version).ok())
            .ok_or_else(|| DatabaseError::invalid_data("codec version", value.codec_version))?;

        let chunk = Chunk {
            hash,
            start_block: BlockInfo::new(
                value.start_block_number as u64,
                to_b256(&value.start_block_hash, "start block hash")?,
            ),
            end_block: BlockInfo::new(
                value.end_block_number as u64,
                to_b256(&value.end_block_hash, "end block hash")?,
            ),
            start_block_timestamp: value.start_block_timestamp as u64,
            codec_version,
            totals: ChunkTotals {
                num_blocks: value.num_blocks as u64,
                tx_num: value.total_tx_num as u64,
                l1_commit_gas: value.total_l1_commit_gas as u64,
                l1_commit_calldata_size: value.total_l1_commit_calldata_size as u64,
                row_consumption: value.row_consumption as u64,
                blob_size: value.blob_size as u64,
            },
        };

        Ok((ChunkInfo::new(value.index as u64, hash), chunk))
    }
}
