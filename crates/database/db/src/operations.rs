use super::{models, DatabaseError};
use crate::{models::to_i64, DatabaseConnectionProvider};

use rollup_node_primitives::{Chunk, ChunkInfo, L2BlockData};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// The maximum number of blocks inserted in a single statement, bounded by the number of bound
/// variables a statement can hold.
const L2_BLOCK_INSERT_BATCH_SIZE: usize = 500;

/// The [`DatabaseOperations`] trait provides methods for interacting with the database.
#[async_trait::async_trait]
pub trait DatabaseOperations: DatabaseConnectionProvider {
    /// Insert an [`L2BlockData`] into the database.
    async fn insert_l2_block(&self, block: &L2BlockData) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", block_number = block.number(), block_hash = ?block.header.hash, "Inserting L2 block into database.");
        let block: models::l2_block::ActiveModel = block.try_into()?;
        block.insert(self.get_connection()).await?;
        Ok(())
    }

    /// Insert multiple [`L2BlockData`] into the database.
    async fn insert_l2_blocks(&self, blocks: &[L2BlockData]) -> Result<(), DatabaseError> {
        if blocks.is_empty() {
            return Ok(())
        }
        tracing::trace!(target: "scroll::db", count = blocks.len(), "Inserting L2 blocks into database.");
        for batch in blocks.chunks(L2_BLOCK_INSERT_BATCH_SIZE) {
            let models = batch
                .iter()
                .map(models::l2_block::ActiveModel::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            models::l2_block::Entity::insert_many(models).exec(self.get_connection()).await?;
        }
        Ok(())
    }

    /// Get an [`L2BlockData`] from the database by its block number.
    async fn get_l2_block(&self, block_number: u64) -> Result<Option<L2BlockData>, DatabaseError> {
        models::l2_block::Entity::find_by_id(to_i64(block_number)?)
            .one(self.get_connection())
            .await?
            .map(L2BlockData::try_from)
            .transpose()
    }

    /// Returns up to `limit` blocks which are not assigned to a chunk, starting at the provided
    /// block number, in ascending block number order.
    async fn get_unassigned_l2_blocks(
        &self,
        start_block_number: u64,
        limit: u64,
    ) -> Result<Vec<L2BlockData>, DatabaseError> {
        models::l2_block::Entity::find()
            .filter(models::l2_block::Column::BlockNumber.gte(to_i64(start_block_number)?))
            .filter(models::l2_block::Column::ChunkHash.is_null())
            .order_by_asc(models::l2_block::Column::BlockNumber)
            .limit(limit)
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(L2BlockData::try_from)
            .collect()
    }

    /// Returns the [`ChunkInfo`] of the chunk the block is assigned to, if any.
    async fn get_chunk_info_for_block(
        &self,
        block_number: u64,
    ) -> Result<Option<ChunkInfo>, DatabaseError> {
        Ok(models::l2_block::Entity::find_by_id(to_i64(block_number)?)
            .one(self.get_connection())
            .await?
            .map(|model| model.chunk_info())
            .transpose()?
            .flatten())
    }

    /// Insert a finalized [`Chunk`] into the database at the provided [`ChunkInfo`].
    async fn insert_chunk(&self, info: ChunkInfo, chunk: &Chunk) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", chunk_index = info.index, chunk_hash = ?info.hash, start = chunk.start_block.number, end = chunk.end_block.number, "Inserting chunk into database.");
        let chunk: models::chunk::ActiveModel = (info, chunk).try_into()?;
        chunk.insert(self.get_connection()).await?;
        Ok(())
    }

    /// Assigns the unassigned blocks in the inclusive block number range to the chunk. Returns
    /// the number of blocks that were assigned.
    async fn assign_l2_blocks_to_chunk(
        &self,
        info: ChunkInfo,
        start_block_number: u64,
        end_block_number: u64,
    ) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "scroll::db", chunk_index = info.index, start_block_number, end_block_number, "Assigning L2 blocks to chunk.");
        let result = models::l2_block::Entity::update_many()
            .col_expr(models::l2_block::Column::ChunkIndex, Expr::value(to_i64(info.index)?))
            .col_expr(models::l2_block::Column::ChunkHash, Expr::value(info.hash.to_vec()))
            .filter(
                models::l2_block::Column::BlockNumber
                    .between(to_i64(start_block_number)?, to_i64(end_block_number)?),
            )
            .filter(models::l2_block::Column::ChunkHash.is_null())
            .exec(self.get_connection())
            .await?;
        Ok(result.rows_affected)
    }

    /// Get a [`Chunk`] from the database by its index.
    async fn get_chunk_by_index(&self, index: u64) -> Result<Option<Chunk>, DatabaseError> {
        Ok(models::chunk::Entity::find_by_id(to_i64(index)?)
            .one(self.get_connection())
            .await?
            .map(<(ChunkInfo, Chunk)>::try_from)
            .transpose()?
            .map(|(_, chunk)| chunk))
    }

    /// Get the chunk with the highest index.
    async fn get_latest_chunk(&self) -> Result<Option<(ChunkInfo, Chunk)>, DatabaseError> {
        models::chunk::Entity::find()
            .order_by_desc(models::chunk::Column::Index)
            .one(self.get_connection())
            .await?
            .map(<(ChunkInfo, Chunk)>::try_from)
            .transpose()
    }

    /// Get all the chunks with an index greater or equal to the provided index, in ascending
    /// index order.
    async fn get_chunks_from_index(
        &self,
        index: u64,
    ) -> Result<Vec<(ChunkInfo, Chunk)>, DatabaseError> {
        models::chunk::Entity::find()
            .filter(models::chunk::Column::Index.gte(to_i64(index)?))
            .order_by_asc(models::chunk::Column::Index)
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(<(ChunkInfo, Chunk)>::try_from)
            .collect()
    }
}

impl<T> DatabaseOperations for T where T: DatabaseConnectionProvider + Sync {}
