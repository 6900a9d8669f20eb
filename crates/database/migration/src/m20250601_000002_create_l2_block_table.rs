use super::m20250601_000001_create_chunk_table::Chunk;

use sea_orm_migration::{prelude::*, schema::*};

const HASH_LENGTH: u32 = 32;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        tracing::info!(target: "scroll::migration", "Creating l2_block table.");
        manager
            .create_table(
                Table::create()
                    .table(L2Block::Table)
                    .if_not_exists()
                    .col(big_integer(L2Block::BlockNumber).primary_key())
                    .col(binary_len(L2Block::BlockHash, HASH_LENGTH))
                    .col(binary_len(L2Block::ParentHash, HASH_LENGTH))
                    .col(big_integer(L2Block::Timestamp))
                    .col(binary_len(L2Block::BaseFee, HASH_LENGTH))
                    .col(big_integer(L2Block::GasLimit))
                    .col(big_integer(L2Block::TxNum))
                    .col(binary(L2Block::Transactions))
                    .col(text_null(L2Block::RowConsumption))
                    .col(big_integer_null(L2Block::ChunkIndex))
                    .col(binary_len_null(L2Block::ChunkHash, HASH_LENGTH))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chunk_index")
                            .from(L2Block::Table, L2Block::ChunkIndex)
                            .to(Chunk::Table, Chunk::Index)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_l2_block_chunk_index")
                    .table(L2Block::Table)
                    .col(L2Block::ChunkIndex)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(L2Block::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum L2Block {
    Table,
    BlockNumber,
    BlockHash,
    ParentHash,
    Timestamp,
    BaseFee,
    GasLimit,
    TxNum,
    Transactions,
    RowConsumption,
    ChunkIndex,
    ChunkHash,
}
