use sea_orm_migration::{prelude::*, schema::*};

const HASH_LENGTH: u32 = 32;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        tracing::info!(target: "scroll::migration", "Creating chunk table.");
        manager
            .create_table(
                Table::create()
                    .table(Chunk::Table)
                    .if_not_exists()
                    .col(big_integer(Chunk::Index).primary_key())
                    .col(binary_len(Chunk::Hash, HASH_LENGTH).unique_key())
                    .col(big_integer(Chunk::StartBlockNumber))
                    .col(binary_len(Chunk::StartBlockHash, HASH_LENGTH))
                    .col(big_integer(Chunk::EndBlockNumber).unique_key())
                    .col(binary_len(Chunk::EndBlockHash, HASH_LENGTH))
                    .col(big_integer(Chunk::StartBlockTimestamp))
                    .col(small_integer(Chunk::CodecVersion))
                    .col(big_integer(Chunk::NumBlocks))
                    .col(big_integer(Chunk::TotalTxNum))
                    .col(big_integer(Chunk::TotalL1CommitGas))
                    .col(big_integer(Chunk::TotalL1CommitCalldataSize))
                    .col(big_integer(Chunk::RowConsumption))
                    .col(big_integer(Chunk::BlobSize))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Chunk::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Chunk {
    Table,
    Index,
    Hash,
    StartBlockNumber,
    StartBlockHash,
    EndBlockNumber,
    EndBlockHash,
    StartBlockTimestamp,
    CodecVersion,
    NumBlocks,
    TotalTxNum,
    TotalL1CommitGas,
    TotalL1CommitCalldataSize,
    RowConsumption,
    BlobSize,
}
