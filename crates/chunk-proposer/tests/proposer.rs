//! Tests for the chunk proposer.

use alloy_primitives::{Bytes, B256};
use rollup_node_chunk_proposer::{ChunkProposer, ChunkProposerConfig, ChunkProposerError};
use rollup_node_primitives::{
    Chunk, ChunkInfo, CodecVersion, ForkSchedule, Hardfork, L2BlockData, L2BlockHeader,
    RowConsumption, SubCircuitRowUsage,
};
use rollup_node_providers::{test_utils::InMemoryChunkProvider, ChunkStore};
use scroll_codec::estimate_chunk;
use scroll_db::{test_utils::setup_test_db, Database, DatabaseOperations};
use std::sync::Arc;

/// The time at which the proposals are made.
const NOW: u64 = 1_700_000_000;

/// A chunk timeout that never elapses.
const NEVER: u64 = 1_000_000_000_000;

/// Returns a block with the provided number of 100 bytes L2 transactions.
fn block_with_txs(number: u64, txs: usize) -> L2BlockData {
    L2BlockData {
        header: L2BlockHeader {
            number,
            hash: B256::left_padding_from(&number.to_be_bytes()),
            parent_hash: B256::left_padding_from(&(number - 1).to_be_bytes()),
            timestamp: NOW - 100 + number,
            gas_limit: 10_000_000,
            ..Default::default()
        },
        transactions: (0..txs).map(|i| Bytes::from(vec![0x02, i as u8].repeat(50))).collect(),
        row_consumption: Some(RowConsumption::from(vec![
            SubCircuitRowUsage::new("evm", 10),
            SubCircuitRowUsage::new("keccak", 4),
        ])),
    }
}

fn block(number: u64) -> L2BlockData {
    block_with_txs(number, 2)
}

fn config(chunk_timeout_sec: u64) -> ChunkProposerConfig {
    ChunkProposerConfig {
        max_block_num_per_chunk: 100,
        max_tx_num_per_chunk: 10_000,
        max_l1_commit_gas_per_chunk: 50_000_000_000,
        max_l1_commit_calldata_size_per_chunk: 1_000_000,
        max_row_consumption_per_chunk: 1_000_000,
        chunk_timeout_sec,
        gas_cost_increase_multiplier: 1.2,
        ..Default::default()
    }
}

async fn setup_db(blocks: &[L2BlockData]) -> eyre::Result<Arc<Database>> {
    let db = Arc::new(setup_test_db().await);
    db.insert_l2_blocks(blocks).await?;
    Ok(db)
}

/// Asserts the chunks are contiguous, do not overlap, and that exactly their blocks are assigned.
async fn assert_partition(db: &Database, start: u64, chunks: &[(ChunkInfo, Chunk)]) {
    let mut next = start;
    for (i, (info, chunk)) in chunks.iter().enumerate() {
        assert_eq!(info.index, i as u64);
        assert_eq!(chunk.start_block.number, next);
        assert!(chunk.end_block.number >= chunk.start_block.number);
        for number in chunk.block_range() {
            assert_eq!(db.get_chunk_info_for_block(number).await.unwrap(), Some(*info));
        }
        next = chunk.end_block.number + 1;
    }
    assert!(db.get_unassigned_l2_blocks(0, 1).await.unwrap().iter().all(|b| b.number() == next));
}

#[tokio::test]
async fn test_legacy_limits() -> eyre::Result<()> {
    let blocks = vec![block(1), block(2)];
    let first_block =
        estimate_chunk(&blocks[..1], CodecVersion::Legacy, config(NEVER).estimator_config())?;

    let cases = [
        ("no limit reached", config(NEVER), None, 0, 0),
        ("timeout", config(0), None, 1, 2),
        ("max tx num is 0", ChunkProposerConfig { max_tx_num_per_chunk: 0, ..config(NEVER) }, None, 0, 0),
        (
            "max l1 commit gas is 0",
            ChunkProposerConfig { max_l1_commit_gas_per_chunk: 0, ..config(NEVER) },
            None,
            0,
            0,
        ),
        (
            "max l1 commit calldata size is 0",
            ChunkProposerConfig { max_l1_commit_calldata_size_per_chunk: 0, ..config(NEVER) },
            None,
            0,
            0,
        ),
        (
            "max row consumption is 0",
            ChunkProposerConfig { max_row_consumption_per_chunk: 0, ..config(NEVER) },
            None,
            0,
            0,
        ),
        (
            "max block num is 1",
            ChunkProposerConfig { max_block_num_per_chunk: 1, ..config(NEVER) },
            None,
            1,
            1,
        ),
        (
            "max tx num is the first block",
            ChunkProposerConfig { max_tx_num_per_chunk: first_block.tx_num, ..config(NEVER) },
            None,
            1,
            1,
        ),
        (
            "max l1 commit gas is the first block",
            ChunkProposerConfig {
                max_l1_commit_gas_per_chunk: first_block.l1_commit_gas,
                ..config(NEVER)
            },
            None,
            1,
            1,
        ),
        (
            "max l1 commit calldata size is the first block",
            ChunkProposerConfig {
                max_l1_commit_calldata_size_per_chunk: first_block.l1_commit_calldata_size,
                ..config(NEVER)
            },
            None,
            1,
            1,
        ),
        // every block exceeds the limit on its own and is proposed in its own chunk.
        (
            "max row consumption is 1",
            ChunkProposerConfig { max_row_consumption_per_chunk: 1, ..config(NEVER) },
            None,
            2,
            1,
        ),
        ("fork block reached", config(NEVER), Some((Hardfork::Curie, 2)), 1, 1),
    ];

    for (name, config, fork, expected_chunks, expected_blocks_in_first_chunk) in cases {
        let db = setup_db(&blocks).await?;
        let schedule = fork
            .map(|(fork, block)| ForkSchedule::new().with_fork(fork, block))
            .unwrap_or_default();
        let proposer = ChunkProposer::new(db.clone(), schedule, config)?;

        let proposed = proposer.propose_at(NOW).await?;
        let chunks = db.get_chunks_from_index(0).await?;

        assert_eq!(chunks.len(), expected_chunks, "{name}");
        assert_eq!(proposed, chunks.iter().map(|(info, _)| *info).collect::<Vec<_>>(), "{name}");
        if let Some((_, first)) = chunks.first() {
            assert_eq!(first.num_blocks(), expected_blocks_in_first_chunk, "{name}");
            assert_eq!(first.codec_version, CodecVersion::Legacy, "{name}");
        }
        assert_partition(&db, 1, &chunks).await;
    }

    Ok(())
}

#[tokio::test]
async fn test_blob_capacity_limits() -> eyre::Result<()> {
    let blocks = vec![block(1), block(2)];

    // legacy limits do not apply to blob chunks.
    let blob = |config: ChunkProposerConfig| ChunkProposerConfig {
        max_l1_commit_gas_per_chunk: 1,
        max_l1_commit_calldata_size_per_chunk: 1,
        ..config
    };
    let cases = [
        ("no limit reached", blob(config(NEVER)), None, 0, 0),
        ("timeout", blob(config(0)), None, 1, 2),
        (
            "max tx num is 0",
            blob(ChunkProposerConfig { max_tx_num_per_chunk: 0, ..config(NEVER) }),
            None,
            0,
            0,
        ),
        (
            "max row consumption is 0",
            blob(ChunkProposerConfig { max_row_consumption_per_chunk: 0, ..config(NEVER) }),
            None,
            0,
            0,
        ),
        (
            "max blob size is 0",
            blob(ChunkProposerConfig { max_blob_size: 0, ..config(NEVER) }),
            None,
            0,
            0,
        ),
        (
            "max block num is 1",
            blob(ChunkProposerConfig { max_block_num_per_chunk: 1, ..config(NEVER) }),
            None,
            1,
            1,
        ),
        (
            "max tx num is the first block",
            blob(ChunkProposerConfig { max_tx_num_per_chunk: 2, ..config(NEVER) }),
            None,
            1,
            1,
        ),
        (
            "max row consumption is 1",
            blob(ChunkProposerConfig { max_row_consumption_per_chunk: 1, ..config(NEVER) }),
            None,
            2,
            1,
        ),
        // 62 + 2 * 100 bytes fit in 271 bytes, 62 + 4 * 100 bytes do not.
        (
            "max blob size is the first block",
            blob(ChunkProposerConfig { max_blob_size: 271, ..config(NEVER) }),
            None,
            1,
            1,
        ),
        ("fork block reached", blob(config(NEVER)), Some((Hardfork::Darwin, 2)), 1, 1),
    ];

    for (name, config, fork, expected_chunks, expected_blocks_in_first_chunk) in cases {
        let db = setup_db(&blocks).await?;
        let mut schedule = ForkSchedule::new().with_fork(Hardfork::Bernoulli, 0);
        if let Some((fork, block)) = fork {
            schedule = schedule.with_fork(fork, block);
        }
        let proposer = ChunkProposer::new(db.clone(), schedule, config)?;

        proposer.propose_at(NOW).await?;
        let chunks = db.get_chunks_from_index(0).await?;

        assert_eq!(chunks.len(), expected_chunks, "{name}");
        if let Some((_, first)) = chunks.first() {
            assert_eq!(first.num_blocks(), expected_blocks_in_first_chunk, "{name}");
            assert_eq!(first.codec_version, CodecVersion::BlobCapacity, "{name}");
            assert_eq!(first.totals.l1_commit_gas, 0, "{name}");
        }
        assert_partition(&db, 1, &chunks).await;
    }

    Ok(())
}

#[tokio::test]
async fn test_blob_capacity_partitions_uniform_blocks() -> eyre::Result<()> {
    let blocks = (1..=2000)
        .map(|number| L2BlockData {
            header: L2BlockHeader { number, timestamp: 0, ..Default::default() },
            transactions: vec![Bytes::from(vec![0x02; 230])],
            row_consumption: Some(RowConsumption::from(vec![SubCircuitRowUsage::new("evm", 1)])),
        })
        .collect::<Vec<_>>();
    let db = setup_db(&blocks).await?;

    let config = ChunkProposerConfig {
        max_block_num_per_chunk: u64::MAX,
        max_tx_num_per_chunk: u64::MAX,
        max_l1_commit_gas_per_chunk: 1,
        max_l1_commit_calldata_size_per_chunk: 1,
        max_row_consumption_per_chunk: u64::MAX,
        chunk_timeout_sec: 3600,
        gas_cost_increase_multiplier: 1.0,
        ..Default::default()
    };
    let schedule = ForkSchedule::new().with_fork(Hardfork::Bernoulli, 0);
    let proposer = ChunkProposer::new(db.clone(), schedule, config)?;

    for _ in 0..10 {
        proposer.propose_at(NOW).await?;
    }

    let chunks = db.get_chunks_from_index(0).await?;
    let ends = chunks.iter().map(|(_, chunk)| chunk.end_block.number).collect::<Vec<_>>();
    assert_eq!(ends, vec![551, 1102, 1653, 2000]);
    for (_, chunk) in &chunks {
        assert!(chunk.totals.blob_size <= 131_072);
        assert_eq!(chunk.codec_version, CodecVersion::BlobCapacity);
    }
    assert_partition(&db, 1, &chunks).await;

    Ok(())
}

#[tokio::test]
async fn test_no_early_close_and_idempotence() -> eyre::Result<()> {
    let blocks = (1..=20).map(block).collect::<Vec<_>>();
    let db = setup_db(&blocks).await?;
    let config = ChunkProposerConfig { max_block_num_per_chunk: 6, ..config(NEVER) };
    let proposer = ChunkProposer::new(db.clone(), ForkSchedule::new(), config)?;

    // blocks 19 and 20 fit in the chunk under construction, which is not closed.
    let proposed = proposer.propose_at(NOW).await?;
    assert_eq!(proposed.len(), 3);
    let chunks = db.get_chunks_from_index(0).await?;

    // proposing again does not change anything.
    assert!(proposer.propose_at(NOW).await?.is_empty());
    assert_eq!(db.get_chunks_from_index(0).await?, chunks);
    assert_eq!(db.get_unassigned_l2_blocks(0, 100).await?, blocks[18..].to_vec());

    // new blocks resume the chunk under construction.
    db.insert_l2_blocks(&(21..=25).map(block).collect::<Vec<_>>()).await?;
    let proposed = proposer.propose_at(NOW).await?;
    assert_eq!(proposed.len(), 1);
    let (_, chunk) = db.get_latest_chunk().await?.unwrap();
    assert_eq!(chunk.block_range(), 19..=24);

    let chunks = db.get_chunks_from_index(0).await?;
    assert_partition(&db, 1, &chunks).await;

    Ok(())
}

#[tokio::test]
async fn test_chunks_never_span_a_hardfork() -> eyre::Result<()> {
    let blocks = (1..=100).map(block).collect::<Vec<_>>();
    let db = setup_db(&blocks).await?;
    let schedule = ForkSchedule::new()
        .with_fork(Hardfork::Bernoulli, 50)
        .with_fork(Hardfork::Curie, 80);
    let config = ChunkProposerConfig { max_block_num_per_chunk: 30, ..config(0) };
    let proposer = ChunkProposer::new(db.clone(), schedule, config)?;

    proposer.propose_at(NOW).await?;

    let chunks = db.get_chunks_from_index(0).await?;
    let ranges = chunks
        .iter()
        .map(|(_, chunk)| (chunk.block_range(), chunk.codec_version))
        .collect::<Vec<_>>();
    assert_eq!(
        ranges,
        vec![
            (1..=30, CodecVersion::Legacy),
            (31..=49, CodecVersion::Legacy),
            (50..=79, CodecVersion::BlobCapacity),
            (80..=100, CodecVersion::BlobCapacity),
        ]
    );
    assert_partition(&db, 1, &chunks).await;

    Ok(())
}

#[tokio::test]
async fn test_oversized_block_is_proposed_alone() -> eyre::Result<()> {
    let blocks = vec![block(1), block(2), block_with_txs(3, 10), block_with_txs(4, 1)];
    let db = setup_db(&blocks).await?;
    let config = ChunkProposerConfig { max_tx_num_per_chunk: 5, ..config(NEVER) };
    let proposer = ChunkProposer::new(db.clone(), ForkSchedule::new(), config)?;

    proposer.propose_at(NOW).await?;

    let chunks = db.get_chunks_from_index(0).await?;
    let ranges = chunks.iter().map(|(_, chunk)| chunk.block_range()).collect::<Vec<_>>();
    assert_eq!(ranges, vec![1..=2, 3..=3]);
    assert_eq!(chunks[1].1.totals.tx_num, 10);
    assert_eq!(db.get_chunk_info_for_block(4).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_start_block_number() -> eyre::Result<()> {
    let blocks = (1..=12).map(block).collect::<Vec<_>>();
    let db = setup_db(&blocks).await?;
    let config = ChunkProposerConfig { start_block_number: 10, ..config(0) };
    let proposer = ChunkProposer::new(db.clone(), ForkSchedule::new(), config)?;

    proposer.propose_at(NOW).await?;

    let (info, chunk) = db.get_latest_chunk().await?.unwrap();
    assert_eq!(info.index, 0);
    assert_eq!(chunk.block_range(), 10..=12);
    assert_eq!(chunk.start_block_timestamp, blocks[9].timestamp());
    assert_eq!(db.get_chunk_info_for_block(9).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_blocks_are_loaded_in_windows() -> eyre::Result<()> {
    let provider = Arc::new(InMemoryChunkProvider::new((1..=10).map(block)));
    let config =
        ChunkProposerConfig { max_block_num_per_chunk: 4, block_load_limit: 3, ..config(NEVER) };
    let proposer = ChunkProposer::new(provider.clone(), ForkSchedule::new(), config)?;

    let proposed = proposer.propose_at(NOW).await?;

    assert_eq!(proposed.len(), 2);
    let ranges = provider.chunks().iter().map(|(_, c)| c.block_range()).collect::<Vec<_>>();
    assert_eq!(ranges, vec![1..=4, 5..=8]);
    assert_eq!(provider.chunk_index_of(9), None);

    Ok(())
}

#[tokio::test]
async fn test_read_failure() -> eyre::Result<()> {
    let provider = Arc::new(InMemoryChunkProvider::new((1..=3).map(block)));
    let proposer = ChunkProposer::new(provider.clone(), ForkSchedule::new(), config(0))?;

    provider.set_fail_reads(true);
    let err = proposer.propose_at(NOW).await.unwrap_err();
    assert!(matches!(err, ChunkProposerError::Provider(_)));
    assert!(err.is_read_error());
    assert!(provider.chunks().is_empty());

    provider.set_fail_reads(false);
    assert_eq!(proposer.propose_at(NOW).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_write_failure_leaves_no_partial_chunk() -> eyre::Result<()> {
    let provider = Arc::new(InMemoryChunkProvider::new((1..=3).map(block)));
    let proposer = ChunkProposer::new(provider.clone(), ForkSchedule::new(), config(0))?;

    provider.set_fail_writes(true);
    let err = proposer.propose_at(NOW).await.unwrap_err();
    assert!(!err.is_read_error());
    assert!(provider.chunks().is_empty());
    assert_eq!(provider.chunk_index_of(1), None);

    // the same chunk is proposed once the store recovers.
    provider.set_fail_writes(false);
    let proposed = proposer.propose_at(NOW).await?;
    assert_eq!(proposed.len(), 1);
    assert_eq!(provider.latest_chunk().await?.map(|(_, c)| c.block_range()), Some(1..=3));

    Ok(())
}

#[tokio::test]
async fn test_invalid_blocks_are_read_errors() -> eyre::Result<()> {
    // a gap in the block sequence.
    let provider = InMemoryChunkProvider::new([block(1), block(2), block(4)]);
    let proposer = ChunkProposer::new(provider, ForkSchedule::new(), config(0))?;
    let err = proposer.propose_at(NOW).await.unwrap_err();
    assert!(matches!(err, ChunkProposerError::NonContiguousBlock { got: 4, expected: 3 }));
    assert!(err.is_read_error());

    // the first unassigned block is not the expected one.
    let provider = InMemoryChunkProvider::new([block(5)]);
    let proposer = ChunkProposer::new(provider, ForkSchedule::new(), config(0))?;
    let err = proposer.propose_at(NOW).await.unwrap_err();
    assert!(matches!(err, ChunkProposerError::NonContiguousBlock { got: 5, expected: 1 }));

    // a block without row consumption can not be estimated.
    let mut invalid = block(2);
    invalid.row_consumption = None;
    let provider = InMemoryChunkProvider::new([block(1), invalid]);
    let proposer = ChunkProposer::new(provider, ForkSchedule::new(), config(0))?;
    let err = proposer.propose_at(NOW).await.unwrap_err();
    assert!(matches!(err, ChunkProposerError::Codec(_)));
    assert!(err.is_read_error());

    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    let provider = InMemoryChunkProvider::default();
    let config = ChunkProposerConfig { gas_cost_increase_multiplier: 0.9, ..config(0) };
    assert!(ChunkProposer::new(provider, ForkSchedule::new(), config).is_err());
}
