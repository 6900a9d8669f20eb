use rollup_node_primitives::{CodecVersion, ForkSchedule, Hardfork};

/// Returns the [`CodecVersion`] the block at the provided number is encoded with.
///
/// Blocks from the Bernoulli activation block onward are committed in blobs, all prior blocks (or
/// all blocks, if Bernoulli is not scheduled) use the legacy calldata codec.
pub fn codec_version_for_block(block_number: u64, schedule: &ForkSchedule) -> CodecVersion {
    if schedule.is_active_at_block(Hardfork::Bernoulli, block_number) {
        CodecVersion::BlobCapacity
    } else {
        CodecVersion::Legacy
    }
}
