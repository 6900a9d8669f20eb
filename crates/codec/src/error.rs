/// An error occurring during the codec process.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The block is missing the row consumption required to estimate the chunk's proving cost.
    #[error("missing row consumption for block {0}")]
    MissingRowConsumption(u64),
    /// The blob payload could not be compressed.
    #[error("blob payload compression failed: {0}")]
    Compression(#[from] std::io::Error),
}
