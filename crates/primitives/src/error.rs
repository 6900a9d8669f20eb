/// Errors related to the rollup node primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupNodePrimitiveError {
    /// The codec version is unknown.
    UnknownCodecVersion(u8),
}

impl core::fmt::Display for RollupNodePrimitiveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownCodecVersion(version) => write!(f, "unknown codec version {version}"),
        }
    }
}

impl std::error::Error for RollupNodePrimitiveError {}
