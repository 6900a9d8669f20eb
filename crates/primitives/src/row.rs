use serde::{Deserialize, Serialize};

/// The number of rows a block consumes in one proving sub-circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct SubCircuitRowUsage {
    /// The name of the sub-circuit.
    pub name: String,
    /// The number of rows used.
    pub row_number: u64,
}

impl SubCircuitRowUsage {
    /// Returns a new [`SubCircuitRowUsage`].
    pub fn new(name: impl Into<String>, row_number: u64) -> Self {
        Self { name: name.into(), row_number }
    }
}

/// The row consumption of a block across all the proving sub-circuits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct RowConsumption(pub Vec<SubCircuitRowUsage>);

impl RowConsumption {
    /// Returns an iterator over the sub-circuit usages.
    pub fn iter(&self) -> impl Iterator<Item = &SubCircuitRowUsage> {
        self.0.iter()
    }

    /// Returns the highest row usage of any single sub-circuit.
    pub fn max_rows(&self) -> u64 {
        self.0.iter().map(|usage| usage.row_number).max().unwrap_or_default()
    }
}

impl From<Vec<SubCircuitRowUsage>> for RowConsumption {
    fn from(value: Vec<SubCircuitRowUsage>) -> Self {
        Self(value)
    }
}
