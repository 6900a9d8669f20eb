use std::collections::BTreeMap;

use rollup_node_primitives::RowConsumption;

/// Accumulates the row consumption of the blocks of a chunk per sub-circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkRowConsumption(BTreeMap<String, u64>);

impl ChunkRowConsumption {
    /// Adds the row consumption of a block.
    pub fn add(&mut self, rows: &RowConsumption) {
        for usage in rows.iter() {
            let entry = self.0.entry(usage.name.clone()).or_default();
            *entry = entry.saturating_add(usage.row_number);
        }
    }

    /// Returns the highest accumulated row consumption of any sub-circuit.
    pub fn max(&self) -> u64 {
        self.0.values().copied().max().unwrap_or_default()
    }
}
