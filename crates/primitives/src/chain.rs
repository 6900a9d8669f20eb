use std::collections::BTreeMap;

/// The protocol upgrades of the rollup, in activation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hardfork {
    /// Archimedes upgrade.
    Archimedes,
    /// Bernoulli upgrade, which moves chunk data from calldata into blobs.
    Bernoulli,
    /// Curie upgrade.
    Curie,
    /// Darwin upgrade.
    Darwin,
}

impl Hardfork {
    /// All the known hardforks.
    pub const ALL: [Self; 4] = [Self::Archimedes, Self::Bernoulli, Self::Curie, Self::Darwin];

    /// Returns the name of the hardfork.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Archimedes => "archimedes",
            Self::Bernoulli => "bernoulli",
            Self::Curie => "curie",
            Self::Darwin => "darwin",
        }
    }
}

impl core::fmt::Display for Hardfork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of the hardfork activation heights of the chain.
#[auto_impl::auto_impl(&, Arc)]
pub trait Hardforks {
    /// Returns the block number at which the provided hardfork activates, if it is scheduled.
    fn fork_activation_block(&self, fork: Hardfork) -> Option<u64>;
}

/// A snapshot of the hardfork activation heights.
///
/// A [`ForkSchedule`] is taken once per chunk proposal attempt and is immutable afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForkSchedule {
    activations: BTreeMap<Hardfork, u64>,
}

impl ForkSchedule {
    /// Returns an empty [`ForkSchedule`], in which no hardfork ever activates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the provided hardfork at the provided block number.
    pub fn with_fork(mut self, fork: Hardfork, block_number: u64) -> Self {
        self.activations.insert(fork, block_number);
        self
    }

    /// Takes a snapshot of the activation heights of all known hardforks.
    pub fn snapshot<H: Hardforks + ?Sized>(forks: &H) -> Self {
        let activations = Hardfork::ALL
            .into_iter()
            .filter_map(|fork| forks.fork_activation_block(fork).map(|block| (fork, block)))
            .collect();
        Self { activations }
    }

    /// Returns the activation block of the hardfork.
    pub fn activation_block(&self, fork: Hardfork) -> Option<u64> {
        self.activations.get(&fork).copied()
    }

    /// Returns true if the hardfork is active at the provided block number.
    pub fn is_active_at_block(&self, fork: Hardfork, block_number: u64) -> bool {
        self.activation_block(fork).is_some_and(|activation| activation <= block_number)
    }

    /// Returns true if any hardfork activates at exactly the provided block number.
    pub fn is_fork_block(&self, block_number: u64) -> bool {
        self.activations.values().any(|activation| *activation == block_number)
    }
}

impl Hardforks for ForkSchedule {
    fn fork_activation_block(&self, fork: Hardfork) -> Option<u64> {
        self.activation_block(fork)
    }
}
