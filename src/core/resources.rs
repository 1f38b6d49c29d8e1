//! Resource dimensions, cost vectors, and the shared resource pool.
//!
//! The pool holds four finite budgets (cpu, memory, network, storage),
//! each expressed as a percentage of a fixed total. Running tasks consume
//! capacity on admission and return it on completion.

use serde::{Deserialize, Serialize};

/// Per-dimension capacity percentage. All pools start at 100.
pub const DIMENSION_TOTAL: u32 = 100;

/// The four resource dimensions tracked by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Cpu,
    Memory,
    Network,
    Storage,
}

impl ResourceKind {
    /// All dimensions, in a fixed iteration order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Cpu,
        ResourceKind::Memory,
        ResourceKind::Network,
        ResourceKind::Storage,
    ];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResourceKind::Cpu => "cpu",
            ResourceKind::Memory => "memory",
            ResourceKind::Network => "network",
            ResourceKind::Storage => "storage",
        };
        write!(f, "{}", s)
    }
}

/// A resource cost across all four dimensions, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceVector {
    pub cpu: u32,
    pub memory: u32,
    pub network: u32,
    pub storage: u32,
}

impl ResourceVector {
    /// Create a vector, clamping each dimension to 0..=100.
    pub fn new(cpu: u32, memory: u32, network: u32, storage: u32) -> Self {
        Self {
            cpu: cpu.min(DIMENSION_TOTAL),
            memory: memory.min(DIMENSION_TOTAL),
            network: network.min(DIMENSION_TOTAL),
            storage: storage.min(DIMENSION_TOTAL),
        }
    }

    /// Value along one dimension.
    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Cpu => self.cpu,
            ResourceKind::Memory => self.memory,
            ResourceKind::Network => self.network,
            ResourceKind::Storage => self.storage,
        }
    }

    /// Sum across all dimensions.
    pub fn total(&self) -> u32 {
        self.cpu + self.memory + self.network + self.storage
    }
}

/// One dimension of the pool: total, used, and available capacity.
///
/// Invariant: `total == used + available` at every observable instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDimension {
    pub total: u32,
    pub used: u32,
    pub available: u32,
}

impl PoolDimension {
    fn new(total: u32) -> Self {
        Self {
            total,
            used: 0,
            available: total,
        }
    }
}

/// Snapshot of all four pool dimensions, used by the status view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub cpu: PoolDimension,
    pub memory: PoolDimension,
    pub network: PoolDimension,
    pub storage: PoolDimension,
}

/// The shared resource budget consumed by running tasks.
///
/// Mutation is not internally synchronized; the scheduler serializes
/// allocate/release under its state lock.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    cpu: PoolDimension,
    memory: PoolDimension,
    network: PoolDimension,
    storage: PoolDimension,
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourcePool {
    /// Create a pool with every dimension at 100/0/100.
    pub fn new() -> Self {
        Self {
            cpu: PoolDimension::new(DIMENSION_TOTAL),
            memory: PoolDimension::new(DIMENSION_TOTAL),
            network: PoolDimension::new(DIMENSION_TOTAL),
            storage: PoolDimension::new(DIMENSION_TOTAL),
        }
    }

    fn dimension(&self, kind: ResourceKind) -> &PoolDimension {
        match kind {
            ResourceKind::Cpu => &self.cpu,
            ResourceKind::Memory => &self.memory,
            ResourceKind::Network => &self.network,
            ResourceKind::Storage => &self.storage,
        }
    }

    fn dimension_mut(&mut self, kind: ResourceKind) -> &mut PoolDimension {
        match kind {
            ResourceKind::Cpu => &mut self.cpu,
            ResourceKind::Memory => &mut self.memory,
            ResourceKind::Network => &mut self.network,
            ResourceKind::Storage => &mut self.storage,
        }
    }

    /// True iff every dimension has enough available capacity.
    pub fn can_allocate(&self, requirements: &ResourceVector) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|&kind| self.dimension(kind).available >= requirements.get(kind))
    }

    /// Consume capacity along every dimension.
    ///
    /// The caller must have verified `can_allocate` first; allocation is
    /// never partially applied or rolled back.
    pub fn allocate(&mut self, requirements: &ResourceVector) {
        for kind in ResourceKind::ALL {
            let required = requirements.get(kind);
            let dim = self.dimension_mut(kind);
            dim.used += required;
            dim.available -= required;
        }
    }

    /// Return capacity along every dimension.
    ///
    /// Clamped so over-release cannot corrupt the pool, but correct
    /// operation pairs every allocate with exactly one release.
    pub fn release(&mut self, requirements: &ResourceVector) {
        for kind in ResourceKind::ALL {
            let required = requirements.get(kind);
            let dim = self.dimension_mut(kind);
            dim.used = dim.used.saturating_sub(required);
            dim.available = (dim.available + required).min(dim.total);
        }
    }

    /// True iff the requirement exceeds some dimension's total capacity,
    /// so the task could never be admitted even against an empty pool.
    pub fn is_infeasible(&self, requirements: &ResourceVector) -> bool {
        ResourceKind::ALL
            .iter()
            .any(|&kind| requirements.get(kind) > self.dimension(kind).total)
    }

    /// Copy of the current pool state for reporting.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            cpu: self.cpu,
            memory: self.memory,
            network: self.network,
            storage: self.storage,
        }
    }
}
