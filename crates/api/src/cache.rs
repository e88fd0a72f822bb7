use serde::{Deserialize, Serialize};

/// Counters for the discovery cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries currently held
    pub entries: usize,
    /// Reads answered from a valid entry
    pub hits: u64,
    /// Reads that found no valid entry
    pub misses: u64,
    /// Loads that returned data before cancellation; each one is cached
    pub discoveries: u64,
    /// Discovery runs that failed or were cancelled
    pub failures: u64,
}
