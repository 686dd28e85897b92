use std::fmt;

/// Point-in-time diagnostics for a transposition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Number of address slots
    pub capacity: usize,
    /// Occupied slots
    pub filled: usize,
    /// Slot collisions between different positions since the last reset
    pub collisions: u64,
    /// Sampled fill rate in permille (0-1000)
    pub hashfull: u16,
}

impl TableStats {
    /// Exact fill rate over the whole table in permille.
    pub fn fill_permille(&self) -> u16 {
        if self.capacity == 0 {
            return 0;
        }
        ((self.filled as u128 * 1000) / self.capacity as u128) as u16
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity {} filled {} ({}‰) collisions {} hashfull {}",
            self.capacity,
            self.filled,
            self.fill_permille(),
            self.collisions,
            self.hashfull
        )
    }
}
