/// What the table needs to know about a stored search result.
///
/// Everything else a record carries (score, best move, bound) is payload the
/// table passes through untouched.
pub trait Record {
    /// Full Zobrist hash of the position, used to verify slot hits.
    fn zobrist_key(&self) -> u64;

    /// Remaining plies searched from this position (depth quality).
    fn depth(&self) -> u8;

    /// True if the record belongs to an earlier search generation.
    fn is_stale(&self) -> bool;

    fn set_stale(&mut self, stale: bool);
}

/// A record with an opaque payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Entry<P> {
    /// Full Zobrist hash of the position
    pub key: u64,
    /// Search depth that produced this result
    pub depth: u8,
    /// Set when a newer search generation has started
    pub stale: bool,
    pub payload: P,
}

impl<P> Entry<P> {
    pub fn new(key: u64, depth: u8, payload: P) -> Self {
        Self {
            key,
            depth,
            stale: false,
            payload,
        }
    }
}

impl<P> Record for Entry<P> {
    #[inline(always)]
    fn zobrist_key(&self) -> u64 {
        self.key
    }

    #[inline(always)]
    fn depth(&self) -> u8 {
        self.depth
    }

    #[inline(always)]
    fn is_stale(&self) -> bool {
        self.stale
    }

    #[inline(always)]
    fn set_stale(&mut self, stale: bool) {
        self.stale = stale;
    }
}
