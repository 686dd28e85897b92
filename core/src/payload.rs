use std::fmt;

use ttable::Entry;

/// Indicates whether the stored value is exact or a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    /// True minimax value (alpha < value < beta)
    #[default]
    Exact = 0,
    /// Value >= beta (beta cutoff)
    Lower = 1,
    /// Value <= alpha (all moves failed)
    Upper = 2,
}

impl Bound {
    pub fn classify(value: i16, alpha: i16, beta: i16) -> Self {
        if value <= alpha {
            Bound::Upper
        } else if value >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

/// What a search leaves behind for a position. The table never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub value: i16,
    pub bound: Bound,
    /// Best move, packed as: [15:12]=promo, [11:6]=to, [5:0]=from
    pub best_move_packed: u16,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value {} bound {:?} move {:#06x}",
            self.value, self.bound, self.best_move_packed
        )
    }
}

pub type SearchEntry = Entry<SearchResult>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bounds() {
        assert_eq!(Bound::classify(-50, -50, 50), Bound::Upper);
        assert_eq!(Bound::classify(-80, -50, 50), Bound::Upper);
        assert_eq!(Bound::classify(50, -50, 50), Bound::Lower);
        assert_eq!(Bound::classify(0, -50, 50), Bound::Exact);
    }

    #[test]
    fn test_display() {
        let result = SearchResult {
            value: -35,
            bound: Bound::Lower,
            best_move_packed: 0x0c1c,
        };
        assert_eq!(result.to_string(), "value -35 bound Lower move 0x0c1c");
    }
}
