//! Per-category rating breakdown.

use shared_types::Category;
use std::fmt;

/// Live-vote counts for one target, one slot per category.
///
/// Always covers every category; a category without votes counts zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Breakdown {
    counts: [u64; 5],
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a breakdown from `(category, count)` pairs. Repeated
    /// categories accumulate; missing ones stay zero.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (Category, u64)>,
    {
        let mut breakdown = Self::new();
        for (category, count) in counts {
            breakdown.counts[category.index()] += count;
        }
        breakdown
    }

    pub fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }

    /// Number of live votes across all categories.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn increment(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    pub fn decrement(&mut self, category: Category) {
        let slot = &mut self.counts[category.index()];
        *slot = slot.saturating_sub(1);
    }

    /// Every category with its count, in ascending category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.count(*c)))
    }
}

/// Stable listing, e.g. `awful:0; poor:0; fair:1; good:0; great:0`.
impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (category, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}:{}", category.label(), count)?;
        }
        Ok(())
    }
}
