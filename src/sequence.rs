//! IMAP sequence sets
//!
//! Search results arrive as an unordered set of message sequence
//! numbers. [`SequenceSet`] sorts them, drops duplicates and collapses
//! consecutive runs into ranges so one `STORE` covers the whole result.

use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSet {
    ranges: Vec<RangeInclusive<u32>>,
}

impl SequenceSet {
    /// Build a set from arbitrary sequence numbers.
    ///
    /// Returns `None` for an empty input; IMAP has no empty set syntax.
    #[must_use]
    pub fn from_numbers(numbers: &[u32]) -> Option<Self> {
        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut iter = sorted.into_iter();
        let first = iter.next()?;

        let mut ranges = Vec::new();
        let mut current = first..=first;
        for num in iter {
            if num == *current.end() + 1 {
                current = *current.start()..=num;
            } else {
                ranges.push(current);
                current = num..=num;
            }
        }
        ranges.push(current);

        Some(Self { ranges })
    }

    /// Number of messages the set covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|r| (r.end() - r.start()) as usize + 1)
            .sum()
    }

    /// Always `false`: empty sets cannot be constructed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The covered sequence numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges.iter().flat_map(Clone::clone)
    }
}

impl fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if range.start() == range.end() {
                write!(f, "{}", range.start())?;
            } else {
                write!(f, "{}:{}", range.start(), range.end())?;
            }
        }
        Ok(())
    }
}
