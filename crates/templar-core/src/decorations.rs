//! Styled-range decorations.
//!
//! Decorations are non-destructive styling overlays anchored to half-open
//! character-offset ranges. Each range belongs to one marker [`Family`]; a
//! whole [`DecorationSet`] is derived per document revision and replaced
//! wholesale on text changes. A transaction that did not change text keeps
//! the previous set, mapped through the (empty) change set.

use crate::delta::TextDelta;

/// The marker family a styled range belongs to.
///
/// Families are mutually exclusive at the lexical level: each is introduced
/// by a distinct sigil character, so ranges of different families cannot
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// `@NAME` template-directive markers (closed uppercase vocabulary).
    TemplateDirective,
    /// `#identifier` table-reference markers.
    TableReference,
    /// `%identifier` interpolation markers.
    Interpolation,
}

/// A half-open styled character range `start..end` in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledRange {
    /// Range start offset (inclusive).
    pub start: usize,
    /// Range end offset (exclusive).
    pub end: usize,
    /// Marker family (determines the rendered style).
    pub family: Family,
}

impl StyledRange {
    /// Create a new styled range.
    pub fn new(start: usize, end: usize, family: Family) -> Self {
        Self { start, end, family }
    }
}

/// Error produced by [`DecorationSetBuilder::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationError {
    /// A range was added with a start offset lower than the previous range's.
    OutOfOrder {
        /// The offending range's start offset.
        start: usize,
        /// The previously added range's start offset.
        last_start: usize,
    },
    /// A range was empty or inverted (`end <= start`).
    EmptyRange {
        /// The offending range's start offset.
        start: usize,
        /// The offending range's end offset.
        end: usize,
    },
}

impl std::fmt::Display for DecorationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecorationError::OutOfOrder { start, last_start } => {
                write!(
                    f,
                    "decoration range starting at {} added after range starting at {}",
                    start, last_start
                )
            }
            DecorationError::EmptyRange { start, end } => {
                write!(f, "empty decoration range {}..{}", start, end)
            }
        }
    }
}

impl std::error::Error for DecorationError {}

/// An ordered, immutable collection of styled ranges for one revision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    ranges: Vec<StyledRange>,
}

impl DecorationSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All ranges, ordered by non-decreasing start offset.
    pub fn ranges(&self) -> &[StyledRange] {
        &self.ranges
    }

    /// Number of ranges in the set.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if the set contains no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Shift every range through a text delta, producing the set for the new
    /// revision. Ranges that collapse to nothing are dropped.
    pub fn map(&self, delta: &TextDelta) -> DecorationSet {
        if delta.is_empty() {
            return self.clone();
        }

        let ranges = self
            .ranges
            .iter()
            .filter_map(|range| {
                let start = delta.map_offset(range.start);
                let end = delta.map_offset(range.end);
                (start < end).then_some(StyledRange::new(start, end, range.family))
            })
            .collect();
        DecorationSet { ranges }
    }
}

/// Builder for [`DecorationSet`].
///
/// Ranges must be added in non-decreasing start order; the builder does not
/// re-sort.
#[derive(Debug, Default)]
pub struct DecorationSetBuilder {
    ranges: Vec<StyledRange>,
}

impl DecorationSetBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one styled range.
    pub fn add(&mut self, start: usize, end: usize, family: Family) -> Result<(), DecorationError> {
        if end <= start {
            return Err(DecorationError::EmptyRange { start, end });
        }
        if let Some(last) = self.ranges.last() {
            if start < last.start {
                return Err(DecorationError::OutOfOrder {
                    start,
                    last_start: last.start,
                });
            }
        }
        self.ranges.push(StyledRange::new(start, end, family));
        Ok(())
    }

    /// Finish the set.
    pub fn finish(self) -> DecorationSet {
        DecorationSet {
            ranges: self.ranges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::{TextDelta, TextDeltaEdit};

    #[test]
    fn test_builder_rejects_out_of_order() {
        let mut builder = DecorationSetBuilder::new();
        builder.add(4, 8, Family::TableReference).unwrap();

        let err = builder.add(2, 3, Family::Interpolation).unwrap_err();
        assert_eq!(
            err,
            DecorationError::OutOfOrder {
                start: 2,
                last_start: 4
            }
        );
    }

    #[test]
    fn test_builder_rejects_empty_range() {
        let mut builder = DecorationSetBuilder::new();
        let err = builder.add(3, 3, Family::TemplateDirective).unwrap_err();
        assert_eq!(err, DecorationError::EmptyRange { start: 3, end: 3 });
    }

    #[test]
    fn test_map_shifts_ranges_and_drops_collapsed() {
        let mut builder = DecorationSetBuilder::new();
        builder.add(0, 3, Family::TableReference).unwrap();
        builder.add(5, 9, Family::Interpolation).unwrap();
        let set = builder.finish();

        // Delete 4..10: the second range collapses entirely.
        let delta = TextDelta::single(TextDeltaEdit {
            start: 4,
            deleted_text: "abcdef".to_string(),
            inserted_text: String::new(),
        });
        let mapped = set.map(&delta);

        assert_eq!(mapped.ranges(), &[StyledRange::new(0, 3, Family::TableReference)]);
    }

    #[test]
    fn test_map_empty_delta_reuses_set() {
        let mut builder = DecorationSetBuilder::new();
        builder.add(1, 2, Family::TemplateDirective).unwrap();
        let set = builder.finish();

        assert_eq!(set.map(&TextDelta::empty()), set);
    }
}
