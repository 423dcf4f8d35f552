//! Structured text change deltas.
//!
//! Every document mutation is described as an ordered list of edits in
//! **character offsets** (Unicode scalar values). Derived-state consumers use
//! deltas two ways: to decide whether a transaction changed text at all, and
//! to remap offsets from the previous revision into the new one (the
//! decoration set of a selection-only transaction is reused by mapping it
//! through an empty delta).

/// A single text edit expressed in character offsets.
///
/// `start` is an offset in the document **at the time this edit is applied**;
/// edits inside a [`TextDelta`] must be applied in order to transform the
/// "before" document into the "after" document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }
}

/// A structured description of one document transaction's text changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDelta {
    /// Ordered list of edits transforming the "before" document into the
    /// "after" document.
    pub edits: Vec<TextDeltaEdit>,
}

impl TextDelta {
    /// A delta with no edits (selection-only transaction).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A delta consisting of a single edit.
    pub fn single(edit: TextDeltaEdit) -> Self {
        Self { edits: vec![edit] }
    }

    /// Returns `true` if this delta contains no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Map a pre-change character offset to its post-change position.
    ///
    /// Offsets inside a deleted range clamp to the edit's start.
    pub fn map_offset(&self, offset: usize) -> usize {
        let mut mapped = offset;
        // Each edit's `start` is already in the coordinate space produced by
        // the previous edits, so applying shifts in order is sound.
        for edit in &self.edits {
            if mapped >= edit.end() {
                mapped = mapped - edit.deleted_len() + edit.inserted_len();
            } else if mapped > edit.start {
                mapped = edit.start;
            }
        }
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(start: usize, deleted: &str, inserted: &str) -> TextDeltaEdit {
        TextDeltaEdit {
            start,
            deleted_text: deleted.to_string(),
            inserted_text: inserted.to_string(),
        }
    }

    #[test]
    fn test_map_offset_insert_shifts_right() {
        let delta = TextDelta::single(edit(2, "", "xy"));

        assert_eq!(delta.map_offset(1), 1);
        assert_eq!(delta.map_offset(2), 4);
        assert_eq!(delta.map_offset(5), 7);
    }

    #[test]
    fn test_map_offset_delete_clamps_interior() {
        let delta = TextDelta::single(edit(2, "abc", ""));

        assert_eq!(delta.map_offset(2), 2);
        assert_eq!(delta.map_offset(4), 2);
        assert_eq!(delta.map_offset(5), 2);
        assert_eq!(delta.map_offset(7), 4);
    }

    #[test]
    fn test_map_offset_empty_delta_is_identity() {
        let delta = TextDelta::empty();
        assert_eq!(delta.map_offset(42), 42);
    }
}
