//! Rope-backed document snapshot.
//!
//! The document is an ordered sequence of lines addressed either by character
//! offset (Unicode scalar values from the start of the buffer) or by
//! zero-based `(line, column)` positions. Read access is shared freely with
//! the derived-state components; mutation is reserved to the owning
//! [`EditorSession`](crate::EditorSession), which turns every edit into a
//! structured [`TextDelta`](crate::TextDelta).

use ropey::Rope;

/// A line-addressable text buffer.
pub struct Document {
    rope: Rope,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a document from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count (an empty document has one line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Full document text.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of one line, without the trailing newline.
    pub fn get_line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Character offset of the start of a line.
    ///
    /// Lines past the end clamp to the end of the document.
    pub fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Character offset of the end of a line's content (before its newline).
    pub fn line_end_char(&self, line: usize) -> usize {
        if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1) - 1
        } else {
            self.rope.len_chars()
        }
    }

    /// Line containing a character offset.
    pub fn char_to_line(&self, char_offset: usize) -> usize {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.char_to_line(char_offset)
    }

    /// `(line, column)` position of a character offset.
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_offset);
        (line, char_offset - self.rope.line_to_char(line))
    }

    /// Character offset of a `(line, column)` position, clamped to the line.
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start = self.rope.line_to_char(line);
        let line_len = self.line_end_char(line) - line_start;
        line_start + column.min(line_len)
    }

    /// Character at an offset, if in bounds.
    pub fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset < self.rope.len_chars() {
            Some(self.rope.char(char_offset))
        } else {
            None
        }
    }

    /// Text of the half-open character range `start..end`.
    pub fn slice_text(&self, start: usize, end: usize) -> String {
        let start = start.min(self.rope.len_chars());
        let end = end.min(self.rope.len_chars()).max(start);
        self.rope.slice(start..end).to_string()
    }

    pub(crate) fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    pub(crate) fn delete(&mut self, start: usize, end: usize) {
        let start = start.min(self.rope.len_chars());
        let end = end.min(self.rope.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_addressing() {
        let doc = Document::from_text("abc\ndef\nghi");

        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_to_char(0), 0);
        assert_eq!(doc.line_to_char(1), 4);
        assert_eq!(doc.line_end_char(1), 7);
        assert_eq!(doc.get_line_text(2).as_deref(), Some("ghi"));
        assert_eq!(doc.get_line_text(3), None);
    }

    #[test]
    fn test_offset_position_round_trip() {
        let doc = Document::from_text("abc\ndef");

        assert_eq!(doc.char_offset_to_position(5), (1, 1));
        assert_eq!(doc.position_to_char_offset(1, 1), 5);
        // Column clamps to line length, offset clamps to document end.
        assert_eq!(doc.position_to_char_offset(0, 100), 3);
        assert_eq!(doc.char_offset_to_position(100), (1, 3));
    }

    #[test]
    fn test_char_at_and_slice() {
        let doc = Document::from_text("a👋b");

        assert_eq!(doc.char_at(1), Some('👋'));
        assert_eq!(doc.char_at(3), None);
        assert_eq!(doc.slice_text(1, 3), "👋b");
    }

    #[test]
    fn test_non_ascii_offsets_are_chars() {
        let doc = Document::from_text("你好\n世界");

        assert_eq!(doc.char_count(), 5);
        assert_eq!(doc.line_to_char(1), 3);
        assert_eq!(doc.char_offset_to_position(4), (1, 1));
    }
}
