//! Bracket-pair editing ergonomics.
//!
//! Two intercepted key events, each a pure decision over the characters and
//! lines around the cursor. A handler either returns the single edit the key
//! event should perform, or `None` to fall through to the host's default
//! behavior. Handlers never chain multiple edits and never inspect more than
//! two neighboring lines.

use crate::document::Document;
use crate::indent::leading_indent_width;

const BRACKET_PAIRS: [(char, char); 3] = [('{', '}'), ('[', ']'), ('(', ')')];

/// The single edit a claimed key event performs, plus the resulting cursor
/// position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEdit {
    /// Start character offset of the replaced range.
    pub from: usize,
    /// Exclusive end character offset of the replaced range.
    pub to: usize,
    /// Replacement text.
    pub insert: String,
    /// Cursor position after the edit, in post-edit offsets.
    pub cursor: usize,
}

/// Line-break insertion between a matching bracket pair.
///
/// When the characters immediately before and after `pos` form a matching
/// open/close pair, `{|}` expands into a three-line block: the opener line,
/// a new line indented one unit deeper with the cursor at its end, and the
/// closer pushed to a third line at the original indentation.
pub fn expand_bracket_pair(doc: &Document, pos: usize) -> Option<KeyEdit> {
    if pos == 0 {
        return None;
    }
    let before = doc.char_at(pos - 1)?;
    let after = doc.char_at(pos)?;

    BRACKET_PAIRS
        .iter()
        .find(|(open, close)| before == *open && after == *close)?;

    let line = doc.char_to_line(pos);
    let line_text = doc.get_line_text(line)?;
    let current_indent: String = line_text
        .chars()
        .take(leading_indent_width(&line_text))
        .collect();
    let inner_indent = format!("{}  ", current_indent);

    let insert = format!("\n{}\n{}", inner_indent, current_indent);
    let cursor = pos + 1 + inner_indent.chars().count();
    Some(KeyEdit {
        from: pos,
        to: pos,
        insert,
        cursor,
    })
}

/// Backspace on a whitespace-only line sandwiched between a matching bracket
/// pair.
///
/// The blank line (and its line-break boundaries) is deleted when the cursor
/// sits at the end of a whitespace-only, non-empty line whose neighbors form
/// a bracket "sandwich": the preceding line ends with an opener and the
/// following line is exactly the matching closer, ignoring surrounding
/// whitespace. Any other shape declines the event.
pub fn collapse_empty_block(doc: &Document, pos: usize) -> Option<KeyEdit> {
    let line = doc.char_to_line(pos);
    let line_text = doc.get_line_text(line)?;

    let at_line_end = pos == doc.line_end_char(line);
    if !(line_text.trim().is_empty() && !line_text.is_empty() && at_line_end && line > 0) {
        return None;
    }
    if line + 1 >= doc.line_count() {
        return None;
    }

    let prev_text = doc.get_line_text(line - 1)?;
    let next_text = doc.get_line_text(line + 1)?;
    let prev_trimmed = prev_text.trim();
    let next_trimmed = next_text.trim();

    let sandwiched = BRACKET_PAIRS.iter().any(|(open, close)| {
        prev_trimmed.ends_with(*open) && next_trimmed == close.to_string()
    });
    if !sandwiched {
        return None;
    }

    let from = doc.line_end_char(line - 1);
    let to = doc.line_to_char(line + 1);
    Some(KeyEdit {
        from,
        to,
        insert: String::new(),
        cursor: from,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_between_braces() {
        let doc = Document::from_text("  foo() {}");
        let pos = 9; // between `{` and `}`

        let edit = expand_bracket_pair(&doc, pos).unwrap();
        assert_eq!(edit.from, pos);
        assert_eq!(edit.to, pos);
        assert_eq!(edit.insert, "\n    \n  ");
        assert_eq!(edit.cursor, pos + 1 + 4);
    }

    #[test]
    fn test_expand_between_square_and_round_pairs() {
        let doc = Document::from_text("a = []");
        let edit = expand_bracket_pair(&doc, 5).unwrap();
        assert_eq!(edit.insert, "\n  \n");
        assert_eq!(edit.cursor, 5 + 1 + 2);

        let doc = Document::from_text("  f()");
        let edit = expand_bracket_pair(&doc, 4).unwrap();
        assert_eq!(edit.insert, "\n    \n  ");
        assert_eq!(edit.cursor, 4 + 1 + 4);
    }

    #[test]
    fn test_expand_declines_without_pair() {
        let doc = Document::from_text("{x}");
        assert_eq!(expand_bracket_pair(&doc, 1), None);
        assert_eq!(expand_bracket_pair(&doc, 0), None);
    }

    #[test]
    fn test_expand_declines_mismatched_pair() {
        let doc = Document::from_text("{]");
        assert_eq!(expand_bracket_pair(&doc, 1), None);
    }

    #[test]
    fn test_collapse_sandwiched_blank_line() {
        let doc = Document::from_text("a = [\n  \n]");
        let pos = doc.line_end_char(1);

        let edit = collapse_empty_block(&doc, pos).unwrap();
        assert_eq!(edit.from, 5);
        assert_eq!(edit.to, 9);
        assert_eq!(edit.insert, "");
        assert_eq!(edit.cursor, 5);
    }

    #[test]
    fn test_collapse_declines_on_truly_empty_line() {
        // The line must be whitespace-only but non-empty in its own right.
        let doc = Document::from_text("a = [\n\n]");
        assert_eq!(collapse_empty_block(&doc, 6), None);
    }

    #[test]
    fn test_collapse_declines_without_sandwich() {
        let doc = Document::from_text("a = x\n  \nb");
        let pos = doc.line_end_char(1);
        assert_eq!(collapse_empty_block(&doc, pos), None);
    }

    #[test]
    fn test_collapse_declines_mid_line_cursor() {
        let doc = Document::from_text("a = [\n  \n]");
        let pos = doc.line_to_char(1) + 1;
        assert_eq!(collapse_empty_block(&doc, pos), None);
    }
}
