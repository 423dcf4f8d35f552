//! Indentation strategies.
//!
//! Two strategies exist: a markup-aware oracle for markup-with-script
//! documents, and a generic copy-previous-indent fallback for everything
//! else. Both return the indentation width (leading whitespace characters)
//! for the line about to be created.
//!
//! The oracle is a heuristic line-local model, not a parser-driven indenter:
//! it classifies the nearest preceding non-blank line and trades correctness
//! on deeply nested or unusually formatted code for simplicity and speed.

use regex::Regex;

use crate::document::Document;

/// Width of one indentation step, in spaces.
pub const INDENT_UNIT: usize = 2;

/// Leading-whitespace width of a line, in characters.
pub fn leading_indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Indentation width of the line containing `pos`.
///
/// This is the generic strategy installed for dialects the oracle does not
/// cover: a new line simply copies the current line's indentation.
pub fn current_line_indent(doc: &Document, pos: usize) -> usize {
    let line = doc.char_to_line(pos);
    doc.get_line_text(line)
        .map(|text| leading_indent_width(&text))
        .unwrap_or(0)
}

/// Markup-aware indentation oracle for documents that embed a script block
/// inside markup.
#[derive(Debug)]
pub struct MarkupScriptIndenter {
    script_open: Regex,
    root_opener: Regex,
    control_brace: Regex,
    named_function: Regex,
}

impl MarkupScriptIndenter {
    /// Compile the oracle's line classifiers.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // An opening script tag alone on its line (attributes allowed).
            script_open: Regex::new(r"^<script[^>]*>$")?,
            // Root-level statement openers and comment starts.
            root_opener: Regex::new(r"^(?:(?:import|export|const|let|var|function|class)\b|//|/\*)")?,
            // Control construct ending in an open brace: `if (...) {`.
            control_brace: Regex::new(r"\b(?:if|for|while|function)\s*\([^)]*\)\s*\{$")?,
            // Named function declaration opener: `function foo(...) {`.
            named_function: Regex::new(r"^function\s+\w+\s*\([^)]*\)\s*\{")?,
        })
    }

    /// Indentation width for a new line inserted at `pos`.
    ///
    /// Walks backward from the insertion point, skipping blank lines, and
    /// classifies the first non-blank line found. No non-blank history means
    /// indentation 0.
    pub fn indent_at(&self, doc: &Document, pos: usize) -> usize {
        let Some(prev_text) = nearest_non_blank_line_before(doc, pos) else {
            return 0;
        };
        let trimmed = prev_text.trim();

        // Content immediately inside a script region starts unindented.
        if self.script_open.is_match(trimmed) {
            return 0;
        }

        // A simple top-level declaration line, not the start of a nested
        // block.
        if self.root_opener.is_match(trimmed)
            && !trimmed.contains('{')
            && !trimmed.contains('(')
        {
            return 0;
        }

        let base = leading_indent_width(&prev_text);
        let opens_block = trimmed.ends_with('{')
            || trimmed.ends_with('(')
            || self.control_brace.is_match(trimmed)
            || self.named_function.is_match(trimmed);

        if opens_block { base + INDENT_UNIT } else { base }
    }
}

/// Text of the nearest line before `pos` whose trimmed content is non-empty.
fn nearest_non_blank_line_before(doc: &Document, pos: usize) -> Option<String> {
    let mut check = pos.min(doc.char_count());
    while check > 0 {
        let line = doc.char_to_line(check - 1);
        let text = doc.get_line_text(line)?;
        if !text.trim().is_empty() {
            return Some(text);
        }
        let line_start = doc.line_to_char(line);
        if line_start == 0 {
            break;
        }
        check = line_start;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indent_after(text: &str) -> usize {
        let doc = Document::from_text(text);
        let oracle = MarkupScriptIndenter::new().unwrap();
        oracle.indent_at(&doc, doc.char_count())
    }

    #[test]
    fn test_block_opener_adds_one_unit() {
        assert_eq!(indent_after("function foo() {"), 2);
        assert_eq!(indent_after("  if (x) {"), 4);
        assert_eq!(indent_after("doCall("), 2);
    }

    #[test]
    fn test_root_level_statement_resets_to_zero() {
        assert_eq!(indent_after("import x from 'y'"), 0);
        assert_eq!(indent_after("  // a comment"), 0);
        assert_eq!(indent_after("export default thing"), 0);
    }

    #[test]
    fn test_root_opener_with_paren_is_not_root_level() {
        // `const x = f(1);` contains a paren, so the root-level shortcut
        // does not apply; the base indentation is kept.
        assert_eq!(indent_after("  const x = f(1);"), 2);
    }

    #[test]
    fn test_script_open_tag_resets_to_zero() {
        assert_eq!(indent_after("<script setup>"), 0);
    }

    #[test]
    fn test_blank_history_is_zero() {
        assert_eq!(indent_after(""), 0);
        assert_eq!(indent_after("\n   \n\t\n"), 0);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(indent_after("  x = y;\n\n\n"), 2);
    }

    #[test]
    fn test_plain_line_keeps_base() {
        assert_eq!(indent_after("    call();"), 4);
    }

    #[test]
    fn test_current_line_indent_copies_line() {
        let doc = Document::from_text("    let x = 1;");
        assert_eq!(current_line_indent(&doc, doc.char_count()), 4);
    }
}
