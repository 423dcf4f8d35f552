//! `templar-core-highlight` - Sigil token decorator for `templar-core`.
//!
//! Scans the document for the three template-dialect marker families and
//! emits a [`DecorationSet`] covering every match. The scan is a pure
//! function of the document: any text change triggers a full rescan, which
//! is a deliberate simplicity-over-performance tradeoff at editor-buffer
//! scale (thousands, not millions, of lines). Selection-only transactions
//! reuse the previous set.

use regex::Regex;
use templar_core::processing::{DocumentProcessor, ProcessingEdit};
use templar_core::{DecorationError, DecorationSet, DecorationSetBuilder, Document, EditorSession, Family};

/// The closed vocabulary of template-directive names accepted after `@`.
const DIRECTIVE_VOCABULARY: &str =
    "CACHE|REPOS|HELPERS|LOGS|ERRORS|BODY|DATA|STATUS|PARAMS|QUERY|USER|REQ|RES|SHARE|API|UPLOADED|THROW";

/// Regex-based decorator for the three sigil marker families.
///
/// - `@NAME` with `NAME` in the closed directive vocabulary
/// - `#identifier` table references
/// - `%identifier` interpolations
///
/// A `#` or `%` followed by a digit or symbol is not a match: identifiers
/// must start with a letter or underscore, which keeps numeric literals,
/// hash colors, and modulo operators undecorated.
#[derive(Debug, Clone)]
pub struct SigilHighlighter {
    template_directive: Regex,
    table_reference: Regex,
    interpolation: Regex,
}

impl SigilHighlighter {
    /// Compile the three family patterns.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            template_directive: Regex::new(&format!(r"@(?:{})\b", DIRECTIVE_VOCABULARY))?,
            table_reference: Regex::new(r"#[A-Za-z_][A-Za-z0-9_]*")?,
            interpolation: Regex::new(r"%[A-Za-z_][A-Za-z0-9_]*")?,
        })
    }

    /// Scan the whole document and build the decoration set for this
    /// revision.
    ///
    /// Lines are scanned top to bottom; within a line the three patterns run
    /// to exhaustion in family order, and the line's matches are ordered by
    /// start offset before they reach the builder (the builder cannot
    /// re-sort, and a single line may contain all three families).
    pub fn decorate(&self, doc: &Document) -> Result<DecorationSet, DecorationError> {
        let mut builder = DecorationSetBuilder::new();
        let families: [(&Regex, Family); 3] = [
            (&self.template_directive, Family::TemplateDirective),
            (&self.table_reference, Family::TableReference),
            (&self.interpolation, Family::Interpolation),
        ];

        for line in 0..doc.line_count() {
            let Some(line_text) = doc.get_line_text(line) else {
                continue;
            };
            let line_start = doc.line_to_char(line);

            let mut line_matches: Vec<(usize, usize, Family)> = Vec::new();
            for (regex, family) in families {
                for m in regex.find_iter(&line_text) {
                    let start = line_start + char_offset(&line_text, m.start());
                    let end = line_start + char_offset(&line_text, m.end());
                    line_matches.push((start, end, family));
                }
            }

            line_matches.sort_by_key(|(start, _, _)| *start);
            for (start, end, family) in line_matches {
                builder.add(start, end, family)?;
            }
        }

        Ok(builder.finish())
    }
}

/// Character offset of a byte position within a line.
fn char_offset(line_text: &str, byte_offset: usize) -> usize {
    line_text[..byte_offset].chars().count()
}

/// A processor that feeds [`SigilHighlighter`] output into an editor session
/// through the generic processing interface.
#[derive(Debug, Clone)]
pub struct SigilHighlightProcessor {
    highlighter: SigilHighlighter,
}

impl SigilHighlightProcessor {
    /// Create a processor with freshly compiled patterns.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            highlighter: SigilHighlighter::new()?,
        })
    }

    /// The wrapped highlighter.
    pub fn highlighter(&self) -> &SigilHighlighter {
        &self.highlighter
    }
}

impl DocumentProcessor for SigilHighlightProcessor {
    type Error = DecorationError;

    fn process(&mut self, session: &EditorSession) -> Result<Vec<ProcessingEdit>, Self::Error> {
        let decorations = self.highlighter.decorate(session.document())?;
        Ok(vec![ProcessingEdit::ReplaceDecorations { decorations }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decorate(text: &str) -> DecorationSet {
        let doc = Document::from_text(text);
        SigilHighlighter::new().unwrap().decorate(&doc).unwrap()
    }

    #[test]
    fn test_directive_vocabulary_only() {
        let set = decorate("@BODY @NOPE @CACHE");
        let families: Vec<_> = set.ranges().iter().map(|r| r.family).collect();
        assert_eq!(
            families,
            vec![Family::TemplateDirective, Family::TemplateDirective]
        );
        assert_eq!(set.ranges()[0].start, 0);
        assert_eq!(set.ranges()[0].end, 5);
        assert_eq!(set.ranges()[1].start, 12);
        assert_eq!(set.ranges()[1].end, 18);
    }

    #[test]
    fn test_sigil_before_digit_is_not_a_match() {
        assert!(decorate("#123 %42 #0xff").is_empty());
    }

    #[test]
    fn test_sigil_before_identifier_spans_maximal_run() {
        let set = decorate("x = #users_2 + %id");
        assert_eq!(set.len(), 2);
        assert_eq!((set.ranges()[0].start, set.ranges()[0].end), (4, 12));
        assert_eq!(set.ranges()[0].family, Family::TableReference);
        assert_eq!((set.ranges()[1].start, set.ranges()[1].end), (15, 18));
        assert_eq!(set.ranges()[1].family, Family::Interpolation);
    }

    #[test]
    fn test_mixed_families_on_one_line_stay_ordered() {
        // Table reference before a directive: family-order scanning alone
        // would produce a decreasing start sequence here.
        let set = decorate("#users @BODY %id");
        let starts: Vec<_> = set.ranges().iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0, 7, 13]);
    }

    #[test]
    fn test_ranges_strictly_ordered_within_family() {
        let set = decorate("#a #b\n%x %y\n@BODY @DATA");
        for family in [
            Family::TemplateDirective,
            Family::TableReference,
            Family::Interpolation,
        ] {
            let ranges: Vec<_> = set
                .ranges()
                .iter()
                .filter(|r| r.family == family)
                .collect();
            for pair in ranges.windows(2) {
                assert!(pair[0].end <= pair[1].start);
                assert!(pair[0].start < pair[1].start);
            }
        }
    }

    #[test]
    fn test_offsets_are_char_based_after_wide_text() {
        let set = decorate("你好 #users");
        assert_eq!(set.len(), 1);
        assert_eq!((set.ranges()[0].start, set.ranges()[0].end), (3, 9));
    }
}
