//! Source-language dialects.

/// The declared source-language variant an editor session is configured for.
///
/// The dialect is supplied at session construction time and is immutable for
/// the lifetime of that session. It determines which indentation strategy is
/// installed and how the hybrid linter treats the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// A plain script snippet (top-level `return` and `await` allowed).
    PlainScript,
    /// Markup with an embedded script block; only the first script block is
    /// linted, and the markup-aware indentation oracle is installed.
    MarkupWithScript,
    /// Markup without script semantics; not linted.
    MarkupOnly,
    /// Structured data (e.g. configuration documents); not linted.
    StructuredData,
}

impl Dialect {
    /// Whether the hybrid linter analyzes documents of this dialect at all.
    pub fn lintable(self) -> bool {
        !matches!(self, Dialect::MarkupOnly | Dialect::StructuredData)
    }

    /// Whether the markup-aware indentation oracle applies, as opposed to the
    /// generic copy-previous-indent strategy.
    pub fn uses_indent_oracle(self) -> bool {
        matches!(self, Dialect::MarkupWithScript)
    }
}
