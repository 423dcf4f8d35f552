#![warn(missing_docs)]
//! `templar-core-lint` - Hybrid linter for `templar-core`.
//!
//! Given document text and a declared [`Dialect`](templar_core::Dialect),
//! the linter decides whether to lint at all, extracts the lintable script
//! region when the dialect embeds script inside markup, parses it, walks the
//! syntax tree for a narrow rule set (assignment to and update of
//! const-bound identifiers), and remaps findings back to whole-document
//! coordinates. It never throws to the caller: parse failures become a
//! single positional diagnostic.
//!
//! The parser is intentionally narrow: a hand-written lexer and
//! recursive-descent parser over the script subset the rule set needs, not a
//! full language implementation.

pub mod ast;
pub mod lexer;
pub mod linter;
pub mod parser;

pub use ast::{BindingKind, Declarator, Expr, Program, Stmt};
pub use lexer::{Span, Token, TokenKind, lex};
pub use linter::{DiagnosticsObserver, HybridLinter};
pub use parser::{ParseError, ParseMode, parse};
