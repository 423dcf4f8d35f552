#![warn(missing_docs)]
//! Templar Core - Headless Hybrid-Dialect Editor Engine
//!
//! # Overview
//!
//! `templar-core` is the shared document abstraction and state seam for an
//! editor that hosts a custom templating dialect layered on top of a
//! general-purpose scripting language. It owns no rendering: decorations and
//! diagnostics are derived state that a host view renders as non-destructive
//! overlays.
//!
//! # Components
//!
//! - **Document model** ([`document`]): rope-backed, line-addressable text
//!   buffer; all coordinates are character offsets.
//! - **Deltas** ([`delta`]): structured per-transaction text changes with
//!   offset remapping.
//! - **Decorations** ([`decorations`]): ordered styled-range sets per marker
//!   family, rebuilt per revision.
//! - **Diagnostics** ([`diagnostics`]): positional lint findings.
//! - **Indentation** ([`indent`]): a markup-aware oracle plus a generic
//!   copy-previous-indent fallback.
//! - **Editing ergonomics** ([`ergonomics`]): bracket-pair-aware line-break
//!   expansion and blank-block collapse.
//! - **Session** ([`session`]): per-instance state, versioning, and change
//!   notifications; dialect fixed at construction.
//!
//! Derived state is produced by external crates through the
//! [`DocumentProcessor`] interface (the sigil highlighter and the hybrid
//! linter live in `templar-core-highlight` and `templar-core-lint`).
//!
//! # Quick Start
//!
//! ```rust
//! use templar_core::{Dialect, EditorSession};
//!
//! let mut session = EditorSession::new(Dialect::PlainScript, "const x = 1;").unwrap();
//! session.subscribe(|change| {
//!     println!("version {} -> {}: {:?}", change.old_version, change.new_version, change.change_type);
//! });
//!
//! let cursor = session.handle_newline(12);
//! assert_eq!(session.document().get_text(), "const x = 1;\n");
//! assert_eq!(cursor, 13);
//! ```
//!
//! # Concurrency
//!
//! Single-threaded and synchronous: every component runs on the host's
//! transaction-processing turn. A stale derived-state result is simply
//! replaced by the latest pass (last write wins); there is no in-flight work
//! to cancel.

pub mod decorations;
pub mod delta;
pub mod diagnostics;
pub mod dialect;
pub mod document;
pub mod ergonomics;
pub mod indent;
pub mod processing;
pub mod session;

pub use decorations::{
    DecorationError, DecorationSet, DecorationSetBuilder, Family, StyledRange,
};
pub use delta::{TextDelta, TextDeltaEdit};
pub use diagnostics::{Diagnostic, DiagnosticRange, DiagnosticSeverity};
pub use dialect::Dialect;
pub use document::Document;
pub use ergonomics::{KeyEdit, collapse_empty_block, expand_bracket_pair};
pub use indent::{INDENT_UNIT, MarkupScriptIndenter, current_line_indent, leading_indent_width};
pub use processing::{DocumentProcessor, ProcessingEdit};
pub use session::{EditorSession, StateChange, StateChangeCallback, StateChangeType};
