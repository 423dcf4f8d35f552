//! Generic document processing interfaces.
//!
//! Derived editor state (decorations, diagnostics) is produced by external
//! components as [`ProcessingEdit`] values and applied to an
//! [`EditorSession`](crate::EditorSession) via
//! [`EditorSession::apply_processing_edits`](crate::EditorSession::apply_processing_edits).
//! This keeps the producers pure over the document snapshot: they never
//! mutate session state directly.

use crate::EditorSession;
use crate::decorations::DecorationSet;
use crate::diagnostics::Diagnostic;

/// A change to derived editor state.
#[derive(Debug, Clone)]
pub enum ProcessingEdit {
    /// Replace the whole decoration set for the current revision.
    ReplaceDecorations {
        /// The full decoration set (ordered, non-overlapping per family).
        decorations: DecorationSet,
    },
    /// Clear all decorations.
    ClearDecorations,
    /// Replace the full diagnostics list.
    ReplaceDiagnostics {
        /// Diagnostics for the current revision.
        diagnostics: Vec<Diagnostic>,
    },
    /// Clear all diagnostics.
    ClearDiagnostics,
}

/// A processor that derives editor state from the current document.
///
/// Processors run synchronously on the host's transaction-processing turn;
/// a stale result is simply replaced by the next pass (last write wins).
pub trait DocumentProcessor {
    /// The error type returned by [`DocumentProcessor::process`].
    type Error;

    /// Compute derived state updates for the session's current document.
    fn process(&mut self, session: &EditorSession) -> Result<Vec<ProcessingEdit>, Self::Error>;
}
