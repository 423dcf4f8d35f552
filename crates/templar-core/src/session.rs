//! Editor session: per-instance state and change notifications.
//!
//! An [`EditorSession`] owns one document, the dialect it was constructed
//! with, and the derived state (decorations, diagnostics) produced for the
//! current revision. Every mutation runs synchronously on the caller's turn,
//! bumps the version counter, and notifies subscribers with a
//! [`StateChange`]; derived-state producers react to those notifications and
//! feed results back through [`EditorSession::apply_processing_edits`].

use std::sync::Arc;

use crate::decorations::DecorationSet;
use crate::delta::{TextDelta, TextDeltaEdit};
use crate::diagnostics::Diagnostic;
use crate::dialect::Dialect;
use crate::document::Document;
use crate::ergonomics::{KeyEdit, collapse_empty_block, expand_bracket_pair};
use crate::indent::{MarkupScriptIndenter, current_line_indent};
use crate::processing::{DocumentProcessor, ProcessingEdit};

/// State change type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Document content modified.
    DocumentModified,
    /// Selection moved without a text change.
    SelectionMoved,
    /// Decorations replaced or cleared.
    DecorationsChanged,
    /// Diagnostics replaced or cleared.
    DiagnosticsChanged,
}

/// State change record delivered to subscribers.
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type.
    pub change_type: StateChangeType,
    /// Version before the change.
    pub old_version: u64,
    /// Version after the change.
    pub new_version: u64,
    /// Structured text delta for document changes.
    pub text_delta: Option<Arc<TextDelta>>,
}

/// State change callback function type.
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// A single editor instance: document, fixed dialect, derived state, and
/// subscriber callbacks.
pub struct EditorSession {
    dialect: Dialect,
    document: Document,
    version: u64,
    decorations: DecorationSet,
    diagnostics: Vec<Diagnostic>,
    callbacks: Vec<StateChangeCallback>,
    /// Markup-aware indenter, installed only for dialects that need it.
    indenter: Option<MarkupScriptIndenter>,
}

impl EditorSession {
    /// Create a session for one dialect. The dialect is immutable for the
    /// lifetime of the session.
    pub fn new(dialect: Dialect, text: &str) -> Result<Self, regex::Error> {
        let indenter = if dialect.uses_indent_oracle() {
            Some(MarkupScriptIndenter::new()?)
        } else {
            None
        };
        Ok(Self {
            dialect,
            document: Document::from_text(text),
            version: 0,
            decorations: DecorationSet::empty(),
            diagnostics: Vec::new(),
            callbacks: Vec::new(),
            indenter,
        })
    }

    /// The session's dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The current document snapshot.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current state version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Decorations for the current revision.
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// Diagnostics from the latest lint pass.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Subscribe to state change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Insert text at a character offset.
    pub fn insert(&mut self, offset: usize, text: &str) {
        self.replace(offset, offset, text);
    }

    /// Delete the half-open character range `start..end`.
    pub fn delete(&mut self, start: usize, end: usize) {
        self.replace(start, end, "");
    }

    /// Replace the half-open character range `from..to` with `insert`.
    ///
    /// The previous decoration set is mechanically shifted through the
    /// resulting delta so overlays stay aligned until the next full rescan.
    pub fn replace(&mut self, from: usize, to: usize, insert: &str) {
        let from = from.min(self.document.char_count());
        let to = to.min(self.document.char_count()).max(from);

        let delta = TextDelta::single(TextDeltaEdit {
            start: from,
            deleted_text: self.document.slice_text(from, to),
            inserted_text: insert.to_string(),
        });

        self.document.delete(from, to);
        self.document.insert(from, insert);
        self.decorations = self.decorations.map(&delta);

        let old_version = self.version;
        self.version += 1;
        let change = StateChange {
            change_type: StateChangeType::DocumentModified,
            old_version,
            new_version: self.version,
            text_delta: Some(Arc::new(delta)),
        };
        self.notify(&change);
    }

    /// Record a selection-only transaction.
    ///
    /// No text changed, so the previous decoration set is reused as-is and
    /// the version is left untouched.
    pub fn selection_moved(&mut self) {
        let change = StateChange {
            change_type: StateChangeType::SelectionMoved,
            old_version: self.version,
            new_version: self.version,
            text_delta: None,
        };
        self.notify(&change);
    }

    /// Handle a line-break key event at `pos`.
    ///
    /// Tries the bracket-pair expansion first; otherwise inserts a newline
    /// indented by the dialect's strategy. Returns the cursor position after
    /// the edit.
    pub fn handle_newline(&mut self, pos: usize) -> usize {
        if let Some(edit) = expand_bracket_pair(&self.document, pos) {
            return self.apply_key_edit(edit);
        }

        let width = match &self.indenter {
            Some(oracle) => oracle.indent_at(&self.document, pos),
            None => current_line_indent(&self.document, pos),
        };
        let insert = format!("\n{}", " ".repeat(width));
        let cursor = pos + insert.chars().count();
        self.apply_key_edit(KeyEdit {
            from: pos,
            to: pos,
            insert,
            cursor,
        })
    }

    /// Handle a backspace key event at `pos`.
    ///
    /// Returns `true` when the event was claimed (an empty bracket block was
    /// collapsed); `false` lets the host's default backspace run.
    pub fn handle_backspace(&mut self, pos: usize) -> bool {
        match collapse_empty_block(&self.document, pos) {
            Some(edit) => {
                self.apply_key_edit(edit);
                true
            }
            None => false,
        }
    }

    fn apply_key_edit(&mut self, edit: KeyEdit) -> usize {
        self.replace(edit.from, edit.to, &edit.insert);
        edit.cursor
    }

    /// Apply derived-state edits produced by a document processor.
    pub fn apply_processing_edits<I>(&mut self, edits: I)
    where
        I: IntoIterator<Item = ProcessingEdit>,
    {
        for edit in edits {
            match edit {
                ProcessingEdit::ReplaceDecorations { decorations } => {
                    self.decorations = decorations;
                    self.mark_changed(StateChangeType::DecorationsChanged);
                }
                ProcessingEdit::ClearDecorations => {
                    self.decorations = DecorationSet::empty();
                    self.mark_changed(StateChangeType::DecorationsChanged);
                }
                ProcessingEdit::ReplaceDiagnostics { diagnostics } => {
                    self.diagnostics = diagnostics;
                    self.mark_changed(StateChangeType::DiagnosticsChanged);
                }
                ProcessingEdit::ClearDiagnostics => {
                    self.diagnostics.clear();
                    self.mark_changed(StateChangeType::DiagnosticsChanged);
                }
            }
        }
    }

    /// Run a [`DocumentProcessor`] against the current document and apply
    /// its edits.
    pub fn apply_processor<P>(&mut self, processor: &mut P) -> Result<(), P::Error>
    where
        P: DocumentProcessor,
    {
        let edits = processor.process(self)?;
        self.apply_processing_edits(edits);
        Ok(())
    }

    fn mark_changed(&mut self, change_type: StateChangeType) {
        let old_version = self.version;
        self.version += 1;
        let change = StateChange {
            change_type,
            old_version,
            new_version: self.version,
            text_delta: None,
        };
        self.notify(&change);
    }

    fn notify(&mut self, change: &StateChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_builds_delta_and_bumps_version() {
        let mut session = EditorSession::new(Dialect::PlainScript, "hello world").unwrap();

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = std::sync::Arc::clone(&seen);
        session.subscribe(move |change| {
            seen_clone.lock().unwrap().push(change.clone());
        });

        session.replace(6, 11, "there");
        assert_eq!(session.document().get_text(), "hello there");
        assert_eq!(session.version(), 1);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].change_type, StateChangeType::DocumentModified);
        let delta = seen[0].text_delta.as_ref().unwrap();
        assert_eq!(delta.edits[0].deleted_text, "world");
        assert_eq!(delta.edits[0].inserted_text, "there");
    }

    #[test]
    fn test_selection_moved_keeps_version() {
        let mut session = EditorSession::new(Dialect::PlainScript, "x").unwrap();
        session.selection_moved();
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_newline_default_copies_indent_for_plain_script() {
        let mut session = EditorSession::new(Dialect::PlainScript, "  call();").unwrap();
        let cursor = session.handle_newline(9);

        assert_eq!(session.document().get_text(), "  call();\n  ");
        assert_eq!(cursor, 12);
    }

    #[test]
    fn test_newline_oracle_indents_inside_block() {
        let mut session =
            EditorSession::new(Dialect::MarkupWithScript, "function foo() {").unwrap();
        let cursor = session.handle_newline(16);

        assert_eq!(session.document().get_text(), "function foo() {\n  ");
        assert_eq!(cursor, 19);
    }

    #[test]
    fn test_backspace_declined_leaves_document_untouched() {
        let mut session = EditorSession::new(Dialect::PlainScript, "abc").unwrap();
        assert!(!session.handle_backspace(3));
        assert_eq!(session.document().get_text(), "abc");
        assert_eq!(session.version(), 0);
    }
}
