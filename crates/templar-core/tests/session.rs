use std::sync::{Arc, Mutex};

use templar_core::{
    DecorationSetBuilder, Dialect, EditorSession, Family, ProcessingEdit, StateChangeType,
};

#[test]
fn test_document_change_notifies_with_delta() {
    let mut session = EditorSession::new(Dialect::PlainScript, "abc").unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    session.subscribe(move |change| {
        seen_clone
            .lock()
            .unwrap()
            .push((change.change_type, change.text_delta.is_some()));
    });

    session.insert(3, "!");
    session.selection_moved();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (StateChangeType::DocumentModified, true),
            (StateChangeType::SelectionMoved, false),
        ]
    );
}

#[test]
fn test_decorations_shift_through_edits_until_rescan() {
    let mut session = EditorSession::new(Dialect::PlainScript, "x #users y").unwrap();

    let mut builder = DecorationSetBuilder::new();
    builder.add(2, 8, Family::TableReference).unwrap();
    session.apply_processing_edits(vec![ProcessingEdit::ReplaceDecorations {
        decorations: builder.finish(),
    }]);
    assert_eq!(session.decorations().len(), 1);

    // An insertion before the range shifts it; the overlay stays aligned
    // until the next full rescan replaces the set.
    session.insert(0, "ab");
    let range = session.decorations().ranges()[0];
    assert_eq!((range.start, range.end), (4, 10));
}

#[test]
fn test_newline_between_brackets_expands_to_three_lines() {
    let mut session = EditorSession::new(Dialect::PlainScript, "  obj = {}").unwrap();
    let cursor = session.handle_newline(9);

    assert_eq!(session.document().get_text(), "  obj = {\n    \n  }");
    // Cursor at the end of the indented middle line.
    assert_eq!(cursor, 14);
    assert_eq!(session.document().line_count(), 3);
    assert_eq!(session.document().get_line_text(0).as_deref(), Some("  obj = {"));
    assert_eq!(session.document().get_line_text(1).as_deref(), Some("    "));
    assert_eq!(session.document().get_line_text(2).as_deref(), Some("  }"));
}

#[test]
fn test_backspace_collapses_bracket_sandwich() {
    let mut session = EditorSession::new(Dialect::PlainScript, "a = [\n  \n]").unwrap();
    let pos = session.document().line_end_char(1);

    assert!(session.handle_backspace(pos));
    assert_eq!(session.document().get_text(), "a = []");
}

#[test]
fn test_backspace_declines_outside_sandwich() {
    let mut session = EditorSession::new(Dialect::PlainScript, "a = 1\n  \nb = 2").unwrap();
    let pos = session.document().line_end_char(1);

    assert!(!session.handle_backspace(pos));
    assert_eq!(session.document().get_text(), "a = 1\n  \nb = 2");
}

#[test]
fn test_markup_dialect_uses_indent_oracle() {
    let text = "<script setup>\nconst x = 1;\n";
    let mut session = EditorSession::new(Dialect::MarkupWithScript, text).unwrap();

    // After a root-level declaration the oracle resets to column zero even
    // though a generic strategy would copy indentation.
    let cursor = session.handle_newline(session.document().char_count());
    assert_eq!(cursor, session.document().char_count());
    assert!(session.document().get_text().ends_with("const x = 1;\n\n"));
}

#[test]
fn test_expand_collapse_round_trip() {
    let mut session = EditorSession::new(Dialect::PlainScript, "f() {}").unwrap();
    let cursor = session.handle_newline(5);

    assert_eq!(session.document().get_text(), "f() {\n  \n}");
    assert!(session.handle_backspace(cursor));
    assert_eq!(session.document().get_text(), "f() {}");
}
