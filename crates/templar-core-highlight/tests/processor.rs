use templar_core::{Dialect, EditorSession, Family};
use templar_core_highlight::SigilHighlightProcessor;

#[test]
fn test_rescan_after_edit_replaces_decorations() {
    let mut session = EditorSession::new(Dialect::PlainScript, "select #users").unwrap();
    let mut processor = SigilHighlightProcessor::new().unwrap();

    session.apply_processor(&mut processor).unwrap();
    assert_eq!(session.decorations().len(), 1);
    assert_eq!(session.decorations().ranges()[0].family, Family::TableReference);

    session.insert(13, " where %id = @PARAMS");
    session.apply_processor(&mut processor).unwrap();

    let families: Vec<_> = session
        .decorations()
        .ranges()
        .iter()
        .map(|r| r.family)
        .collect();
    assert_eq!(
        families,
        vec![
            Family::TableReference,
            Family::Interpolation,
            Family::TemplateDirective,
        ]
    );
}

#[test]
fn test_selection_only_transaction_reuses_previous_set() {
    let mut session = EditorSession::new(Dialect::PlainScript, "#users %id").unwrap();
    let mut processor = SigilHighlightProcessor::new().unwrap();
    session.apply_processor(&mut processor).unwrap();

    let before: Vec<_> = session.decorations().ranges().to_vec();
    session.selection_moved();
    assert_eq!(session.decorations().ranges(), &before[..]);
}

#[test]
fn test_edit_shifts_overlay_and_rescan_converges() {
    let mut session = EditorSession::new(Dialect::PlainScript, "#users").unwrap();
    let mut processor = SigilHighlightProcessor::new().unwrap();
    session.apply_processor(&mut processor).unwrap();

    // The mechanical shift keeps the overlay on the token; the rescan then
    // produces the same answer from scratch.
    session.insert(0, "-- ");
    let shifted = session.decorations().ranges().to_vec();
    session.apply_processor(&mut processor).unwrap();
    assert_eq!(session.decorations().ranges(), &shifted[..]);
    assert_eq!((shifted[0].start, shifted[0].end), (3, 9));
}
