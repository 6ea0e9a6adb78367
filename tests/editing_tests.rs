//! Integrationstests für Create/Edit/Delete und Undo/Redo:
//! - Round-Trip Create → Undo → Redo mit ID-Neuzuordnung
//! - Fehlerpfade (abgelehnte Persistenz, abgelehnte Replays, Abbruch)
//! - Überlappende Mutationen

use futures_util::future::join;
use glam::DVec2;
use map_edit_core::app::handlers;
use map_edit_core::app::{MutationFlags, SessionEvent, Tool, ToolName};
use map_edit_core::{
    EditError, EditingMode, EditingSession, EditorOptions, FeatureId, Geometry, GeometryKind,
    InMemoryFeatureStore, Layer, MutationEvent,
};
use serde_json::json;
use std::rc::Rc;

const LAYER: u64 = 1;

fn session_with(options: EditorOptions) -> (Rc<InMemoryFeatureStore>, EditingSession) {
    let store = Rc::new(InMemoryFeatureStore::new());
    let mut session = EditingSession::new(store.clone(), store.clone(), options);
    handlers::layers::layer_added(&mut session, Layer::new(LAYER, "Hydranten"));
    (store, session)
}

fn new_session() -> (Rc<InMemoryFeatureStore>, EditingSession) {
    session_with(EditorOptions::default())
}

/// Zeichnet einen Punkt im AddShape-Modus und wartet auf die Persistenz.
fn create_point(session: &mut EditingSession, x: f64, y: f64) -> FeatureId {
    handlers::mode::set_mode(session, EditingMode::AddShape);
    handlers::mutation::begin_drawing(session, GeometryKind::Point).expect("Zeichnung startbar");
    let pending = handlers::mutation::place_vertex(session, DVec2::new(x, y))
        .expect("Punkt setzbar")
        .expect("Punkt schließt sofort ab");
    match pollster::block_on(session.run(pending)) {
        Ok(MutationEvent::Created { feature, .. }) => feature.id.expect("persistiert"),
        other => panic!("Unerwartetes Ergebnis: {other:?}"),
    }
}

fn undo(session: &mut EditingSession) -> Result<MutationEvent, EditError> {
    let pending = handlers::history::undo(session)
        .expect("Undo startbar")
        .expect("Undo erlaubt");
    pollster::block_on(session.run(pending))
}

fn redo(session: &mut EditingSession) -> Result<MutationEvent, EditError> {
    let pending = handlers::history::redo(session)
        .expect("Redo startbar")
        .expect("Redo erlaubt");
    pollster::block_on(session.run(pending))
}

fn stack_sizes(session: &EditingSession) -> (usize, usize) {
    let history = &session.active_entry().expect("aktiver Layer").tools.history;
    (history.done_len(), history.undone_len())
}

fn mutation_events(session: &EditingSession) -> usize {
    session
        .events
        .entries()
        .iter()
        .filter(|e| matches!(e, SessionEvent::Mutation(_)))
        .count()
}

fn geometry_of(session: &EditingSession, id: FeatureId) -> Option<Geometry> {
    session
        .layer(LAYER)
        .and_then(|l| l.feature(id))
        .map(|f| f.geometry.clone())
}

// ── Create / Undo / Redo ─────────────────────────────────────────

#[test]
fn create_undo_redo_round_trip_restores_feature_under_new_id() {
    let (store, mut session) = new_session();
    let first = create_point(&mut session, 1.0, 2.0);

    let undone = undo(&mut session).expect("Undo persistiert");
    assert!(matches!(undone, MutationEvent::Deleted { flags, .. } if flags == MutationFlags::undo()));
    assert_eq!(session.layer(LAYER).expect("Layer").feature_count(), 0);

    let redone = redo(&mut session).expect("Redo persistiert");
    let second = match redone {
        MutationEvent::Created { feature, flags, .. } => {
            assert_eq!(flags, MutationFlags::redo());
            assert_eq!(feature.geometry, Geometry::Point(DVec2::new(1.0, 2.0)));
            feature.id.expect("neue ID")
        }
        other => panic!("Unerwartetes Event: {other:?}"),
    };
    assert_ne!(first, second);
    assert_eq!(
        geometry_of(&session, second),
        Some(Geometry::Point(DVec2::new(1.0, 2.0)))
    );

    // Das zweite Undo trifft das neu angelegte Feature
    let undone_again = undo(&mut session).expect("Undo persistiert");
    assert_eq!(undone_again.feature_id(), Some(second));
    assert_eq!(store.stored_count(LAYER), 0);
}

#[test]
fn replays_are_not_recorded_as_new_entries() {
    let (_store, mut session) = new_session();
    create_point(&mut session, 0.0, 0.0);
    assert_eq!(stack_sizes(&session), (1, 0));

    undo(&mut session).expect("Undo persistiert");
    assert_eq!(stack_sizes(&session), (0, 1));

    redo(&mut session).expect("Redo persistiert");
    assert_eq!(stack_sizes(&session), (1, 0));
    assert_eq!(mutation_events(&session), 3);
}

#[test]
fn new_mutation_discards_redo_stack() {
    let (_store, mut session) = new_session();
    create_point(&mut session, 0.0, 0.0);
    undo(&mut session).expect("Undo persistiert");
    assert!(session.can_redo());

    create_point(&mut session, 5.0, 5.0);

    assert_eq!(stack_sizes(&session), (1, 0));
    assert!(!session.can_redo());
    assert!(handlers::history::redo(&mut session)
        .expect("kein Fehler")
        .is_none());
}

#[test]
fn history_depth_is_bounded() {
    let (_store, mut session) = session_with(EditorOptions {
        history_max_depth: 2,
        ..EditorOptions::default()
    });

    for x in 0..3 {
        create_point(&mut session, f64::from(x), 0.0);
    }

    assert_eq!(stack_sizes(&session), (2, 0));
}

#[test]
fn undo_works_outside_editing_modes() {
    let (_store, mut session) = new_session();
    let id = create_point(&mut session, 0.0, 0.0);
    handlers::mode::set_mode(&mut session, EditingMode::Select);
    assert!(!session.active_tools().contains(&ToolName::RedoUndo));

    undo(&mut session).expect("Undo persistiert");

    assert!(session.layer(LAYER).expect("Layer").feature(id).is_none());
}

#[test]
fn undo_without_entries_is_a_no_op() {
    let (store, mut session) = new_session();
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);

    let pending = handlers::history::undo(&mut session).expect("kein Fehler");

    assert!(pending.is_none());
    assert_eq!(store.calls().deletes, 0);
}

// ── Edit ─────────────────────────────────────────────────────────

#[test]
fn edit_replaces_layer_copy_and_undo_restores_old_version() {
    let (_store, mut session) = new_session();
    let id = create_point(&mut session, 1.0, 1.0);
    handlers::mode::set_mode(&mut session, EditingMode::EditShape);

    handlers::mutation::begin_edit(&mut session, id).expect("Bearbeitung startbar");
    handlers::mutation::update_edit_geometry(&mut session, Geometry::Point(DVec2::new(8.0, 9.0)))
        .expect("Geometrie änderbar");
    handlers::mutation::set_edit_attribute(&mut session, "name".into(), json!("Hydrant 7"))
        .expect("Attribut änderbar");
    let pending = handlers::mutation::save_edit(&mut session)
        .expect("Bearbeitung abschickbar")
        .expect("Änderung vorhanden");
    let edited = pollster::block_on(session.run(pending)).expect("Update persistiert");

    match &edited {
        MutationEvent::Edited { new, old, flags, .. } => {
            assert_eq!(new.geometry, Geometry::Point(DVec2::new(8.0, 9.0)));
            assert_eq!(old.geometry, Geometry::Point(DVec2::new(1.0, 1.0)));
            assert!(!flags.is_replay());
        }
        other => panic!("Unerwartetes Event: {other:?}"),
    }
    let cached = session.cache.cached(LAYER, id).expect("Write-Through");
    assert_eq!(cached.attributes.get("name"), Some(&json!("Hydrant 7")));

    undo(&mut session).expect("Undo persistiert");

    assert_eq!(
        geometry_of(&session, id),
        Some(Geometry::Point(DVec2::new(1.0, 1.0)))
    );
    let cached = session.cache.cached(LAYER, id).expect("Write-Through");
    assert!(cached.attributes.get("name").is_none());
}

#[test]
fn history_is_locked_while_an_edit_is_open() {
    let (store, mut session) = new_session();
    let id = create_point(&mut session, 1.0, 1.0);
    handlers::mode::set_mode(&mut session, EditingMode::EditShape);
    handlers::mutation::begin_edit(&mut session, id).expect("Bearbeitung startbar");

    assert!(!session.can_undo());
    assert!(handlers::history::undo(&mut session)
        .expect("kein Fehler")
        .is_none());
    assert_eq!(store.calls().deletes, 0);

    assert!(handlers::mutation::cancel_edit(&mut session));
    assert!(session.can_undo());
}

#[test]
fn unchanged_edit_is_not_persisted() {
    let (store, mut session) = new_session();
    let id = create_point(&mut session, 1.0, 1.0);
    handlers::mode::set_mode(&mut session, EditingMode::EditShape);
    handlers::mutation::begin_edit(&mut session, id).expect("Bearbeitung startbar");

    let pending = handlers::mutation::save_edit(&mut session).expect("kein Fehler");

    assert!(pending.is_none());
    assert_eq!(store.calls().updates, 0);
    assert_eq!(stack_sizes(&session), (1, 0));
}

#[test]
fn rejected_edit_is_restored_for_retry() {
    let (store, mut session) = new_session();
    let id = create_point(&mut session, 1.0, 1.0);
    handlers::mode::set_mode(&mut session, EditingMode::EditShape);
    handlers::mutation::begin_edit(&mut session, id).expect("Bearbeitung startbar");
    handlers::mutation::update_edit_geometry(&mut session, Geometry::Point(DVec2::new(2.0, 2.0)))
        .expect("Geometrie änderbar");
    store.fail_next_writes(1);

    let pending = handlers::mutation::save_edit(&mut session)
        .expect("abschickbar")
        .expect("Änderung vorhanden");
    let result = pollster::block_on(session.run(pending));

    assert!(matches!(result, Err(EditError::Persistence(_))));
    assert_eq!(
        geometry_of(&session, id),
        Some(Geometry::Point(DVec2::new(1.0, 1.0)))
    );
    let edit = &session.active_entry().expect("aktiver Layer").tools.edit;
    let current = edit.current().expect("Bearbeitung wiederhergestellt");
    assert_eq!(current.working.geometry, Geometry::Point(DVec2::new(2.0, 2.0)));
    assert_eq!(stack_sizes(&session), (1, 0));
}

#[test]
fn rejected_edit_after_mode_switch_does_not_lock_history() {
    let (store, mut session) = new_session();
    let id = create_point(&mut session, 1.0, 1.0);
    handlers::mode::set_mode(&mut session, EditingMode::EditShape);
    handlers::mutation::begin_edit(&mut session, id).expect("Bearbeitung startbar");
    handlers::mutation::update_edit_geometry(&mut session, Geometry::Point(DVec2::new(2.0, 2.0)))
        .expect("Geometrie änderbar");
    store.fail_next_writes(1);
    let pending = handlers::mutation::save_edit(&mut session)
        .expect("abschickbar")
        .expect("Änderung vorhanden");

    handlers::mode::set_mode(&mut session, EditingMode::DeleteShape);
    assert!(session.can_undo());
    let result = pollster::block_on(session.run(pending));

    assert!(matches!(result, Err(EditError::Persistence(_))));
    let edit = &session.active_entry().expect("aktiver Layer").tools.edit;
    assert!(!edit.is_active());
    assert!(!edit.is_editing());
    assert_eq!(stack_sizes(&session), (1, 0));
    assert!(session.can_undo());
}

// ── Delete ───────────────────────────────────────────────────────

#[test]
fn delete_removes_feature_from_layer_cache_and_selection() {
    let (_store, mut session) = new_session();
    let id = create_point(&mut session, 1.0, 1.0);
    handlers::mode::set_mode(&mut session, EditingMode::Select);
    handlers::selection::select_feature(&mut session, id, false).expect("selektierbar");
    assert!(session.cache.cached(LAYER, id).is_some());

    handlers::mode::set_mode(&mut session, EditingMode::DeleteShape);
    let pending = handlers::mutation::delete_feature(&mut session, id).expect("löschbar");
    let deleted = pollster::block_on(session.run(pending)).expect("Delete persistiert");

    assert_eq!(deleted.feature_id(), Some(id));
    assert!(session.layer(LAYER).expect("Layer").feature(id).is_none());
    assert!(session.cache.cached(LAYER, id).is_none());
    assert!(!session.selection.contains(id));
}

#[test]
fn delete_keeps_selection_when_configured() {
    let (_store, mut session) = session_with(EditorOptions {
        clear_selection_on_delete: false,
        ..EditorOptions::default()
    });
    let id = create_point(&mut session, 1.0, 1.0);
    handlers::mode::set_mode(&mut session, EditingMode::Select);
    handlers::selection::select_feature(&mut session, id, false).expect("selektierbar");
    handlers::mode::set_mode(&mut session, EditingMode::DeleteShape);

    let pending = handlers::mutation::delete_feature(&mut session, id).expect("löschbar");
    pollster::block_on(session.run(pending)).expect("Delete persistiert");

    assert!(session.selection.contains(id));
}

#[test]
fn delete_requires_active_delete_tool() {
    let (store, mut session) = new_session();
    let id = create_point(&mut session, 1.0, 1.0);
    handlers::mode::set_mode(&mut session, EditingMode::Select);

    let result = handlers::mutation::delete_feature(&mut session, id);

    assert!(matches!(
        result,
        Err(EditError::ToolInactive(ToolName::DeleteFeature))
    ));
    assert_eq!(store.calls().deletes, 0);
}

#[test]
fn delete_of_unknown_feature_is_rejected_without_store_call() {
    let (store, mut session) = new_session();
    handlers::mode::set_mode(&mut session, EditingMode::DeleteShape);

    let result = handlers::mutation::delete_feature(&mut session, 42);

    assert!(matches!(
        result,
        Err(EditError::FeatureNotFound { layer: LAYER, id: 42 })
    ));
    assert_eq!(store.calls().deletes, 0);
}

// ── Fehlerpfade ──────────────────────────────────────────────────

#[test]
fn rejected_creation_keeps_sketch_and_changes_nothing() {
    let (store, mut session) = new_session();
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);
    handlers::mutation::begin_drawing(&mut session, GeometryKind::Point).expect("startbar");
    store.fail_next_writes(1);

    let pending = handlers::mutation::place_vertex(&mut session, DVec2::new(4.0, 4.0))
        .expect("setzbar")
        .expect("Punkt schließt sofort ab");
    let result = pollster::block_on(session.run(pending));

    assert!(matches!(result, Err(EditError::Persistence(_))));
    assert_eq!(session.layer(LAYER).expect("Layer").feature_count(), 0);
    assert_eq!(mutation_events(&session), 0);
    assert_eq!(stack_sizes(&session), (0, 0));
    assert!(session.cache.is_empty());
    let create = &session.active_entry().expect("aktiver Layer").tools.create;
    assert!(create.sketch().is_some());

    // Erneut einreichen
    let pending = handlers::mutation::complete_drawing(&mut session).expect("erneut einreichbar");
    pollster::block_on(session.run(pending)).expect("Create persistiert");

    assert_eq!(session.layer(LAYER).expect("Layer").feature_count(), 1);
    let create = &session.active_entry().expect("aktiver Layer").tools.create;
    assert!(create.sketch().is_none());
}

#[test]
fn rejected_sketch_can_be_discarded() {
    let (store, mut session) = new_session();
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);
    handlers::mutation::begin_drawing(&mut session, GeometryKind::Point).expect("startbar");
    store.fail_next_writes(1);
    let pending = handlers::mutation::place_vertex(&mut session, DVec2::ZERO)
        .expect("setzbar")
        .expect("Punkt schließt sofort ab");
    let _ = pollster::block_on(session.run(pending));

    let discarded = handlers::mutation::discard_sketch(&mut session);

    assert!(discarded.is_some());
    let create = &session.active_entry().expect("aktiver Layer").tools.create;
    assert!(create.sketch().is_none());
}

#[test]
fn rejected_undo_moves_entry_back_to_done() {
    let (store, mut session) = new_session();
    let id = create_point(&mut session, 1.0, 1.0);
    store.fail_next_writes(1);

    let result = undo(&mut session);

    assert!(matches!(result, Err(EditError::Persistence(_))));
    assert_eq!(stack_sizes(&session), (1, 0));
    assert!(session.layer(LAYER).expect("Layer").contains(id));
    assert!(session.can_undo());

    undo(&mut session).expect("zweiter Versuch persistiert");
    assert!(!session.layer(LAYER).expect("Layer").contains(id));
}

#[test]
fn mutation_for_removed_layer_is_reported() {
    let (store, mut session) = new_session();
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);
    handlers::mutation::begin_drawing(&mut session, GeometryKind::Point).expect("startbar");
    let pending = handlers::mutation::place_vertex(&mut session, DVec2::ZERO)
        .expect("setzbar")
        .expect("Punkt schließt sofort ab");

    handlers::layers::layer_removed(&mut session, LAYER, false);
    let result = pollster::block_on(session.run(pending));

    assert!(matches!(result, Err(EditError::LayerNotFound(LAYER))));
    assert_eq!(store.stored_count(LAYER), 1);
    assert_eq!(mutation_events(&session), 0);
}

// ── Nebenläufigkeit ──────────────────────────────────────────────

#[test]
fn mode_change_does_not_abort_by_default() {
    let (_store, mut session) = new_session();
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);
    handlers::mutation::begin_drawing(&mut session, GeometryKind::Point).expect("startbar");
    let pending = handlers::mutation::place_vertex(&mut session, DVec2::ZERO)
        .expect("setzbar")
        .expect("Punkt schließt sofort ab");

    handlers::mode::set_mode(&mut session, EditingMode::Select);
    let result = pollster::block_on(session.run(pending));

    assert!(matches!(result, Ok(MutationEvent::Created { .. })));
    assert_eq!(session.layer(LAYER).expect("Layer").feature_count(), 1);
}

#[test]
fn mode_change_aborts_in_flight_mutations_when_configured() {
    let (store, mut session) = session_with(EditorOptions {
        abort_in_flight_on_mode_change: true,
        ..EditorOptions::default()
    });
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);
    handlers::mutation::begin_drawing(&mut session, GeometryKind::Point).expect("startbar");
    let pending = handlers::mutation::place_vertex(&mut session, DVec2::ZERO)
        .expect("setzbar")
        .expect("Punkt schließt sofort ab");
    assert_eq!(session.in_flight_count(), 1);

    handlers::mode::set_mode(&mut session, EditingMode::Select);
    let result = pollster::block_on(session.run(pending));

    assert!(matches!(result, Err(EditError::Aborted)));
    assert_eq!(session.in_flight_count(), 0);
    assert_eq!(session.layer(LAYER).expect("Layer").feature_count(), 0);
    assert_eq!(store.calls().creates, 0);
}

#[test]
fn dropped_mutations_leave_no_in_flight_entries() {
    let (store, mut session) = new_session();
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);

    for x in 0..5 {
        handlers::mutation::begin_drawing(&mut session, GeometryKind::Point).expect("startbar");
        let pending = handlers::mutation::place_vertex(&mut session, DVec2::new(f64::from(x), 0.0))
            .expect("setzbar")
            .expect("Punkt schließt sofort ab");
        assert_eq!(session.in_flight_count(), 1);
        drop(pending);
    }

    assert_eq!(session.in_flight_count(), 0);
    assert_eq!(store.calls().creates, 0);
    assert_eq!(session.layer(LAYER).expect("Layer").feature_count(), 0);
    assert_eq!(session.abort_in_flight(), 0);
}

#[test]
fn overlapping_creations_both_land_in_layer_and_history() {
    let (_store, mut session) = new_session();
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);
    let mut start = |x: f64| {
        handlers::mutation::begin_drawing(&mut session, GeometryKind::Point).expect("startbar");
        handlers::mutation::place_vertex(&mut session, DVec2::new(x, 0.0))
            .expect("setzbar")
            .expect("Punkt schließt sofort ab")
    };
    let first = start(1.0);
    let second = start(2.0);
    assert_eq!(session.in_flight_count(), 2);

    let (a, b) = pollster::block_on(join(first, second));
    let a = handlers::mutation::finish(&mut session, a).expect("erste Anlage");
    let b = handlers::mutation::finish(&mut session, b).expect("zweite Anlage");

    assert_ne!(a.feature_id(), b.feature_id());
    assert_eq!(session.layer(LAYER).expect("Layer").feature_count(), 2);
    assert_eq!(stack_sizes(&session), (2, 0));
    assert_eq!(session.in_flight_count(), 0);
    let create = &session.active_entry().expect("aktiver Layer").tools.create;
    assert!(create.sketch().is_none());
}
