//! Integrationstests für den Feature-Cache und die Attribut-Anzeige.

use glam::DVec2;
use map_edit_core::app::handlers;
use map_edit_core::app::CacheError;
use map_edit_core::{
    EditError, EditingMode, EditingSession, EditorOptions, Feature, Geometry, InMemoryFeatureStore,
    Layer,
};
use serde_json::json;
use std::rc::Rc;
use std::sync::Arc;

const LAYER: u64 = 3;

/// Session mit einem Layer, dessen Feature nur teilweise geladen ist
/// (Store kennt alle Attribute, der Layer nur die Geometrie).
fn session_with_partial_feature() -> (Rc<InMemoryFeatureStore>, EditingSession, u64) {
    let store = Rc::new(InMemoryFeatureStore::new());
    let complete = store.seed(
        LAYER,
        Feature::new(Geometry::Point(DVec2::new(10.0, 20.0)))
            .with_attribute("name", json!("Schieber 12"))
            .with_attribute("baujahr", json!(1987)),
    );
    let id = complete.id.expect("Store vergibt ID");

    let mut layer = Layer::new(LAYER, "Armaturen");
    layer.add_feature(Feature::new(complete.geometry.clone()).with_id(id));

    let mut session = EditingSession::new(store.clone(), store.clone(), EditorOptions::default());
    handlers::layers::layer_added(&mut session, layer);
    (store, session, id)
}

#[test]
fn empty_url_is_rejected_without_request() {
    let (store, session, _) = session_with_partial_feature();

    let result = pollster::block_on(session.cache.get_feature_from_url(""));

    assert!(matches!(result, Err(CacheError::EmptyUrl)));
    assert_eq!(store.calls().url_fetches, 0);
}

#[test]
fn collection_from_url_is_parsed() {
    let (store, session, _) = session_with_partial_feature();
    store.publish_collection(
        "https://example.invalid/layer/3",
        r#"{
            "type": "FeatureCollection",
            "features": [
                {"id": 5, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}, "properties": {"name": "A"}},
                {"id": 6, "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}}
            ]
        }"#,
    );

    let features = pollster::block_on(
        session
            .cache
            .get_feature_from_url("https://example.invalid/layer/3"),
    )
    .expect("Collection lesbar");

    assert_eq!(features.len(), 2);
    assert_eq!(features[0].id, Some(5));
    assert_eq!(features[0].attributes.get("name"), Some(&json!("A")));
    assert!(features[1].attributes.is_empty());
    assert_eq!(store.calls().url_fetches, 1);
}

#[test]
fn second_read_returns_same_instance_without_fetch() {
    let (store, mut session, id) = session_with_partial_feature();

    let first = pollster::block_on(session.display_attributes(id)).expect("auflösbar");
    let second = pollster::block_on(session.display_attributes(id)).expect("auflösbar");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.calls().feature_fetches, 1);
    assert_eq!(first.attributes.get("baujahr"), Some(&json!(1987)));
    let shown = session
        .active_entry()
        .and_then(|e| e.tools.display_attribute.shown())
        .expect("Attribute angezeigt");
    assert!(Arc::ptr_eq(shown, &first));
}

#[test]
fn display_attributes_requires_select_mode() {
    let (store, mut session, id) = session_with_partial_feature();
    handlers::mode::set_mode(&mut session, EditingMode::AddShape);

    let result = pollster::block_on(session.display_attributes(id));

    assert!(matches!(result, Err(EditError::ToolInactive(_))));
    assert_eq!(store.calls().feature_fetches, 0);
}

#[test]
fn concurrent_misses_are_not_merged() {
    let (store, session, id) = session_with_partial_feature();
    let partial = session
        .layer(LAYER)
        .and_then(|l| l.feature(id))
        .cloned()
        .expect("Feature im Layer");

    let cache = Rc::clone(&session.cache);
    let (a, b) = pollster::block_on(futures_util::future::join(
        cache.get_complete_feature(LAYER, &partial),
        cache.get_complete_feature(LAYER, &partial),
    ));

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(store.calls().feature_fetches, 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn removing_layer_evicts_its_cache_entries() {
    let (_store, mut session, id) = session_with_partial_feature();
    pollster::block_on(session.display_attributes(id)).expect("auflösbar");
    assert!(session.cache.cached(LAYER, id).is_some());

    handlers::layers::layer_removed(&mut session, LAYER, true);

    assert!(session.cache.is_empty());
}
