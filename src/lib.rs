//! Map-Edit-Core Library.
//! Interaktionskern für Karten-Editoren: Editier-Modi, aktiver Layer,
//! Create/Edit/Delete-Tools, Undo/Redo und Feature-Cache.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    AppCommand, AppController, AppIntent, EditError, EditingSession, FeatureCache,
    InMemoryFeatureStore, MutationEvent, PendingMutation, SessionEvent, ToolName,
};
pub use core::{Feature, FeatureId, Geometry, GeometryKind, Layer, LayerId};
pub use shared::{EditingMode, EditorOptions};
