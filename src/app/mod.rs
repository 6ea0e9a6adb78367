//! Application-Layer: Controller, Session, Events, Tools und History.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod feature_cache;
pub mod handlers;
pub mod history;
mod intent_mapping;
pub mod mode;
pub mod pending;
pub mod registry;
pub mod services;
/// Session-Zustand und Fehler
///
/// Dieses Modul verwaltet den Zustand einer Editier-Session (Layer, Modus, Selektion).
pub mod state;
pub mod tools;

pub use command_log::{CommandLog, EventLog, RecordLog};
pub use controller::AppController;
pub use events::{AppCommand, AppIntent, MutationEvent, MutationFlags, MutationKind, SessionEvent};
pub use feature_cache::{CacheError, FeatureCache};
pub use history::{CommandEntry, CommandHistory, ReplayDirection};
pub use mode::{activation_bundle, ModeController};
pub use pending::{MutationOutcome, MutationRequest, PendingMutation, Persisted};
pub use registry::{ActiveLayerRegistry, LayerChange, RegisteredLayer};
pub use services::{FeatureFetcher, FeatureService, InMemoryFeatureStore, ServiceError};
pub use state::{EditError, EditingSession, SelectionState};
pub use tools::{MutatingTool, Tool, ToolName, ToolSet};
