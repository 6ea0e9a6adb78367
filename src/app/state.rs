//! Session-Zustand: zentrale Datenhaltung einer Editier-Session.

mod selection;
mod session;

pub use selection::SelectionState;
pub use session::EditingSession;

use super::feature_cache::CacheError;
use super::services::ServiceError;
use super::tools::ToolName;
use crate::core::{FeatureId, LayerId};

/// Fehler einer Editier-Operation.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Eingabe ungültig; es wurde kein Kollaborator aufgerufen
    #[error("Ungültige Eingabe: {0}")]
    Validation(String),
    /// Feature-Store hat abgelehnt; nichts wurde verändert
    #[error("Persistenz fehlgeschlagen: {0}")]
    Persistence(#[from] ServiceError),
    /// Laufende Mutation wurde abgebrochen
    #[error("Mutation abgebrochen")]
    Aborted,
    /// Kein aktiver Layer vorhanden
    #[error("Kein aktiver Layer")]
    NoActiveLayer,
    /// Layer existiert (nicht mehr)
    #[error("Layer {0} nicht gefunden")]
    LayerNotFound(LayerId),
    /// Feature ist im Layer nicht vorhanden
    #[error("Feature {id} in Layer {layer} nicht gefunden")]
    FeatureNotFound {
        /// Layer der Anfrage
        layer: LayerId,
        /// Gesuchtes Feature
        id: FeatureId,
    },
    /// Werkzeug ist im aktuellen Modus nicht eingeschaltet
    #[error("Werkzeug {0:?} ist nicht aktiv")]
    ToolInactive(ToolName),
    /// Feature-Cache konnte nicht auflösen
    #[error(transparent)]
    Cache(#[from] CacheError),
}
