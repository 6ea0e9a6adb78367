use crate::core::{FeatureId, Geometry, GeometryKind, LayerId};
use crate::shared::EditingMode;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum AppIntent {
    /// Modus in der Toolbar gewählt
    ModeSelected { mode: EditingMode },
    /// Bearbeiten-Schalter umgelegt (Select ⇔ letzter Editier-Modus)
    EditableToggled,
    /// Standortverfolgung ein-/ausgeschaltet
    LocationTrackingToggled { enabled: bool },

    /// Layer wurde der Karte hinzugefügt
    LayerAdded { id: LayerId, name: String },
    /// Layer wurde entfernt (`closing` = während die Session endet)
    LayerRemoved {
        id: LayerId,
        #[serde(default)]
        closing: bool,
    },
    /// Session wird geschlossen
    SessionClosed,
    /// Layer in der Layerliste gewählt
    ActiveLayerSelected { id: LayerId },

    /// Zeichnung beginnen
    DrawingStarted { kind: GeometryKind },
    /// Punkt in der Karte gesetzt
    VertexPlaced { position: DVec2 },
    /// Attribut der entstehenden Zeichnung gesetzt
    SketchAttributeChanged {
        name: String,
        value: serde_json::Value,
    },
    /// Zeichnung abgeschlossen (Doppelklick / Enter)
    DrawingCompleted,
    /// Zurückgehaltene Skizze verwerfen
    DrawingDiscarded,

    /// Feature in der Karte angeklickt
    FeatureClicked {
        feature_id: FeatureId,
        #[serde(default)]
        additive: bool,
    },
    /// Geometrie der laufenden Bearbeitung verändert
    EditGeometryChanged { geometry: Geometry },
    /// Attribut der laufenden Bearbeitung verändert
    EditAttributeChanged {
        name: String,
        value: serde_json::Value,
    },
    /// Bearbeitung bestätigt
    EditConfirmed,
    /// Bearbeitung abgebrochen
    EditCancelled,

    /// Undo (Ctrl+Z)
    UndoRequested,
    /// Redo (Ctrl+Y)
    RedoRequested,

    /// Neuer Standort-Fix vom Gerät
    LocationFix { position: DVec2 },
    /// Selektion aufheben (Escape)
    SelectionCleared,
}
