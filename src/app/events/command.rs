use crate::core::{FeatureId, Geometry, GeometryKind, LayerId};
use crate::shared::EditingMode;
use glam::DVec2;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Editier-Modus setzen
    SetMode { mode: EditingMode },
    /// Zwischen Select und Editier-Modus umschalten
    ToggleEditable,
    /// Standortverfolgung setzen
    SetLocationTracking { enabled: bool },
    /// Offene Zeichnung/Bearbeitung abschicken, Fehler nur loggen
    FlushOpenInput,

    /// Layer registrieren und aktivieren
    AddLayer { id: LayerId, name: String },
    /// Layer entfernen
    RemoveLayer { id: LayerId, closing: bool },
    /// Session schließen
    CloseSession,
    /// Aktiven Layer wechseln
    SetActiveLayer { id: LayerId },

    /// Zeichnung beginnen
    BeginDrawing { kind: GeometryKind },
    /// Punkt setzen
    PlaceVertex { position: DVec2 },
    /// Attribut der Skizze setzen
    SetSketchAttribute {
        name: String,
        value: serde_json::Value,
    },
    /// Zeichnung abschließen und einreichen
    CompleteDrawing,
    /// Laufende Mehrpunkt-Zeichnung zwangsweise abschließen
    SaveCreation,
    /// Skizze verwerfen
    DiscardSketch,

    /// Feature selektieren
    SelectFeature { id: FeatureId, additive: bool },
    /// Selektion aufheben
    ClearSelection,

    /// Bearbeitung beginnen
    BeginEdit { id: FeatureId },
    /// Geometrie der Bearbeitung ersetzen
    UpdateEditGeometry { geometry: Geometry },
    /// Attribut der Bearbeitung setzen
    SetEditAttribute {
        name: String,
        value: serde_json::Value,
    },
    /// Bearbeitung abschicken
    SaveEdit,
    /// Bearbeitung verwerfen
    CancelEdit,

    /// Feature löschen
    DeleteFeature { id: FeatureId },

    /// Undo ausführen
    Undo,
    /// Redo ausführen
    Redo,

    /// Standort-Fix aufnehmen
    RecordLocationFix { position: DVec2 },
}
