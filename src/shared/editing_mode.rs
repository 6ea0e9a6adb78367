use serde::{Deserialize, Serialize};

/// Editier-Modus einer Karten-Session (genau einer ist aktiv).
///
/// Serialisiert in camelCase (`"addShape"`, …), so wie die UI-Chrome
/// die Modi benennt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditingMode {
    /// Standard: Features selektieren und Attribute anzeigen
    #[default]
    Select,
    /// Neue Geometrien zeichnen
    AddShape,
    /// Bestehende Geometrien bearbeiten
    EditShape,
    /// Features löschen
    DeleteShape,
    /// Standortverfolgung
    TrackLocation,
}

impl EditingMode {
    /// Alle Modi in Toolbar-Reihenfolge.
    pub const ALL: [EditingMode; 5] = [
        EditingMode::Select,
        EditingMode::AddShape,
        EditingMode::EditShape,
        EditingMode::DeleteShape,
        EditingMode::TrackLocation,
    ];

    /// `true` für jeden Modus außer `Select`.
    pub fn is_editing(self) -> bool {
        self != EditingMode::Select
    }
}
