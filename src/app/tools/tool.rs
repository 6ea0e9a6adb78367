//! Tool-Traits: Schnittstelle für alle Werkzeuge eines Layers.

use crate::app::events::{MutationFlags, MutationKind};
use crate::app::pending::MutationRequest;
use crate::app::EditError;
use crate::core::{Feature, LayerId};
use serde::{Deserialize, Serialize};

/// Benannte Werkzeuge, die jeder Layer besitzt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolName {
    /// Features anklicken und selektieren
    SelectFeature,
    /// Attribute des selektierten Features anzeigen
    DisplayAttribute,
    /// Neue Features zeichnen
    CreateFeature,
    /// Bestehende Features bearbeiten
    EditFeature,
    /// Features löschen
    DeleteFeature,
    /// Undo/Redo-Steuerung (CommandHistory)
    RedoUndo,
    /// Standortverfolgung
    TrackLocation,
}

/// Gemeinsame Schnittstelle aller Werkzeuge.
///
/// `activate`/`deactivate` sind idempotent; `deactivate` ist auch auf einem
/// nie aktivierten Tool erlaubt.
pub trait Tool {
    /// Name des Werkzeugs
    fn name(&self) -> ToolName;

    /// Interaktion einschalten.
    fn activate(&mut self);

    /// Interaktion ausschalten und angefangene Eingaben verwerfen.
    fn deactivate(&mut self);

    /// Ist das Werkzeug gerade eingeschaltet?
    fn is_active(&self) -> bool;

    /// Werkzeug endgültig freigeben.
    fn dispose(&mut self) {
        self.deactivate();
    }
}

/// Werkzeuge, die Features über den Feature-Store verändern.
pub trait MutatingTool: Tool {
    /// Welche Mutation das Werkzeug ausführt.
    fn kind(&self) -> MutationKind;

    /// Hat das Werkzeug angefangene, noch nicht abgeschickte Eingaben?
    fn has_pending_input(&self) -> bool {
        false
    }

    /// Baut die Anfrage für den Feature-Store.
    ///
    /// Nutzeraktionen (`flags` leer) verlangen ein aktives Werkzeug,
    /// History-Replays nicht.
    fn prepare(
        &self,
        layer: LayerId,
        feature: Feature,
        previous: Option<Feature>,
        flags: MutationFlags,
    ) -> Result<MutationRequest, EditError>;
}

/// Prüft die Aktivierung für Nutzeraktionen.
pub(crate) fn ensure_usable(tool: &dyn Tool, flags: MutationFlags) -> Result<(), EditError> {
    if flags.is_replay() || tool.is_active() {
        Ok(())
    } else {
        Err(EditError::ToolInactive(tool.name()))
    }
}
