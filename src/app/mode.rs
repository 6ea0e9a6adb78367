//! Modus-Zustandsmaschine: welches Aktivierungsbündel im aktiven Layer gilt.

use super::registry::ActiveLayerRegistry;
use super::tools::ToolName;
use super::SelectionState;
use crate::core::LayerId;
use crate::shared::EditingMode;

/// Tools, die ein Modus einschaltet. Alle anderen sind aus.
pub fn activation_bundle(mode: EditingMode) -> &'static [ToolName] {
    match mode {
        EditingMode::Select => &[ToolName::SelectFeature, ToolName::DisplayAttribute],
        EditingMode::AddShape => &[ToolName::CreateFeature, ToolName::RedoUndo],
        EditingMode::EditShape => &[ToolName::EditFeature, ToolName::RedoUndo],
        EditingMode::DeleteShape => &[ToolName::DeleteFeature, ToolName::RedoUndo],
        EditingMode::TrackLocation => &[ToolName::TrackLocation],
    }
}

/// Modus-Controller einer Session.
///
/// Übergänge schlagen nie fehl. Derselbe Modus erneut gesetzt wendet das
/// Bündel noch einmal an (idempotent), meldet aber keinen Wechsel.
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: EditingMode,
    last_editing_mode: Option<EditingMode>,
    surf_layer: Option<LayerId>,
    location_tracking: bool,
    resume_mode: EditingMode,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(EditingMode::AddShape)
    }
}

impl ModeController {
    /// Startet in Select. `resume_mode` gilt für `toggle_editable`, solange
    /// noch kein Editier-Modus gemerkt wurde.
    pub fn new(resume_mode: EditingMode) -> Self {
        Self {
            mode: EditingMode::Select,
            last_editing_mode: None,
            surf_layer: None,
            location_tracking: false,
            resume_mode,
        }
    }

    /// Aktueller Modus.
    pub fn mode(&self) -> EditingMode {
        self.mode
    }

    /// Modus ≠ Select?
    pub fn is_editing(&self) -> bool {
        self.mode.is_editing()
    }

    /// Zuletzt gemerkter Editier-Modus.
    pub fn last_editing_mode(&self) -> Option<EditingMode> {
        self.last_editing_mode
    }

    /// Layer, auf dem der Controller gerade arbeitet.
    pub fn surf_layer(&self) -> Option<LayerId> {
        self.surf_layer
    }

    /// Ist die Standortverfolgung eingeschaltet?
    pub fn is_location_tracking(&self) -> bool {
        self.location_tracking
    }

    /// Merkt sich, ob die Standortverfolgung eingeschaltet ist.
    pub fn set_location_tracking(&mut self, enabled: bool) {
        self.location_tracking = enabled;
    }

    /// Schaltet alle Tools des aktiven Layers aus, setzt den Modus und
    /// schaltet genau dessen Bündel ein. Gibt `true` zurück, wenn sich der
    /// Modus geändert hat.
    pub fn set_mode(&mut self, mode: EditingMode, registry: &mut ActiveLayerRegistry) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        self.apply_bundle(registry);
        changed
    }

    /// Wendet das Bündel des aktuellen Modus auf den aktiven Layer an.
    pub fn apply_bundle(&self, registry: &mut ActiveLayerRegistry) {
        let Some(entry) = registry.active_entry_mut() else {
            return;
        };
        entry.tools.deactivate_all();
        for &name in activation_bundle(self.mode) {
            entry.tools.tool_mut(name).activate();
        }
    }

    /// Neuer aktiver Layer. Bei einem Wechsel wird die Selektion geleert und
    /// der Modus auf Select zurückgesetzt. Gibt den vorherigen Modus zurück,
    /// falls er sich dadurch geändert hat.
    pub fn set_surf_layer(
        &mut self,
        layer: Option<LayerId>,
        registry: &mut ActiveLayerRegistry,
        selection: &mut SelectionState,
    ) -> Option<EditingMode> {
        if self.surf_layer == layer {
            return None;
        }
        self.surf_layer = layer;
        selection.clear();
        let previous = self.mode;
        self.set_mode(EditingMode::Select, registry)
            .then_some(previous)
    }

    /// Merkt den aktuellen Modus für die Rückkehr aus Select.
    pub fn remember_editing_mode(&mut self) {
        if self.mode.is_editing() {
            self.last_editing_mode = Some(self.mode);
        }
    }

    /// Modus, den `toggle_editable` aus Select heraus wiederherstellt.
    pub fn resume_target(&self) -> EditingMode {
        if self.location_tracking {
            EditingMode::TrackLocation
        } else {
            self.last_editing_mode.unwrap_or(self.resume_mode)
        }
    }
}
