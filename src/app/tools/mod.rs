//! Trait-basiertes Tool-System der Layer.
//!
//! Jeder Layer besitzt ein eigenes `ToolSet`. Welche Tools eingeschaltet
//! sind, bestimmt ausschließlich der `ModeController` über das
//! Aktivierungsbündel des aktuellen Modus.

/// Create-Tool mit Skizze und erneutem Einreichen nach Fehlern.
pub mod create;
/// Delete-Tool.
pub mod delete;
/// Attribut-Anzeige über den Feature-Cache.
pub mod display_attribute;
/// Edit-Tool mit Arbeitskopie.
pub mod edit;
/// Select-Tool.
pub mod select;
/// Tool-Traits: Schnittstelle für alle Werkzeuge.
mod tool;
/// Standortverfolgung.
pub mod track_location;

pub use create::{CreateFeatureTool, Sketch};
pub use delete::DeleteFeatureTool;
pub use display_attribute::DisplayAttributeTool;
pub use edit::{EditFeatureTool, EditSession};
pub use select::SelectFeatureTool;
pub use tool::{MutatingTool, Tool, ToolName};
pub use track_location::TrackLocationTool;

use super::events::MutationKind;
use super::history::CommandHistory;

// ── ToolSet ──────────────────────────────────────────────────────

/// Alle Werkzeuge eines Layers.
#[derive(Debug, Default)]
pub struct ToolSet {
    /// Features selektieren
    pub select: SelectFeatureTool,
    /// Attribute anzeigen
    pub display_attribute: DisplayAttributeTool,
    /// Features anlegen
    pub create: CreateFeatureTool,
    /// Features bearbeiten
    pub edit: EditFeatureTool,
    /// Features löschen
    pub delete: DeleteFeatureTool,
    /// Undo/Redo des Layers
    pub history: CommandHistory,
    /// Standortverfolgung
    pub track_location: TrackLocationTool,
}

impl ToolSet {
    /// Reihenfolge, in der Tools aufgezählt werden.
    pub const NAMES: [ToolName; 7] = [
        ToolName::SelectFeature,
        ToolName::DisplayAttribute,
        ToolName::CreateFeature,
        ToolName::EditFeature,
        ToolName::DeleteFeature,
        ToolName::RedoUndo,
        ToolName::TrackLocation,
    ];

    /// Erstellt ein ToolSet mit gegebener History-Tiefe; alle Tools inaktiv.
    pub fn new(history_max_depth: usize) -> Self {
        Self {
            history: CommandHistory::new_with_capacity(history_max_depth),
            ..Self::default()
        }
    }

    /// Tool per Name.
    pub fn tool(&self, name: ToolName) -> &dyn Tool {
        match name {
            ToolName::SelectFeature => &self.select,
            ToolName::DisplayAttribute => &self.display_attribute,
            ToolName::CreateFeature => &self.create,
            ToolName::EditFeature => &self.edit,
            ToolName::DeleteFeature => &self.delete,
            ToolName::RedoUndo => &self.history,
            ToolName::TrackLocation => &self.track_location,
        }
    }

    /// Tool per Name (mutable).
    pub fn tool_mut(&mut self, name: ToolName) -> &mut dyn Tool {
        match name {
            ToolName::SelectFeature => &mut self.select,
            ToolName::DisplayAttribute => &mut self.display_attribute,
            ToolName::CreateFeature => &mut self.create,
            ToolName::EditFeature => &mut self.edit,
            ToolName::DeleteFeature => &mut self.delete,
            ToolName::RedoUndo => &mut self.history,
            ToolName::TrackLocation => &mut self.track_location,
        }
    }

    /// Mutations-Tool für eine Mutationsart.
    pub fn mutating_tool(&self, kind: MutationKind) -> &dyn MutatingTool {
        match kind {
            MutationKind::Create => &self.create,
            MutationKind::Edit => &self.edit,
            MutationKind::Delete => &self.delete,
        }
    }

    /// Schaltet alle Tools aus.
    pub fn deactivate_all(&mut self) {
        for name in Self::NAMES {
            self.tool_mut(name).deactivate();
        }
    }

    /// Namen aller eingeschalteten Tools.
    pub fn active_tools(&self) -> Vec<ToolName> {
        Self::NAMES
            .into_iter()
            .filter(|&name| self.tool(name).is_active())
            .collect()
    }

    /// Hat eines der Mutations-Tools angefangene Eingaben?
    pub fn has_pending_input(&self) -> bool {
        [MutationKind::Create, MutationKind::Edit, MutationKind::Delete]
            .into_iter()
            .any(|kind| self.mutating_tool(kind).has_pending_input())
    }

    /// Undo erlaubt?
    pub fn can_undo(&self) -> bool {
        self.history.can_undo(&self.edit)
    }

    /// Redo erlaubt?
    pub fn can_redo(&self) -> bool {
        self.history.can_redo(&self.edit)
    }

    /// Gibt die History frei; mit `cascade_to_tools` auch Create/Edit/Delete.
    pub fn dispose_history(&mut self, cascade_to_tools: bool) {
        self.history.dispose();
        if cascade_to_tools {
            self.create.dispose();
            self.edit.dispose();
            self.delete.dispose();
        }
    }

    /// Gibt alle Tools frei.
    pub fn dispose_all(&mut self) {
        for name in Self::NAMES {
            self.tool_mut(name).dispose();
        }
    }
}
