//! Select-Tool: Features per Klick selektieren.

use super::tool::{Tool, ToolName};
use crate::app::{EditError, SelectionState};
use crate::core::{FeatureId, Layer};

/// Selektiert Features des aktiven Layers.
///
/// Die Selektion selbst liegt in der Session (`SelectionState`), damit sie
/// bei einem Layerwechsel zentral geleert werden kann.
#[derive(Debug, Default)]
pub struct SelectFeatureTool {
    active: bool,
}

impl SelectFeatureTool {
    /// Erstellt ein inaktives Select-Tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Klick auf ein Feature: ersetzt die Selektion oder schaltet es additiv um.
    pub fn pick(
        &self,
        layer: &Layer,
        selection: &mut SelectionState,
        id: FeatureId,
        additive: bool,
    ) -> Result<(), EditError> {
        if !self.active {
            return Err(EditError::ToolInactive(ToolName::SelectFeature));
        }
        if !layer.contains(id) {
            return Err(EditError::FeatureNotFound {
                layer: layer.id,
                id,
            });
        }

        if additive {
            if !selection.remove(id) {
                selection.insert(id);
            }
        } else {
            selection.clear();
            selection.insert(id);
        }
        Ok(())
    }
}

impl Tool for SelectFeatureTool {
    fn name(&self) -> ToolName {
        ToolName::SelectFeature
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
