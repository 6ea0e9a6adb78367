//! DisplayAttribute-Tool: zeigt die vollständigen Attribute eines Features.

use super::tool::{Tool, ToolName};
use crate::core::Feature;
use std::sync::Arc;

/// Hält das zuletzt über den Feature-Cache aufgelöste Feature.
#[derive(Debug, Default)]
pub struct DisplayAttributeTool {
    active: bool,
    shown: Option<Arc<Feature>>,
}

impl DisplayAttributeTool {
    /// Erstellt ein inaktives Tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeigt ein aufgelöstes Feature an. Ignoriert, wenn inaktiv.
    pub fn show(&mut self, feature: Arc<Feature>) -> bool {
        if !self.active {
            return false;
        }
        self.shown = Some(feature);
        true
    }

    /// Angezeigtes Feature.
    pub fn shown(&self) -> Option<&Arc<Feature>> {
        self.shown.as_ref()
    }

    /// Blendet die Anzeige aus.
    pub fn clear(&mut self) {
        self.shown = None;
    }
}

impl Tool for DisplayAttributeTool {
    fn name(&self) -> ToolName {
        ToolName::DisplayAttribute
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.shown = None;
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
