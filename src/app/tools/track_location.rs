//! TrackLocation-Tool: zeichnet Standort-Fixes auf.

use super::tool::{Tool, ToolName};
use crate::app::EditError;
use glam::DVec2;

/// Sammelt Standort-Fixes, solange das Tool aktiv ist.
#[derive(Debug, Default)]
pub struct TrackLocationTool {
    active: bool,
    fixes: Vec<DVec2>,
}

impl TrackLocationTool {
    /// Erstellt ein inaktives Tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nimmt einen Fix auf.
    pub fn record_fix(&mut self, position: DVec2) -> Result<(), EditError> {
        if !self.active {
            return Err(EditError::ToolInactive(ToolName::TrackLocation));
        }
        self.fixes.push(position);
        Ok(())
    }

    /// Letzter Fix.
    pub fn last_fix(&self) -> Option<DVec2> {
        self.fixes.last().copied()
    }

    /// Alle bisherigen Fixes.
    pub fn fixes(&self) -> &[DVec2] {
        &self.fixes
    }
}

impl Tool for TrackLocationTool {
    fn name(&self) -> ToolName {
        ToolName::TrackLocation
    }

    fn activate(&mut self) {
        self.active = true;
    }

    // Der aufgezeichnete Track bleibt erhalten.
    fn deactivate(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn dispose(&mut self) {
        self.active = false;
        self.fixes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixes_only_while_active() {
        let mut tool = TrackLocationTool::new();
        assert!(tool.record_fix(DVec2::ZERO).is_err());

        tool.activate();
        tool.record_fix(DVec2::new(1.0, 2.0)).expect("aktiv");
        tool.deactivate();

        assert_eq!(tool.last_fix(), Some(DVec2::new(1.0, 2.0)));
        assert!(tool.record_fix(DVec2::ONE).is_err());
    }
}
