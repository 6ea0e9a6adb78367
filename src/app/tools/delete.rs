//! Delete-Tool: löscht persistierte Features.

use super::tool::{ensure_usable, MutatingTool, Tool, ToolName};
use crate::app::events::{MutationFlags, MutationKind};
use crate::app::pending::MutationRequest;
use crate::app::EditError;
use crate::core::{Feature, LayerId};

/// Löscht Features per ID.
#[derive(Debug, Default)]
pub struct DeleteFeatureTool {
    active: bool,
}

impl DeleteFeatureTool {
    /// Erstellt ein inaktives Delete-Tool.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for DeleteFeatureTool {
    fn name(&self) -> ToolName {
        ToolName::DeleteFeature
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

impl MutatingTool for DeleteFeatureTool {
    fn kind(&self) -> MutationKind {
        MutationKind::Delete
    }

    fn prepare(
        &self,
        layer: LayerId,
        feature: Feature,
        _previous: Option<Feature>,
        flags: MutationFlags,
    ) -> Result<MutationRequest, EditError> {
        ensure_usable(self, flags)?;
        if !feature.is_persisted() {
            return Err(EditError::Validation(
                "Nur persistierte Features können gelöscht werden".into(),
            ));
        }
        Ok(MutationRequest {
            layer,
            kind: MutationKind::Delete,
            feature,
            previous: None,
            flags,
            replaced_id: None,
            history_entry: None,
        })
    }
}
