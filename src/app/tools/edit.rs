//! Edit-Tool: verändert Geometrie und Attribute eines bestehenden Features.

use super::tool::{ensure_usable, MutatingTool, Tool, ToolName};
use crate::app::events::{MutationFlags, MutationKind};
use crate::app::pending::MutationRequest;
use crate::app::EditError;
use crate::core::{Feature, Geometry, LayerId};

/// Laufende Bearbeitung: Ausgangsversion und Arbeitskopie.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    /// Version zu Beginn der Bearbeitung
    pub original: Feature,
    /// Arbeitskopie mit den bisherigen Änderungen
    pub working: Feature,
}

/// Bearbeitet persistierte Features.
#[derive(Debug, Default)]
pub struct EditFeatureTool {
    active: bool,
    edit: Option<EditSession>,
}

impl EditFeatureTool {
    /// Erstellt ein inaktives Edit-Tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Läuft gerade eine nicht gespeicherte Bearbeitung?
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Aktuelle Bearbeitung.
    pub fn current(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Beginnt die Bearbeitung eines persistierten Features.
    pub fn begin_edit(&mut self, feature: Feature) -> Result<(), EditError> {
        if !self.active {
            return Err(EditError::ToolInactive(ToolName::EditFeature));
        }
        if !feature.is_persisted() {
            return Err(EditError::Validation(
                "Nur persistierte Features können bearbeitet werden".into(),
            ));
        }
        if let Some(previous) = self.edit.take() {
            log::debug!(
                "Ungespeicherte Bearbeitung von Feature {:?} verworfen",
                previous.original.id
            );
        }
        self.edit = Some(EditSession {
            original: feature.clone(),
            working: feature,
        });
        Ok(())
    }

    /// Ersetzt die Geometrie der Arbeitskopie.
    pub fn update_geometry(&mut self, geometry: Geometry) -> Result<(), EditError> {
        let edit = self.editing_mut()?;
        edit.working.geometry = geometry;
        Ok(())
    }

    /// Setzt ein Attribut der Arbeitskopie.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), EditError> {
        let edit = self.editing_mut()?;
        edit.working.attributes.insert(name.into(), value);
        Ok(())
    }

    /// Schließt die Bearbeitung ab und liefert (neu, alt).
    ///
    /// `None` wenn nichts bearbeitet wird.
    pub fn save_edit(&mut self) -> Option<(Feature, Feature)> {
        let edit = self.edit.take()?;
        Some((edit.working, edit.original))
    }

    /// Verwirft die Bearbeitung.
    pub fn cancel_edit(&mut self) -> Option<EditSession> {
        self.edit.take()
    }

    /// Stellt eine vom Store abgelehnte Bearbeitung wieder her, sofern das
    /// Tool noch aktiv ist und inzwischen keine neue begonnen wurde.
    pub fn restore(&mut self, working: Feature, original: Feature) -> bool {
        if !self.active || self.edit.is_some() {
            return false;
        }
        self.edit = Some(EditSession { original, working });
        true
    }

    fn editing_mut(&mut self) -> Result<&mut EditSession, EditError> {
        if !self.active {
            return Err(EditError::ToolInactive(ToolName::EditFeature));
        }
        self.edit
            .as_mut()
            .ok_or_else(|| EditError::Validation("Keine Bearbeitung aktiv".into()))
    }
}

impl Tool for EditFeatureTool {
    fn name(&self) -> ToolName {
        ToolName::EditFeature
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        if self.edit.take().is_some() {
            log::debug!("Ungespeicherte Bearbeitung beim Deaktivieren verworfen");
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl MutatingTool for EditFeatureTool {
    fn kind(&self) -> MutationKind {
        MutationKind::Edit
    }

    fn has_pending_input(&self) -> bool {
        self.is_editing()
    }

    fn prepare(
        &self,
        layer: LayerId,
        feature: Feature,
        previous: Option<Feature>,
        flags: MutationFlags,
    ) -> Result<MutationRequest, EditError> {
        ensure_usable(self, flags)?;
        let previous =
            previous.ok_or_else(|| EditError::Validation("Edit ohne Vorversion".into()))?;
        if feature.id.is_none() || feature.id != previous.id {
            return Err(EditError::Validation(
                "Neue und alte Version müssen dieselbe Feature-ID tragen".into(),
            ));
        }
        Ok(MutationRequest {
            layer,
            kind: MutationKind::Edit,
            feature,
            previous: Some(previous),
            flags,
            replaced_id: None,
            history_entry: None,
        })
    }
}
