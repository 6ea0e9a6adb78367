//! Create-Tool: zeichnet eine Skizze und reicht sie als neues Feature ein.

use super::tool::{ensure_usable, MutatingTool, Tool, ToolName};
use crate::app::events::{MutationFlags, MutationKind};
use crate::app::pending::MutationRequest;
use crate::app::EditError;
use crate::core::{Attributes, Feature, Geometry, GeometryKind, LayerId};
use glam::DVec2;

/// Noch nicht persistierte Zeichnung.
#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    /// Geometrieart der Zeichnung
    pub kind: GeometryKind,
    /// Bisher gesetzte Punkte
    pub vertices: Vec<DVec2>,
    /// Attribute für das neue Feature
    pub attributes: Attributes,
}

impl Sketch {
    fn geometry(&self) -> Option<Geometry> {
        Geometry::from_vertices(self.kind, &self.vertices)
    }
}

/// Zeichnet neue Features.
///
/// Ablauf: `begin_drawing` → `add_vertex`… → `complete_drawing` liefert das
/// ID-lose Feature. Die Skizze bleibt erhalten, bis der Store die Anlage
/// bestätigt (`on_created`), damit sie nach einem Fehler erneut eingereicht
/// oder mit `discard_sketch` verworfen werden kann.
#[derive(Debug, Default)]
pub struct CreateFeatureTool {
    active: bool,
    is_creating: bool,
    sketch: Option<Sketch>,
}

impl CreateFeatureTool {
    /// Erstellt ein inaktives Create-Tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeichnet gerade?
    pub fn is_creating(&self) -> bool {
        self.is_creating
    }

    /// Aktuelle oder nach einem Fehler zurückgehaltene Skizze.
    pub fn sketch(&self) -> Option<&Sketch> {
        self.sketch.as_ref()
    }

    /// Beginnt eine neue Zeichnung. Eine zurückgehaltene Skizze wird ersetzt.
    pub fn begin_drawing(&mut self, kind: GeometryKind) -> Result<(), EditError> {
        if !self.active {
            return Err(EditError::ToolInactive(ToolName::CreateFeature));
        }
        if let Some(old) = self.sketch.take() {
            log::debug!("Zurückgehaltene Skizze ({:?}) ersetzt", old.kind);
        }
        self.sketch = Some(Sketch {
            kind,
            vertices: Vec::new(),
            attributes: Attributes::new(),
        });
        self.is_creating = true;
        Ok(())
    }

    /// Setzt einen Punkt. Gibt `true` zurück, wenn die Zeichnung damit
    /// fertig ist (einzelner Punkt schließt sich selbst ab).
    pub fn add_vertex(&mut self, position: DVec2) -> Result<bool, EditError> {
        if !self.active {
            return Err(EditError::ToolInactive(ToolName::CreateFeature));
        }
        let sketch = match (self.is_creating, self.sketch.as_mut()) {
            (true, Some(sketch)) => sketch,
            _ => return Err(EditError::Validation("Keine Zeichnung begonnen".into())),
        };
        sketch.vertices.push(position);
        Ok(!sketch.kind.requires_multi_point())
    }

    /// Setzt ein Attribut des entstehenden Features.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: serde_json::Value) -> bool {
        match self.sketch.as_mut() {
            Some(sketch) => {
                sketch.attributes.insert(name.into(), value);
                true
            }
            None => false,
        }
    }

    /// Schließt die Zeichnung ab und liefert das ID-lose Feature.
    ///
    /// Funktioniert auch für eine nach einem Fehler zurückgehaltene Skizze
    /// (erneutes Einreichen).
    pub fn complete_drawing(&mut self) -> Result<Feature, EditError> {
        if !self.active {
            return Err(EditError::ToolInactive(ToolName::CreateFeature));
        }
        let sketch = self
            .sketch
            .as_ref()
            .ok_or_else(|| EditError::Validation("Keine Skizze vorhanden".into()))?;
        let geometry = sketch.geometry().ok_or_else(|| {
            EditError::Validation(format!(
                "{:?} braucht mindestens {} Punkte, {} gesetzt",
                sketch.kind,
                sketch.kind.min_vertices(),
                sketch.vertices.len()
            ))
        })?;

        self.is_creating = false;
        Ok(Feature {
            id: None,
            geometry,
            attributes: sketch.attributes.clone(),
        })
    }

    /// Muss eine laufende Zeichnung beim Verlassen zwangsweise abgeschlossen werden?
    ///
    /// Nur Mehrpunkt-Geometrien; ein einzelner Punkt schließt sich selbst ab.
    pub fn needs_forced_flush(&self) -> bool {
        self.is_creating
            && self
                .sketch
                .as_ref()
                .is_some_and(|s| s.kind.requires_multi_point())
    }

    /// Store hat die Anlage bestätigt: die passende Skizze wird entfernt.
    ///
    /// Eine inzwischen neu begonnene Zeichnung bleibt unangetastet.
    pub fn on_created(&mut self, feature: &Feature) {
        if self.is_creating {
            return;
        }
        let matches = self
            .sketch
            .as_ref()
            .and_then(Sketch::geometry)
            .is_some_and(|g| g == feature.geometry);
        if matches {
            self.sketch = None;
        }
    }

    /// Verwirft die Skizze ausdrücklich (z.B. nach einer abgelehnten Anlage).
    pub fn discard_sketch(&mut self) -> Option<Sketch> {
        self.is_creating = false;
        self.sketch.take()
    }
}

impl Tool for CreateFeatureTool {
    fn name(&self) -> ToolName {
        ToolName::CreateFeature
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        if self.is_creating {
            log::debug!("Unfertige Zeichnung beim Deaktivieren verworfen");
            self.sketch = None;
            self.is_creating = false;
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn dispose(&mut self) {
        self.deactivate();
        self.sketch = None;
    }
}

impl MutatingTool for CreateFeatureTool {
    fn kind(&self) -> MutationKind {
        MutationKind::Create
    }

    fn has_pending_input(&self) -> bool {
        self.is_creating
    }

    fn prepare(
        &self,
        layer: LayerId,
        mut feature: Feature,
        _previous: Option<Feature>,
        flags: MutationFlags,
    ) -> Result<MutationRequest, EditError> {
        ensure_usable(self, flags)?;
        let replaced_id = feature.id.take();
        Ok(MutationRequest {
            layer,
            kind: MutationKind::Create,
            feature,
            previous: None,
            flags,
            replaced_id,
            history_entry: None,
        })
    }
}
