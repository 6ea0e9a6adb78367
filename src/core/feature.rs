//! Feature: einzelne Geometrie mit optionaler Store-ID und Attributen.

use super::Geometry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Vom Remote-Store vergebene Feature-ID.
pub type FeatureId = u64;

/// Offene Attribut-Map (Name → JSON-Wert), Reihenfolge bleibt erhalten.
pub type Attributes = IndexMap<String, serde_json::Value>;

/// Einzelnes geometrisches Objekt eines Layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Store-ID, `None` solange eine Erstellung noch nicht persistiert ist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    /// Geometrie
    pub geometry: Geometry,
    /// Attribute (GeoJSON: `properties`)
    #[serde(default, rename = "properties")]
    pub attributes: Attributes,
}

impl Feature {
    /// Erstellt ein noch nicht persistiertes Feature ohne Attribute.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry,
            attributes: Attributes::new(),
        }
    }

    /// Setzt die Store-ID (Builder-Stil).
    pub fn with_id(mut self, id: FeatureId) -> Self {
        self.id = Some(id);
        self
    }

    /// Setzt ein Attribut (Builder-Stil).
    pub fn with_attribute(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// `true` sobald der Store eine ID vergeben hat.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// FeatureCollection wie sie der Bulk-Fetch liefert.
///
/// Unbekannte Felder (`"type": "FeatureCollection"`, `bbox`, …) werden ignoriert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    /// Enthaltene Features
    #[serde(default)]
    pub features: Vec<Feature>,
}
