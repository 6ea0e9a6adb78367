//! Layer: benannte Feature-Sammlung mit Aktiv-Flag.

use super::{Feature, FeatureId};
use indexmap::IndexMap;
use serde::Serialize;

/// Layer-Identifier (Ordnung bestimmt die Default-Auswahl der Registry).
pub type LayerId = u64;

/// Kartenlayer mit den aktuell dargestellten Features.
///
/// Features sind nach Store-ID indexiert; nur persistierte Features
/// (mit ID) können Teil eines Layers sein.
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    /// Layer-ID
    pub id: LayerId,
    /// Anzeigename
    pub name: String,
    /// Aktiv-Flag (höchstens ein Layer pro Session)
    pub active: bool,
    #[serde(serialize_with = "serialize_features")]
    features: IndexMap<FeatureId, Feature>,
}

impl Layer {
    /// Erstellt einen leeren, inaktiven Layer.
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: false,
            features: IndexMap::new(),
        }
    }

    /// Fügt ein persistiertes Feature hinzu bzw. ersetzt es.
    ///
    /// Gibt `false` zurück wenn das Feature keine ID hat.
    pub fn add_feature(&mut self, feature: Feature) -> bool {
        let Some(id) = feature.id else {
            return false;
        };
        self.features.insert(id, feature);
        true
    }

    /// Ersetzt ein vorhandenes Feature und gibt die vorherige Version zurück.
    pub fn replace_feature(&mut self, feature: Feature) -> Option<Feature> {
        let id = feature.id?;
        let slot = self.features.get_mut(&id)?;
        Some(std::mem::replace(slot, feature))
    }

    /// Entfernt ein Feature (Reihenfolge der übrigen bleibt erhalten).
    pub fn remove_feature(&mut self, id: FeatureId) -> Option<Feature> {
        self.features.shift_remove(&id)
    }

    /// Gibt ein Feature per ID zurück.
    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// Prüft ob ein Feature im Layer liegt.
    pub fn contains(&self, id: FeatureId) -> bool {
        self.features.contains_key(&id)
    }

    /// Alle Features in Einfügereihenfolge.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// IDs aller Features in Einfügereihenfolge.
    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.keys().copied().collect()
    }

    /// Anzahl der Features.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

fn serialize_features<S>(
    features: &IndexMap<FeatureId, Feature>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(features.values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Geometry;
    use glam::DVec2;

    fn point(id: FeatureId, x: f64) -> Feature {
        Feature::new(Geometry::Point(DVec2::new(x, 0.0))).with_id(id)
    }

    #[test]
    fn unpersisted_feature_is_rejected() {
        let mut layer = Layer::new(1, "Brunnen");
        assert!(!layer.add_feature(Feature::new(Geometry::Point(DVec2::ZERO))));
        assert_eq!(layer.feature_count(), 0);
    }

    #[test]
    fn replace_returns_previous_version() {
        let mut layer = Layer::new(1, "Brunnen");
        layer.add_feature(point(5, 1.0));

        let old = layer.replace_feature(point(5, 2.0)).expect("vorhanden");

        assert_eq!(old.geometry, Geometry::Point(DVec2::new(1.0, 0.0)));
        assert_eq!(
            layer.feature(5).map(|f| &f.geometry),
            Some(&Geometry::Point(DVec2::new(2.0, 0.0)))
        );
        assert!(layer.replace_feature(point(6, 0.0)).is_none());
    }

    #[test]
    fn remove_keeps_order_of_remaining() {
        let mut layer = Layer::new(1, "Brunnen");
        for id in [3, 1, 2] {
            layer.add_feature(point(id, id as f64));
        }

        layer.remove_feature(1);

        assert_eq!(layer.feature_ids(), vec![3, 2]);
    }
}
