//! Registry aller Layer einer Session und des aktiven Layers.

use super::tools::ToolSet;
use crate::core::{Layer, LayerId};
use std::collections::BTreeMap;

/// Layer samt eigenem ToolSet.
#[derive(Debug)]
pub struct RegisteredLayer {
    /// Layer-Daten
    pub layer: Layer,
    /// Werkzeuge des Layers
    pub tools: ToolSet,
}

/// Wechsel des aktiven Layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerChange {
    /// Neuer aktiver Layer
    pub new: Option<LayerId>,
    /// Bisher aktiver Layer
    pub old: Option<LayerId>,
}

/// Verwaltet die Layer einer Session; höchstens einer ist aktiv.
///
/// Der aktive Layer ist entweder eine gültige ID oder `None`, nie eine
/// ID ohne Eintrag.
#[derive(Debug)]
pub struct ActiveLayerRegistry {
    layers: BTreeMap<LayerId, RegisteredLayer>,
    active: Option<LayerId>,
    history_max_depth: usize,
}

impl Default for ActiveLayerRegistry {
    fn default() -> Self {
        Self::new(crate::shared::HISTORY_MAX_DEPTH)
    }
}

impl ActiveLayerRegistry {
    /// Erstellt eine leere Registry; neue Layer bekommen eine History dieser Tiefe.
    pub fn new(history_max_depth: usize) -> Self {
        Self {
            layers: BTreeMap::new(),
            active: None,
            history_max_depth,
        }
    }

    /// Nimmt einen Layer auf. `false` wenn die ID schon vergeben ist.
    pub fn insert(&mut self, mut layer: Layer) -> bool {
        if self.layers.contains_key(&layer.id) {
            return false;
        }
        layer.active = false;
        let id = layer.id;
        let tools = ToolSet::new(self.history_max_depth);
        self.layers.insert(id, RegisteredLayer { layer, tools });
        true
    }

    /// Entfernt einen Layer. War er aktiv, ist danach kein Layer aktiv.
    pub fn remove(&mut self, id: LayerId) -> Option<RegisteredLayer> {
        let mut removed = self.layers.remove(&id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        removed.tools.dispose_all();
        removed.layer.active = false;
        Some(removed)
    }

    /// Aktiver Layer; ist keiner gesetzt, wird der Layer mit der
    /// kleinsten ID aktiv.
    pub fn get_active_layer(&mut self) -> Option<LayerId> {
        if self.active.is_none() {
            let lowest = self.lowest_id()?;
            self.mark_active(Some(lowest));
            log::debug!("Layer {} implizit aktiviert", lowest);
        }
        self.active
    }

    /// Aktiver Layer ohne implizite Zuweisung.
    pub fn active_id(&self) -> Option<LayerId> {
        self.active
    }

    /// Ist ein Layer aktiv?
    pub fn has_active_layer(&self) -> bool {
        self.active.is_some()
    }

    /// Wechselt den aktiven Layer.
    ///
    /// Gleicher Layer → `None` (kein Wechsel). Sonst werden alle Tools des
    /// bisherigen Layers ausgeschaltet, bevor die Aktiv-Flags umgesetzt werden.
    /// Unbekannte IDs ändern nichts.
    pub fn set_active_layer(&mut self, id: Option<LayerId>) -> Option<LayerChange> {
        if self.active == id {
            return None;
        }
        if let Some(new) = id {
            if !self.layers.contains_key(&new) {
                log::warn!("Unbekannter Layer {} kann nicht aktiviert werden", new);
                return None;
            }
        }

        let old = self.active;
        if let Some(entry) = self.active_entry_mut() {
            entry.tools.deactivate_all();
        }
        self.mark_active(id);
        Some(LayerChange { new: id, old })
    }

    /// Eintrag eines Layers.
    pub fn get(&self, id: LayerId) -> Option<&RegisteredLayer> {
        self.layers.get(&id)
    }

    /// Eintrag eines Layers (mutable).
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut RegisteredLayer> {
        self.layers.get_mut(&id)
    }

    /// Eintrag des aktiven Layers.
    pub fn active_entry(&self) -> Option<&RegisteredLayer> {
        self.active.and_then(|id| self.layers.get(&id))
    }

    /// Eintrag des aktiven Layers (mutable).
    pub fn active_entry_mut(&mut self) -> Option<&mut RegisteredLayer> {
        let id = self.active?;
        self.layers.get_mut(&id)
    }

    /// Kleinste Layer-ID.
    pub fn lowest_id(&self) -> Option<LayerId> {
        self.layers.keys().next().copied()
    }

    /// Alle Layer-IDs aufsteigend.
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.keys().copied().collect()
    }

    /// Alle Layer aufsteigend nach ID.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values().map(|e| &e.layer)
    }

    /// Anzahl der Layer.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Gibt `true` zurück, wenn keine Layer registriert sind.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn mark_active(&mut self, id: Option<LayerId>) {
        if let Some(old) = self.active.and_then(|old| self.layers.get_mut(&old)) {
            old.layer.active = false;
        }
        if let Some(new) = id.and_then(|new| self.layers.get_mut(&new)) {
            new.layer.active = true;
        }
        self.active = id;
    }
}
