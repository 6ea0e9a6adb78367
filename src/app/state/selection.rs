use crate::core::FeatureId;
use indexmap::IndexSet;

/// Auswahlbezogener Session-Zustand (Reihenfolge der Selektion bleibt erhalten).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected: IndexSet<FeatureId>,
}

impl SelectionState {
    /// Erstellt einen leeren Selektionszustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt ein Feature hinzu. Gibt `true` zurück, wenn es neu ist.
    pub fn insert(&mut self, id: FeatureId) -> bool {
        self.selected.insert(id)
    }

    /// Entfernt ein Feature. Gibt `true` zurück, wenn es selektiert war.
    pub fn remove(&mut self, id: FeatureId) -> bool {
        self.selected.shift_remove(&id)
    }

    /// Ist das Feature selektiert?
    pub fn contains(&self, id: FeatureId) -> bool {
        self.selected.contains(&id)
    }

    /// Leert die Selektion.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selektierte IDs in Klick-Reihenfolge.
    pub fn ids(&self) -> Vec<FeatureId> {
        self.selected.iter().copied().collect()
    }

    /// Zuletzt selektiertes Feature.
    pub fn last(&self) -> Option<FeatureId> {
        self.selected.last().copied()
    }

    /// Anzahl selektierter Features.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Gibt `true` zurück, wenn nichts selektiert ist.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
