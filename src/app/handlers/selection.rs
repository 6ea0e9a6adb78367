//! Handler für Selektion und Standort-Fixes.

use super::layers;
use crate::app::{EditError, EditingSession};
use crate::core::FeatureId;
use glam::DVec2;

/// Klick auf ein Feature im Select-Modus.
pub fn select_feature(
    session: &mut EditingSession,
    id: FeatureId,
    additive: bool,
) -> Result<(), EditError> {
    let layer = layers::ensure_active_layer(session).ok_or(EditError::NoActiveLayer)?;
    let entry = session
        .registry
        .get(layer)
        .ok_or(EditError::LayerNotFound(layer))?;
    entry
        .tools
        .select
        .pick(&entry.layer, &mut session.selection, id, additive)?;
    log::debug!("Selektion: {:?}", session.selection.ids());
    Ok(())
}

/// Hebt die Selektion auf.
pub fn clear(session: &mut EditingSession) {
    session.selection.clear();
    if let Some(entry) = session.registry.active_entry_mut() {
        entry.tools.display_attribute.clear();
    }
}

/// Nimmt einen Standort-Fix im aktiven Layer auf.
pub fn record_location_fix(session: &mut EditingSession, position: DVec2) -> Result<(), EditError> {
    let layer = layers::ensure_active_layer(session).ok_or(EditError::NoActiveLayer)?;
    let entry = session
        .registry
        .get_mut(layer)
        .ok_or(EditError::LayerNotFound(layer))?;
    entry.tools.track_location.record_fix(position)
}
