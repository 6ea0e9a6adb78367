//! Handler für Undo/Redo-Operationen.

use super::layers;
use crate::app::history::ReplayDirection;
use crate::app::pending::PendingMutation;
use crate::app::{EditError, EditingSession};

/// Startet das Undo des letzten Eintrags im aktiven Layer.
///
/// Nicht erlaubt (leerer Stapel, offene Bearbeitung) → `Ok(None)`.
pub fn undo(session: &mut EditingSession) -> Result<Option<PendingMutation>, EditError> {
    replay(session, ReplayDirection::Undo)
}

/// Startet das Redo des zuletzt rückgängig gemachten Eintrags.
pub fn redo(session: &mut EditingSession) -> Result<Option<PendingMutation>, EditError> {
    replay(session, ReplayDirection::Redo)
}

fn replay(
    session: &mut EditingSession,
    direction: ReplayDirection,
) -> Result<Option<PendingMutation>, EditError> {
    let Some(layer) = layers::ensure_active_layer(session) else {
        log::debug!("{:?}: kein aktiver Layer", direction);
        return Ok(None);
    };
    let entry = session
        .registry
        .get_mut(layer)
        .ok_or(EditError::LayerNotFound(layer))?;

    let tools = &mut entry.tools;
    let action = match direction {
        ReplayDirection::Undo if tools.can_undo() => tools.history.undo_last_action(),
        ReplayDirection::Redo if tools.can_redo() => tools.history.redo_undone_action(),
        _ => None,
    };
    let Some(action) = action else {
        log::debug!("{:?}: nichts zu tun", direction);
        return Ok(None);
    };

    let serial = action.entry;
    let prepared = tools.mutating_tool(action.kind).prepare(
        layer,
        action.feature,
        action.previous,
        action.flags,
    );
    let mut request = match prepared {
        Ok(request) => request,
        Err(e) => {
            tools.history.revert_replay(direction, serial);
            return Err(e);
        }
    };
    request.history_entry = Some(serial);

    log::info!("{:?} gestartet: {:?} auf Layer {}", direction, request.kind, layer);
    Ok(Some(session.start_mutation(request)))
}
