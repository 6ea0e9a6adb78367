//! Handler für Moduswechsel und Standortverfolgung.

use super::{layers, mutation};
use crate::app::events::SessionEvent;
use crate::app::pending::PendingMutation;
use crate::app::EditingSession;
use crate::shared::EditingMode;

/// Setzt den Editier-Modus. Gibt `true` zurück, wenn er sich geändert hat.
///
/// Derselbe Modus erneut wendet nur das Bündel erneut an.
pub fn set_mode(session: &mut EditingSession, mode: EditingMode) -> bool {
    layers::ensure_active_layer(session);
    let previous = session.mode.mode();
    if !session.mode.set_mode(mode, &mut session.registry) {
        log::debug!("Modus {:?} erneut angewendet", mode);
        return false;
    }

    session.record_event(SessionEvent::ModeChanged { mode, previous });
    log::info!("Modus: {:?} → {:?}", previous, mode);
    if session.options.abort_in_flight_on_mode_change {
        session.abort_in_flight();
    }
    true
}

/// Schaltet zwischen Select und dem zuletzt genutzten Editier-Modus um.
///
/// Beim Verlassen eines Editier-Modus werden offene Zeichnungen und
/// Bearbeitungen abgeschickt; die entstehenden Mutationen gehen an den
/// Aufrufer.
pub fn toggle_editable(session: &mut EditingSession) -> Vec<PendingMutation> {
    if !session.mode.is_editing() {
        let target = session.mode.resume_target();
        set_mode(session, target);
        return Vec::new();
    }

    session.mode.remember_editing_mode();
    let pending = flush_open_input(session);
    set_mode(session, EditingMode::Select);
    pending
}

/// Schickt eine offene Zeichnung und eine offene Bearbeitung ab.
///
/// Abgelehnte Eingaben (z.B. zu wenige Punkte) blockieren den
/// Moduswechsel nicht; sie werden beim Deaktivieren verworfen.
pub fn flush_open_input(session: &mut EditingSession) -> Vec<PendingMutation> {
    let mut pending = Vec::new();
    let has_input = session
        .registry
        .active_entry()
        .is_some_and(|e| e.tools.has_pending_input());
    if !has_input {
        return pending;
    }

    match mutation::save_creation(session) {
        Ok(created) => pending.extend(created),
        Err(e) => log::warn!("Offene Zeichnung nicht abgeschickt: {}", e),
    }
    match mutation::save_edit(session) {
        Ok(edited) => pending.extend(edited),
        Err(e) => log::warn!("Offene Bearbeitung nicht abgeschickt: {}", e),
    }
    pending
}

/// Standortverfolgung ein-/ausschalten.
///
/// Einschalten wechselt in TrackLocation; Ausschalten verlässt
/// TrackLocation Richtung Select.
pub fn set_location_tracking(session: &mut EditingSession, enabled: bool) {
    session.mode.set_location_tracking(enabled);
    log::info!(
        "Standortverfolgung {}",
        if enabled { "eingeschaltet" } else { "ausgeschaltet" }
    );
    if enabled {
        set_mode(session, EditingMode::TrackLocation);
    } else if session.mode.mode() == EditingMode::TrackLocation {
        set_mode(session, EditingMode::Select);
    }
}
