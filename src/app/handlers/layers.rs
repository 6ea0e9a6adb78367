//! Handler für den Layer-Lebenszyklus und den aktiven Layer.

use crate::app::events::SessionEvent;
use crate::app::EditingSession;
use crate::core::{Layer, LayerId};
use crate::shared::EditingMode;

/// Liefert den aktiven Layer und weist bei Bedarf den Layer mit der
/// kleinsten ID zu. Der Modus-Controller wird dabei auf den Layer gesetzt.
pub fn ensure_active_layer(session: &mut EditingSession) -> Option<LayerId> {
    let before = session.registry.active_id();
    let active = session.registry.get_active_layer();
    if before.is_none() && active.is_some() {
        attach_mode_controller(session, active);
    }
    active
}

/// Macht einen Layer aktiv. Gibt `false` zurück, wenn sich nichts ändert.
pub fn set_active_layer(session: &mut EditingSession, id: LayerId) -> bool {
    let Some(change) = session.registry.set_active_layer(Some(id)) else {
        log::debug!("Layer {} ist bereits aktiv oder unbekannt", id);
        return false;
    };

    attach_mode_controller(session, change.new);
    session.record_event(SessionEvent::LayerChanged {
        new: change.new,
        old: change.old,
    });
    log::info!("Aktiver Layer: {:?} → {}", change.old, id);
    true
}

/// Neuer Layer in der Session; er wird sofort aktiv.
pub fn layer_added(session: &mut EditingSession, layer: Layer) -> bool {
    let id = layer.id;
    if !session.registry.insert(layer) {
        log::warn!("Layer {} ist bereits registriert", id);
        return false;
    }
    log::info!("Layer {} hinzugefügt", id);
    set_active_layer(session, id);
    true
}

/// Layer wurde entfernt.
///
/// War er aktiv, wird außerhalb eines Session-Endes der Layer mit der
/// kleinsten verbleibenden ID aktiv; beim Schließen bleibt kein Layer aktiv
/// und es wird kein Wechsel gemeldet.
pub fn layer_removed(session: &mut EditingSession, id: LayerId, is_closing: bool) -> bool {
    let was_active = session.registry.active_id() == Some(id);
    if session.registry.remove(id).is_none() {
        log::warn!("Layer {} ist nicht registriert", id);
        return false;
    }
    let evicted = session.cache.clear_layer(id);
    log::info!(
        "Layer {} entfernt ({} Cache-Einträge verworfen)",
        id,
        evicted
    );

    if !was_active {
        return true;
    }

    if is_closing {
        detach_mode_controller(session);
        return true;
    }

    let next = session.registry.lowest_id();
    if let Some(next) = next {
        session.registry.set_active_layer(Some(next));
        attach_mode_controller(session, Some(next));
    } else {
        detach_mode_controller(session);
    }
    session.record_event(SessionEvent::LayerChanged {
        new: next,
        old: Some(id),
    });
    true
}

/// Session wird geschlossen: kein Layer bleibt aktiv.
pub fn closed(session: &mut EditingSession) {
    session.registry.set_active_layer(None);
    detach_mode_controller(session);
    log::info!("Session geschlossen");
}

fn attach_mode_controller(session: &mut EditingSession, layer: Option<LayerId>) {
    let reset = session.mode.set_surf_layer(
        layer,
        &mut session.registry,
        &mut session.selection,
    );
    session.mode.apply_bundle(&mut session.registry);
    if let Some(previous) = reset {
        session.record_event(SessionEvent::ModeChanged {
            mode: EditingMode::Select,
            previous,
        });
    }
}

fn detach_mode_controller(session: &mut EditingSession) {
    session
        .mode
        .set_surf_layer(None, &mut session.registry, &mut session.selection);
}
