//! Handler für Create/Edit/Delete und den Abschluss laufender Mutationen.

use super::layers;
use crate::app::events::{MutationEvent, MutationFlags, MutationKind, SessionEvent};
use crate::app::pending::{MutationOutcome, MutationRequest, PendingMutation, Persisted};
use crate::app::registry::RegisteredLayer;
use crate::app::tools::{MutatingTool, Sketch};
use crate::app::{EditError, EditingSession};
use crate::core::{FeatureId, Geometry, GeometryKind, LayerId};
use glam::DVec2;

fn active_entry(
    session: &mut EditingSession,
) -> Result<(LayerId, &mut RegisteredLayer), EditError> {
    let layer = layers::ensure_active_layer(session).ok_or(EditError::NoActiveLayer)?;
    let entry = session
        .registry
        .get_mut(layer)
        .ok_or(EditError::LayerNotFound(layer))?;
    Ok((layer, entry))
}

// ── Create ───────────────────────────────────────────────────────

/// Beginnt eine Zeichnung im aktiven Layer.
pub fn begin_drawing(session: &mut EditingSession, kind: GeometryKind) -> Result<(), EditError> {
    let (_, entry) = active_entry(session)?;
    entry.tools.create.begin_drawing(kind)
}

/// Setzt einen Punkt. Schließt sich die Zeichnung damit selbst ab
/// (einzelner Punkt), wird sie sofort eingereicht.
pub fn place_vertex(
    session: &mut EditingSession,
    position: DVec2,
) -> Result<Option<PendingMutation>, EditError> {
    let (_, entry) = active_entry(session)?;
    if entry.tools.create.add_vertex(position)? {
        return complete_drawing(session).map(Some);
    }
    Ok(None)
}

/// Setzt ein Attribut der laufenden Zeichnung.
pub fn set_sketch_attribute(
    session: &mut EditingSession,
    name: String,
    value: serde_json::Value,
) -> Result<(), EditError> {
    let (_, entry) = active_entry(session)?;
    if entry.tools.create.set_attribute(name, value) {
        Ok(())
    } else {
        Err(EditError::Validation("Keine Skizze vorhanden".into()))
    }
}

/// Schließt die Zeichnung ab und reicht das neue Feature ein.
pub fn complete_drawing(session: &mut EditingSession) -> Result<PendingMutation, EditError> {
    let (layer, entry) = active_entry(session)?;
    let feature = entry.tools.create.complete_drawing()?;
    let request = entry
        .tools
        .create
        .prepare(layer, feature, None, MutationFlags::default())?;
    Ok(session.start_mutation(request))
}

/// Erzwingt den Abschluss einer laufenden Mehrpunkt-Zeichnung.
///
/// Einzelne Punkte schließen sich selbst ab und brauchen das nicht.
pub fn save_creation(session: &mut EditingSession) -> Result<Option<PendingMutation>, EditError> {
    let needs_flush = session
        .registry
        .active_entry()
        .is_some_and(|e| e.tools.create.needs_forced_flush());
    if !needs_flush {
        return Ok(None);
    }
    log::debug!("Laufende Zeichnung wird zwangsweise abgeschlossen");
    complete_drawing(session).map(Some)
}

/// Verwirft die (zurückgehaltene) Skizze ausdrücklich.
pub fn discard_sketch(session: &mut EditingSession) -> Option<Sketch> {
    let (_, entry) = active_entry(session).ok()?;
    entry.tools.create.discard_sketch()
}

// ── Edit ─────────────────────────────────────────────────────────

/// Beginnt die Bearbeitung eines Features des aktiven Layers.
pub fn begin_edit(session: &mut EditingSession, id: FeatureId) -> Result<(), EditError> {
    let (layer, entry) = active_entry(session)?;
    let feature = entry
        .layer
        .feature(id)
        .cloned()
        .ok_or(EditError::FeatureNotFound { layer, id })?;
    entry.tools.edit.begin_edit(feature)
}

/// Ersetzt die Geometrie der laufenden Bearbeitung.
pub fn update_edit_geometry(
    session: &mut EditingSession,
    geometry: Geometry,
) -> Result<(), EditError> {
    let (_, entry) = active_entry(session)?;
    entry.tools.edit.update_geometry(geometry)
}

/// Setzt ein Attribut der laufenden Bearbeitung.
pub fn set_edit_attribute(
    session: &mut EditingSession,
    name: String,
    value: serde_json::Value,
) -> Result<(), EditError> {
    let (_, entry) = active_entry(session)?;
    entry.tools.edit.set_attribute(name, value)
}

/// Schickt die laufende Bearbeitung ab. `None` wenn nichts bearbeitet
/// wird oder nichts geändert wurde.
pub fn save_edit(session: &mut EditingSession) -> Result<Option<PendingMutation>, EditError> {
    let (layer, entry) = active_entry(session)?;
    let Some((new, old)) = entry.tools.edit.save_edit() else {
        return Ok(None);
    };
    if new == old {
        log::debug!("Bearbeitung ohne Änderung beendet");
        return Ok(None);
    }

    let request = match entry.tools.edit.prepare(
        layer,
        new.clone(),
        Some(old.clone()),
        MutationFlags::default(),
    ) {
        Ok(request) => request,
        Err(e) => {
            entry.tools.edit.restore(new, old);
            return Err(e);
        }
    };
    Ok(Some(session.start_mutation(request)))
}

/// Verwirft die laufende Bearbeitung.
pub fn cancel_edit(session: &mut EditingSession) -> bool {
    match active_entry(session) {
        Ok((_, entry)) => entry.tools.edit.cancel_edit().is_some(),
        Err(_) => false,
    }
}

// ── Delete ───────────────────────────────────────────────────────

/// Löscht ein Feature des aktiven Layers.
pub fn delete_feature(
    session: &mut EditingSession,
    id: FeatureId,
) -> Result<PendingMutation, EditError> {
    let (layer, entry) = active_entry(session)?;
    let feature = entry
        .layer
        .feature(id)
        .cloned()
        .ok_or(EditError::FeatureNotFound { layer, id })?;
    let request = entry
        .tools
        .delete
        .prepare(layer, feature, None, MutationFlags::default())?;
    Ok(session.start_mutation(request))
}

// ── Abschluss ────────────────────────────────────────────────────

/// Übernimmt das Ergebnis eines Persistenz-Aufrufs in die Session.
///
/// Erfolg: Layer, Cache, Selektion und History werden aktualisiert und das
/// Mutations-Event gemeldet. Fehler: nichts davon passiert; ein Replay
/// wandert zurück auf seinen Stapel, eine Bearbeitung wird wiederhergestellt.
pub fn finish(
    session: &mut EditingSession,
    outcome: MutationOutcome,
) -> Result<MutationEvent, EditError> {
    session.forget_in_flight(outcome.ticket);
    let MutationOutcome {
        ticket,
        request,
        result,
    } = outcome;

    match result {
        Ok(persisted) => apply_persisted(session, ticket, request, persisted),
        Err(e) => {
            roll_back(session, request);
            log::warn!("Mutation #{} fehlgeschlagen: {}", ticket, e);
            Err(e)
        }
    }
}

fn apply_persisted(
    session: &mut EditingSession,
    ticket: u64,
    request: MutationRequest,
    persisted: Persisted,
) -> Result<MutationEvent, EditError> {
    let MutationRequest {
        layer,
        feature,
        previous,
        flags,
        replaced_id,
        ..
    } = request;

    let Some(entry) = session.registry.get_mut(layer) else {
        log::warn!(
            "Mutation #{} persistiert, aber Layer {} existiert nicht mehr",
            ticket,
            layer
        );
        return Err(EditError::LayerNotFound(layer));
    };

    let event = match persisted {
        Persisted::Created(id) => {
            let created = feature.with_id(id);
            entry.layer.add_feature(created.clone());
            if flags.is_replay() {
                if let Some(old_id) = replaced_id {
                    entry.tools.history.rebind_feature_id(old_id, id);
                }
            } else {
                entry.tools.create.on_created(&created);
            }
            session.cache.upsert_to_cache(layer, id, created.clone());
            MutationEvent::Created {
                layer,
                feature: created,
                flags,
            }
        }
        Persisted::Updated => {
            let replaced = entry.layer.replace_feature(feature.clone());
            if replaced.is_none() {
                log::debug!("Bearbeitetes Feature war nicht mehr im Layer, neu eingefügt");
                entry.layer.add_feature(feature.clone());
            }
            if let Some(id) = feature.id {
                session.cache.upsert_to_cache(layer, id, feature.clone());
            }
            let old = previous.or(replaced).unwrap_or_else(|| feature.clone());
            MutationEvent::Edited {
                layer,
                new: feature,
                old,
                flags,
            }
        }
        Persisted::Deleted => {
            if let Some(id) = feature.id {
                entry.layer.remove_feature(id);
                session.cache.delete_from_cache(layer, id);
                if session.options.clear_selection_on_delete {
                    session.selection.remove(id);
                }
            }
            MutationEvent::Deleted {
                layer,
                feature,
                flags,
            }
        }
    };

    if let Some(entry) = session.registry.get_mut(layer) {
        entry.tools.history.on_mutation(&event);
    }
    session.record_event(SessionEvent::Mutation(event.clone()));
    log::info!(
        "Mutation #{} persistiert: {:?} Feature {:?} auf Layer {} (Flags {:?})",
        ticket,
        event.kind(),
        event.feature_id(),
        layer,
        flags
    );
    Ok(event)
}

fn roll_back(session: &mut EditingSession, request: MutationRequest) {
    let Some(entry) = session.registry.get_mut(request.layer) else {
        return;
    };

    if let (Some(direction), Some(serial)) = (request.replay_direction(), request.history_entry) {
        if entry.tools.history.revert_replay(direction, serial) {
            log::debug!("{:?}-Eintrag zurück auf seinen Stapel gelegt", direction);
        }
        return;
    }

    if request.kind != MutationKind::Edit {
        return;
    }
    if let Some(old) = request.previous {
        if entry.tools.edit.restore(request.feature, old) {
            log::debug!("Abgelehnte Bearbeitung wiederhergestellt");
        } else {
            log::debug!("Abgelehnte Bearbeitung verworfen (Tool inaktiv oder neue Bearbeitung)");
        }
    }
}
