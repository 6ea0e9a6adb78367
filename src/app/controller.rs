//! Application Controller für zentrale Event-Verarbeitung.

use super::pending::PendingMutation;
use super::{AppCommand, AppIntent, EditingSession};
use crate::core::Layer;

/// Orchestriert UI-Events und Handler auf der `EditingSession`.
///
/// Mutierende Commands liefern `PendingMutation`s zurück. Der Host treibt
/// sie mit seinem Executor und übergibt sie an `EditingSession::run`.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(
        &mut self,
        session: &mut EditingSession,
        intent: AppIntent,
    ) -> anyhow::Result<Vec<PendingMutation>> {
        let commands = self.map_intent_to_commands(session, intent);
        let mut pending = Vec::new();
        for command in commands {
            pending.extend(self.handle_command(session, command)?);
        }

        Ok(pending)
    }

    fn map_intent_to_commands(&self, session: &EditingSession, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(session, intent)
    }

    /// Führt mutierende Commands auf der Session aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        session: &mut EditingSession,
        command: AppCommand,
    ) -> anyhow::Result<Vec<PendingMutation>> {
        session.command_log.record(command.clone());
        use super::handlers;

        let mut pending = Vec::new();
        match command {
            // === Modi ===
            AppCommand::SetMode { mode } => {
                handlers::mode::set_mode(session, mode);
            }
            AppCommand::ToggleEditable => pending = handlers::mode::toggle_editable(session),
            AppCommand::SetLocationTracking { enabled } => {
                handlers::mode::set_location_tracking(session, enabled)
            }
            AppCommand::FlushOpenInput => pending = handlers::mode::flush_open_input(session),

            // === Layer ===
            AppCommand::AddLayer { id, name } => {
                handlers::layers::layer_added(session, Layer::new(id, name));
            }
            AppCommand::RemoveLayer { id, closing } => {
                handlers::layers::layer_removed(session, id, closing);
            }
            AppCommand::CloseSession => handlers::layers::closed(session),
            AppCommand::SetActiveLayer { id } => {
                handlers::layers::set_active_layer(session, id);
            }

            // === Zeichnen ===
            AppCommand::BeginDrawing { kind } => handlers::mutation::begin_drawing(session, kind)?,
            AppCommand::PlaceVertex { position } => {
                pending.extend(handlers::mutation::place_vertex(session, position)?)
            }
            AppCommand::SetSketchAttribute { name, value } => {
                handlers::mutation::set_sketch_attribute(session, name, value)?
            }
            AppCommand::CompleteDrawing => {
                pending.push(handlers::mutation::complete_drawing(session)?)
            }
            AppCommand::SaveCreation => {
                pending.extend(handlers::mutation::save_creation(session)?)
            }
            AppCommand::DiscardSketch => {
                if handlers::mutation::discard_sketch(session).is_some() {
                    log::debug!("Skizze verworfen");
                }
            }

            // === Selektion ===
            AppCommand::SelectFeature { id, additive } => {
                handlers::selection::select_feature(session, id, additive)?
            }
            AppCommand::ClearSelection => handlers::selection::clear(session),

            // === Bearbeiten ===
            AppCommand::BeginEdit { id } => handlers::mutation::begin_edit(session, id)?,
            AppCommand::UpdateEditGeometry { geometry } => {
                handlers::mutation::update_edit_geometry(session, geometry)?
            }
            AppCommand::SetEditAttribute { name, value } => {
                handlers::mutation::set_edit_attribute(session, name, value)?
            }
            AppCommand::SaveEdit => pending.extend(handlers::mutation::save_edit(session)?),
            AppCommand::CancelEdit => {
                handlers::mutation::cancel_edit(session);
            }

            // === Löschen ===
            AppCommand::DeleteFeature { id } => {
                pending.push(handlers::mutation::delete_feature(session, id)?)
            }

            // === History ===
            AppCommand::Undo => pending.extend(handlers::history::undo(session)?),
            AppCommand::Redo => pending.extend(handlers::history::redo(session)?),

            // === Standort ===
            AppCommand::RecordLocationFix { position } => {
                handlers::selection::record_location_fix(session, position)?
            }
        }

        Ok(pending)
    }
}
