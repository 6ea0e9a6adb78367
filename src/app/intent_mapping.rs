//! Mapping von UI-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, EditingSession};
use crate::shared::EditingMode;

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(session: &EditingSession, intent: AppIntent) -> Vec<AppCommand> {
    let current = session.current_mode();

    match intent {
        AppIntent::ModeSelected { mode } => {
            let leaves_input_mode = mode != current
                && matches!(current, EditingMode::AddShape | EditingMode::EditShape);
            if leaves_input_mode {
                vec![AppCommand::FlushOpenInput, AppCommand::SetMode { mode }]
            } else {
                vec![AppCommand::SetMode { mode }]
            }
        }
        AppIntent::EditableToggled => vec![AppCommand::ToggleEditable],
        AppIntent::LocationTrackingToggled { enabled } => {
            vec![AppCommand::SetLocationTracking { enabled }]
        }

        AppIntent::LayerAdded { id, name } => vec![AppCommand::AddLayer { id, name }],
        AppIntent::LayerRemoved { id, closing } => vec![AppCommand::RemoveLayer { id, closing }],
        AppIntent::SessionClosed => vec![AppCommand::CloseSession],
        AppIntent::ActiveLayerSelected { id } => vec![AppCommand::SetActiveLayer { id }],

        AppIntent::DrawingStarted { kind } => vec![AppCommand::BeginDrawing { kind }],
        AppIntent::VertexPlaced { position } => vec![AppCommand::PlaceVertex { position }],
        AppIntent::SketchAttributeChanged { name, value } => {
            vec![AppCommand::SetSketchAttribute { name, value }]
        }
        AppIntent::DrawingCompleted => vec![AppCommand::CompleteDrawing],
        AppIntent::DrawingDiscarded => vec![AppCommand::DiscardSketch],

        AppIntent::FeatureClicked {
            feature_id,
            additive,
        } => match current {
            EditingMode::Select => vec![AppCommand::SelectFeature {
                id: feature_id,
                additive,
            }],
            EditingMode::EditShape => {
                let editing = session
                    .active_entry()
                    .is_some_and(|e| e.tools.edit.is_editing());
                if editing {
                    vec![AppCommand::SaveEdit, AppCommand::BeginEdit { id: feature_id }]
                } else {
                    vec![AppCommand::BeginEdit { id: feature_id }]
                }
            }
            EditingMode::DeleteShape => vec![AppCommand::DeleteFeature { id: feature_id }],
            EditingMode::AddShape | EditingMode::TrackLocation => Vec::new(),
        },
        AppIntent::EditGeometryChanged { geometry } => {
            vec![AppCommand::UpdateEditGeometry { geometry }]
        }
        AppIntent::EditAttributeChanged { name, value } => {
            vec![AppCommand::SetEditAttribute { name, value }]
        }
        AppIntent::EditConfirmed => vec![AppCommand::SaveEdit],
        AppIntent::EditCancelled => vec![AppCommand::CancelEdit],

        AppIntent::UndoRequested => vec![AppCommand::Undo],
        AppIntent::RedoRequested => vec![AppCommand::Redo],

        AppIntent::LocationFix { position } => vec![AppCommand::RecordLocationFix { position }],
        AppIntent::SelectionCleared => vec![AppCommand::ClearSelection],
    }
}
