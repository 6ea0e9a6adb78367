//! Mutations-Events der Tool-Familie und ihre Replay-Flags.

use crate::core::{Feature, FeatureId, LayerId};
use serde::{Deserialize, Serialize};

/// Markiert Mutationen, die aus einem Undo/Redo-Replay stammen.
///
/// Wird ausschließlich von der CommandHistory gesetzt; Nutzeraktionen
/// tragen immer `MutationFlags::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationFlags {
    /// Mutation ist ein Undo-Replay
    #[serde(default)]
    pub undo: bool,
    /// Mutation ist ein Redo-Replay
    #[serde(default)]
    pub redo: bool,
}

impl MutationFlags {
    /// Flags eines Undo-Replays.
    pub fn undo() -> Self {
        Self {
            undo: true,
            redo: false,
        }
    }

    /// Flags eines Redo-Replays.
    pub fn redo() -> Self {
        Self {
            undo: false,
            redo: true,
        }
    }

    /// `true` wenn die Mutation aus der History stammt.
    pub fn is_replay(&self) -> bool {
        self.undo || self.redo
    }
}

/// Art einer Feature-Mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Feature anlegen
    Create,
    /// Feature überschreiben
    Edit,
    /// Feature löschen
    Delete,
}

/// Broadcast nach erfolgreicher Persistenz.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationEvent {
    /// `created(feature, flags)`; Feature trägt die vergebene Store-ID
    Created {
        /// Betroffener Layer
        layer: LayerId,
        /// Angelegtes Feature
        feature: Feature,
        /// Replay-Flags
        flags: MutationFlags,
    },
    /// `edited(new, old, flags)`
    Edited {
        /// Betroffener Layer
        layer: LayerId,
        /// Neue Version
        new: Feature,
        /// Vorherige Version
        old: Feature,
        /// Replay-Flags
        flags: MutationFlags,
    },
    /// `deleted(feature, flags)`
    Deleted {
        /// Betroffener Layer
        layer: LayerId,
        /// Gelöschtes Feature (letzte bekannte Version)
        feature: Feature,
        /// Replay-Flags
        flags: MutationFlags,
    },
}

impl MutationEvent {
    /// Layer, auf dem die Mutation stattfand.
    pub fn layer(&self) -> LayerId {
        match self {
            MutationEvent::Created { layer, .. }
            | MutationEvent::Edited { layer, .. }
            | MutationEvent::Deleted { layer, .. } => *layer,
        }
    }

    /// Replay-Flags der Mutation.
    pub fn flags(&self) -> MutationFlags {
        match self {
            MutationEvent::Created { flags, .. }
            | MutationEvent::Edited { flags, .. }
            | MutationEvent::Deleted { flags, .. } => *flags,
        }
    }

    /// Art der Mutation.
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationEvent::Created { .. } => MutationKind::Create,
            MutationEvent::Edited { .. } => MutationKind::Edit,
            MutationEvent::Deleted { .. } => MutationKind::Delete,
        }
    }

    /// Store-ID des betroffenen Features (bei `Edited` die der neuen Version).
    pub fn feature_id(&self) -> Option<FeatureId> {
        match self {
            MutationEvent::Created { feature, .. } | MutationEvent::Deleted { feature, .. } => {
                feature.id
            }
            MutationEvent::Edited { new, .. } => new.id,
        }
    }
}
