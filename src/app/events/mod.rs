//! AppIntent- und AppCommand-Enums für den Intent/Command-Datenfluss
//! sowie die Events, die eine Session nach außen meldet.

mod command;
mod intent;
mod mutation;

pub use command::AppCommand;
pub use intent::AppIntent;
pub use mutation::{MutationEvent, MutationFlags, MutationKind};

use crate::core::LayerId;
use crate::shared::EditingMode;

/// Alles, was eine Session an Beobachter (UI-Chrome, Tests) meldet.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Erfolgreich persistierte Mutation
    Mutation(MutationEvent),
    /// `changed(new, old)` der Active-Layer-Registry
    LayerChanged {
        /// Neuer aktiver Layer (`None` = kein aktiver Layer)
        new: Option<LayerId>,
        /// Bisher aktiver Layer
        old: Option<LayerId>,
    },
    /// Editier-Modus hat gewechselt
    ModeChanged {
        /// Neuer Modus
        mode: EditingMode,
        /// Vorheriger Modus
        previous: EditingMode,
    },
}
