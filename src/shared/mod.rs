//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Typen, die zwischen `app` und der UI-Chrome des Hosts geteilt
//! werden (Modus-Oberfläche, Laufzeit-Optionen).

mod editing_mode;
pub mod options;

pub use editing_mode::EditingMode;
pub use options::EditorOptions;
pub use options::{EVENT_LOG_CAPACITY, HISTORY_MAX_DEPTH};
