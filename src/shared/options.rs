//! Zentrale Konfiguration für den Editier-Kern.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use super::EditingMode;
use serde::{Deserialize, Serialize};

// ── History ─────────────────────────────────────────────────────────

/// Maximale Tiefe des Undo- bzw. Redo-Stacks pro Layer.
pub const HISTORY_MAX_DEPTH: usize = 100;

// ── Events ──────────────────────────────────────────────────────────

/// Maximale Anzahl gepufferter Session-Events und Commands.
pub const EVENT_LOG_CAPACITY: usize = 1000;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `map_edit_core.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── History ─────────────────────────────────────────────────
    /// Maximale Anzahl Undo/Redo-Schritte pro Layer (älteste fallen heraus)
    #[serde(default = "default_history_max_depth")]
    pub history_max_depth: usize,

    // ── Events ──────────────────────────────────────────────────
    /// Kapazität des Session-Event-Logs und des Command-Logs
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,

    // ── Modi ────────────────────────────────────────────────────
    /// Laufende Persistenz-Aufrufe bei jedem Moduswechsel abbrechen
    #[serde(default)]
    pub abort_in_flight_on_mode_change: bool,
    /// Modus, den `toggle_editable` ohne gemerkten Editier-Modus wiederherstellt
    #[serde(default = "default_resume_mode")]
    pub resume_mode: EditingMode,

    // ── Selektion ───────────────────────────────────────────────
    /// Gelöschte Features aus der Selektion entfernen
    #[serde(default = "default_true")]
    pub clear_selection_on_delete: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_max_depth: HISTORY_MAX_DEPTH,
            event_log_capacity: EVENT_LOG_CAPACITY,
            abort_in_flight_on_mode_change: false,
            resume_mode: EditingMode::AddShape,
            clear_selection_on_delete: true,
        }
    }
}

/// Serde-Default für `history_max_depth` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_history_max_depth() -> usize {
    HISTORY_MAX_DEPTH
}

fn default_event_log_capacity() -> usize {
    EVENT_LOG_CAPACITY
}

fn default_resume_mode() -> EditingMode {
    EditingMode::AddShape
}

fn default_true() -> bool {
    true
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei oder verwendet Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    Self::sanitized(opts)
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert die Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Pfad der Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("map_edit_core"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("map_edit_core.toml")
    }

    /// Ersetzt Werte, die der Editier-Kern nicht ausführen kann.
    fn sanitized(mut self) -> Self {
        if !self.resume_mode.is_editing() {
            log::warn!(
                "resume_mode {:?} ist kein Editier-Modus, verwende {:?}",
                self.resume_mode,
                default_resume_mode()
            );
            self.resume_mode = default_resume_mode();
        }
        self
    }

    /// Undo-Tiefe, mindestens ein Schritt.
    pub fn effective_history_depth(&self) -> usize {
        self.history_max_depth.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let opts: EditorOptions =
            toml::from_str("abort_in_flight_on_mode_change = true\n").expect("gültiges TOML");

        assert!(opts.abort_in_flight_on_mode_change);
        assert_eq!(opts.history_max_depth, HISTORY_MAX_DEPTH);
        assert_eq!(opts.resume_mode, EditingMode::AddShape);
        assert!(opts.clear_selection_on_delete);
    }

    #[test]
    fn resume_mode_uses_camel_case_names() {
        let opts: EditorOptions =
            toml::from_str("resume_mode = \"editShape\"\n").expect("gültiges TOML");
        assert_eq!(opts.resume_mode, EditingMode::EditShape);
    }

    #[test]
    fn save_and_load_roundtrip_via_file() {
        let path = std::env::temp_dir().join(format!(
            "map_edit_core_options_{}.toml",
            std::process::id()
        ));
        let opts = EditorOptions {
            history_max_depth: 7,
            ..EditorOptions::default()
        };

        opts.save_to_file(&path).expect("speicherbar");
        let loaded = EditorOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, opts);
    }

    #[test]
    fn select_as_resume_mode_falls_back_to_add_shape() {
        let path = std::env::temp_dir().join(format!(
            "map_edit_core_resume_select_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "resume_mode = \"select\"\nhistory_max_depth = 5\n")
            .expect("schreibbar");

        let loaded = EditorOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.resume_mode, EditingMode::AddShape);
        assert_eq!(loaded.history_max_depth, 5);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("map_edit_core_does_not_exist.toml");
        assert_eq!(EditorOptions::load_from_file(&path), EditorOptions::default());
    }

    #[test]
    fn effective_history_depth_is_at_least_one() {
        let opts = EditorOptions {
            history_max_depth: 0,
            ..EditorOptions::default()
        };
        assert_eq!(opts.effective_history_depth(), 1);
    }
}
