//! Begrenzte Protokolle für ausgeführte Commands und Session-Events.

use super::events::SessionEvent;
use super::AppCommand;

/// Speichert Einträge in Reihenfolge, begrenzt auf eine Kapazität.
///
/// Ist die Kapazität erreicht, wird die ältere Hälfte verworfen.
pub struct RecordLog<T> {
    entries: Vec<T>,
    capacity: usize,
}

/// Verlauf ausgeführter Commands.
pub type CommandLog = RecordLog<AppCommand>;

/// Verlauf gemeldeter Session-Events (Mutationen, Layer- und Moduswechsel).
pub type EventLog = RecordLog<SessionEvent>;

impl<T> RecordLog<T> {
    /// Standard-Kapazität, wenn nichts anderes konfiguriert ist.
    pub const MAX_ENTRIES: usize = 1000;

    /// Erstellt ein leeres Log mit Standard-Kapazität.
    pub fn new() -> Self {
        Self::with_capacity(Self::MAX_ENTRIES)
    }

    /// Erstellt ein leeres Log mit eigener Kapazität (mindestens 2).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(2),
        }
    }

    /// Fügt einen Eintrag hinzu.
    /// Begrenzt auf die Kapazität, ältere Einträge werden verworfen.
    pub fn record(&mut self, entry: T) {
        if self.entries.len() >= self.capacity {
            self.entries.drain(..self.capacity / 2);
        }
        self.entries.push(entry);
    }

    /// Gibt die Anzahl der Einträge zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Einträge vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Letzter Eintrag.
    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Entnimmt alle Einträge (z.B. für einen Beobachter, der pollt).
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.entries)
    }
}

impl<T> Default for RecordLog<T> {
    fn default() -> Self {
        Self::new()
    }
}
