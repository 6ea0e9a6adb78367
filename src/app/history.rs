//! Undo/Redo über die Mutations-Events der Tool-Familie.
//!
//! Einträge speichern die aufgezeichnete Mutation als Daten. Undo und Redo
//! werden daraus als `ReplayAction` abgeleitet und laufen über dieselben
//! Mutations-Tools wie Nutzeraktionen, nur mit gesetzten Replay-Flags.

use super::events::{MutationEvent, MutationFlags, MutationKind};
use super::tools::{EditFeatureTool, Tool, ToolName};
use crate::core::{Feature, FeatureId};

/// Richtung eines History-Replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplayDirection {
    /// Rückgängig machen
    Undo,
    /// Wiederherstellen
    Redo,
}

impl ReplayDirection {
    /// Flags, mit denen die Replay-Mutation läuft.
    pub fn flags(self) -> MutationFlags {
        match self {
            ReplayDirection::Undo => MutationFlags::undo(),
            ReplayDirection::Redo => MutationFlags::redo(),
        }
    }
}

/// Umkehrbare Mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEntry {
    /// Feature wurde angelegt
    Created {
        /// Angelegtes Feature (mit ID)
        feature: Feature,
    },
    /// Feature wurde gelöscht
    Deleted {
        /// Gelöschtes Feature
        feature: Feature,
    },
    /// Feature wurde überschrieben
    Edited {
        /// Neue Version
        new: Feature,
        /// Vorherige Version
        old: Feature,
    },
}

/// Vom Replay auszuführende Mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayAction {
    /// Eintrag, aus dem das Replay stammt
    pub entry: u64,
    /// Art der Mutation
    pub kind: MutationKind,
    /// Create/Delete: betroffenes Feature; Edit: Zielversion
    pub feature: Feature,
    /// Edit: Version, von der aus editiert wird
    pub previous: Option<Feature>,
    /// Replay-Flags
    pub flags: MutationFlags,
}

impl CommandEntry {
    /// Baut einen Eintrag aus einem Event. Replays ergeben keinen Eintrag.
    pub fn from_event(event: &MutationEvent) -> Option<Self> {
        if event.flags().is_replay() {
            return None;
        }
        Some(match event {
            MutationEvent::Created { feature, .. } => CommandEntry::Created {
                feature: feature.clone(),
            },
            MutationEvent::Deleted { feature, .. } => CommandEntry::Deleted {
                feature: feature.clone(),
            },
            MutationEvent::Edited { new, old, .. } => CommandEntry::Edited {
                new: new.clone(),
                old: old.clone(),
            },
        })
    }

    fn action(&self, serial: u64, direction: ReplayDirection) -> ReplayAction {
        use ReplayDirection::{Redo, Undo};

        let (kind, feature, previous) = match (self, direction) {
            (CommandEntry::Created { feature }, Undo) | (CommandEntry::Deleted { feature }, Redo) => {
                (MutationKind::Delete, feature.clone(), None)
            }
            (CommandEntry::Created { feature }, Redo) | (CommandEntry::Deleted { feature }, Undo) => {
                (MutationKind::Create, feature.clone(), None)
            }
            (CommandEntry::Edited { new, old }, Undo) => {
                (MutationKind::Edit, old.clone(), Some(new.clone()))
            }
            (CommandEntry::Edited { new, old }, Redo) => {
                (MutationKind::Edit, new.clone(), Some(old.clone()))
            }
        };
        ReplayAction {
            entry: serial,
            kind,
            feature,
            previous,
            flags: direction.flags(),
        }
    }

    fn rebind(&mut self, old_id: FeatureId, new_id: FeatureId) {
        let features: Vec<&mut Feature> = match self {
            CommandEntry::Created { feature } | CommandEntry::Deleted { feature } => vec![feature],
            CommandEntry::Edited { new, old } => vec![new, old],
        };
        for feature in features {
            if feature.id == Some(old_id) {
                feature.id = Some(new_id);
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Recorded {
    serial: u64,
    entry: CommandEntry,
}

/// Undo/Redo-Stapel eines Layers.
///
/// Neue Nutzer-Mutationen leeren den Redo-Stapel (lineare History).
#[derive(Debug)]
pub struct CommandHistory {
    active: bool,
    done: Vec<Recorded>,
    undone: Vec<Recorded>,
    max_depth: usize,
    next_serial: u64,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new_with_capacity(crate::shared::HISTORY_MAX_DEPTH)
    }
}

impl CommandHistory {
    /// Erstellt eine leere History mit maximaler Tiefe (mindestens 1).
    pub fn new_with_capacity(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            active: false,
            done: Vec::with_capacity(max_depth.min(64)),
            undone: Vec::new(),
            max_depth,
            next_serial: 1,
        }
    }

    /// Verarbeitet ein Mutations-Event. Gibt `true` zurück, wenn ein
    /// Eintrag aufgezeichnet wurde.
    pub fn on_mutation(&mut self, event: &MutationEvent) -> bool {
        let Some(entry) = CommandEntry::from_event(event) else {
            return false;
        };
        let serial = self.next_serial;
        self.next_serial += 1;
        push_bounded(&mut self.done, Recorded { serial, entry }, self.max_depth);
        self.undone.clear();
        true
    }

    /// Undo erlaubt? Nicht während einer ungespeicherten Bearbeitung.
    pub fn can_undo(&self, edit: &EditFeatureTool) -> bool {
        !self.done.is_empty() && !edit.is_editing()
    }

    /// Redo erlaubt? Nicht während einer ungespeicherten Bearbeitung.
    pub fn can_redo(&self, edit: &EditFeatureTool) -> bool {
        !self.undone.is_empty() && !edit.is_editing()
    }

    /// Nimmt den obersten `done`-Eintrag, legt ihn auf `undone` und
    /// liefert die auszuführende Undo-Mutation.
    pub fn undo_last_action(&mut self) -> Option<ReplayAction> {
        let recorded = self.done.pop()?;
        let action = recorded.entry.action(recorded.serial, ReplayDirection::Undo);
        push_bounded(&mut self.undone, recorded, self.max_depth);
        Some(action)
    }

    /// Nimmt den obersten `undone`-Eintrag, legt ihn auf `done` und
    /// liefert die auszuführende Redo-Mutation.
    pub fn redo_undone_action(&mut self) -> Option<ReplayAction> {
        let recorded = self.undone.pop()?;
        let action = recorded.entry.action(recorded.serial, ReplayDirection::Redo);
        push_bounded(&mut self.done, recorded, self.max_depth);
        Some(action)
    }

    /// Replay ist fehlgeschlagen: Eintrag zurück auf den Stapel, von dem er kam.
    ///
    /// Ist der Eintrag inzwischen verworfen (neue Mutation), passiert nichts.
    pub fn revert_replay(&mut self, direction: ReplayDirection, entry: u64) -> bool {
        let (from, to) = match direction {
            ReplayDirection::Undo => (&mut self.undone, &mut self.done),
            ReplayDirection::Redo => (&mut self.done, &mut self.undone),
        };
        let Some(index) = from.iter().rposition(|r| r.serial == entry) else {
            return false;
        };
        let recorded = from.remove(index);
        push_bounded(to, recorded, self.max_depth);
        true
    }

    /// Ein Replay hat ein Feature neu angelegt: alle Einträge zeigen ab
    /// jetzt auf die neue Store-ID.
    pub fn rebind_feature_id(&mut self, old_id: FeatureId, new_id: FeatureId) {
        for recorded in self.done.iter_mut().chain(self.undone.iter_mut()) {
            recorded.entry.rebind(old_id, new_id);
        }
    }

    /// Leert beide Stapel.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    /// Anzahl undo-fähiger Einträge.
    pub fn done_len(&self) -> usize {
        self.done.len()
    }

    /// Anzahl redo-fähiger Einträge.
    pub fn undone_len(&self) -> usize {
        self.undone.len()
    }

    /// Oberster `done`-Eintrag.
    pub fn last_done(&self) -> Option<&CommandEntry> {
        self.done.last().map(|r| &r.entry)
    }

    /// Oberster `undone`-Eintrag.
    pub fn last_undone(&self) -> Option<&CommandEntry> {
        self.undone.last().map(|r| &r.entry)
    }
}

impl Tool for CommandHistory {
    fn name(&self) -> ToolName {
        ToolName::RedoUndo
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn dispose(&mut self) {
        self.active = false;
        self.clear();
    }
}

fn push_bounded(stack: &mut Vec<Recorded>, recorded: Recorded, max_depth: usize) {
    if stack.len() >= max_depth {
        stack.remove(0);
    }
    stack.push(recorded);
}
