use super::{EditError, SelectionState};
use crate::app::events::{MutationEvent, SessionEvent};
use crate::app::feature_cache::FeatureCache;
use crate::app::mode::ModeController;
use crate::app::pending::{InFlightTable, MutationRequest, PendingMutation};
use crate::app::registry::{ActiveLayerRegistry, RegisteredLayer};
use crate::app::services::{FeatureFetcher, FeatureService};
use crate::app::tools::{Tool, ToolName};
use crate::app::{handlers, CommandLog, EventLog};
use crate::core::{Feature, FeatureId, Layer, LayerId};
use crate::shared::{EditingMode, EditorOptions};
use futures_util::future::AbortHandle;
use std::rc::Rc;
use std::sync::Arc;

/// Hauptzustand einer Editier-Session.
///
/// Wird vom Aufrufer besessen und durch alle Operationen gereicht; es gibt
/// keinen modulweiten Zustand. Mehrere Sessions sind voneinander unabhängig.
pub struct EditingSession {
    /// Layer und aktiver Layer
    pub registry: ActiveLayerRegistry,
    /// Modus-Zustandsmaschine
    pub mode: ModeController,
    /// Selektierte Features des aktiven Layers
    pub selection: SelectionState,
    /// Gemeinsamer Feature-Cache
    pub cache: Rc<FeatureCache>,
    /// Verlauf gemeldeter Events
    pub events: EventLog,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    service: Rc<dyn FeatureService>,
    in_flight: InFlightTable,
    next_ticket: u64,
}

impl EditingSession {
    /// Erstellt eine leere Session ohne Layer, im Modus Select.
    pub fn new(
        service: Rc<dyn FeatureService>,
        fetcher: Rc<dyn FeatureFetcher>,
        options: EditorOptions,
    ) -> Self {
        Self {
            registry: ActiveLayerRegistry::new(options.effective_history_depth()),
            mode: ModeController::new(options.resume_mode),
            selection: SelectionState::new(),
            cache: Rc::new(FeatureCache::new(fetcher)),
            events: EventLog::with_capacity(options.event_log_capacity),
            command_log: CommandLog::with_capacity(options.event_log_capacity),
            service,
            in_flight: InFlightTable::default(),
            next_ticket: 1,
            options,
        }
    }

    /// Startet den Persistenz-Aufruf einer vorbereiteten Mutation.
    pub fn start_mutation(&mut self, request: MutationRequest) -> PendingMutation {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let (handle, registration) = AbortHandle::new_pair();
        log::debug!(
            "Mutation #{} gestartet: {:?} auf Layer {}",
            ticket,
            request.kind,
            request.layer
        );
        PendingMutation::start(ticket, request, Rc::clone(&self.service), registration)
            .tracked_by(&self.in_flight, handle)
    }

    /// Wartet auf eine laufende Mutation und übernimmt ihr Ergebnis.
    pub async fn run(&mut self, pending: PendingMutation) -> Result<MutationEvent, EditError> {
        let outcome = pending.await;
        handlers::mutation::finish(self, outcome)
    }

    /// Bricht alle laufenden Mutationen ab. Gibt die Anzahl zurück.
    pub fn abort_in_flight(&mut self) -> usize {
        let handles: Vec<AbortHandle> = self
            .in_flight
            .borrow_mut()
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        let count = handles.len();
        for handle in handles {
            handle.abort();
        }
        if count > 0 {
            log::info!("{} laufende Mutation(en) abgebrochen", count);
        }
        count
    }

    /// Anzahl laufender Mutationen. Verworfene `PendingMutation`s zählen nicht.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.borrow().len()
    }

    pub(crate) fn forget_in_flight(&mut self, ticket: u64) {
        self.in_flight.borrow_mut().remove(&ticket);
    }

    /// Meldet ein Event an Beobachter.
    pub fn record_event(&mut self, event: SessionEvent) {
        self.events.record(event);
    }

    /// Löst die vollständigen Attribute eines Features des aktiven Layers
    /// über den Cache auf und zeigt sie im DisplayAttribute-Tool an.
    pub async fn display_attributes(&mut self, id: FeatureId) -> Result<Arc<Feature>, EditError> {
        let layer = handlers::layers::ensure_active_layer(self).ok_or(EditError::NoActiveLayer)?;
        let entry = self
            .registry
            .get(layer)
            .ok_or(EditError::LayerNotFound(layer))?;
        if !entry.tools.display_attribute.is_active() {
            return Err(EditError::ToolInactive(ToolName::DisplayAttribute));
        }
        let partial = entry
            .layer
            .feature(id)
            .cloned()
            .ok_or(EditError::FeatureNotFound { layer, id })?;

        let cache = Rc::clone(&self.cache);
        let complete = cache.get_complete_feature(layer, &partial).await?;

        // Layer kann inzwischen gewechselt oder entfernt worden sein
        if let Some(entry) = self.registry.get_mut(layer) {
            entry.tools.display_attribute.show(Arc::clone(&complete));
        }
        Ok(complete)
    }

    /// Aktueller Modus.
    pub fn current_mode(&self) -> EditingMode {
        self.mode.mode()
    }

    /// Aktiver Layer ohne implizite Zuweisung.
    pub fn active_layer_id(&self) -> Option<LayerId> {
        self.registry.active_id()
    }

    /// Layer per ID.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.registry.get(id).map(|e| &e.layer)
    }

    /// Eintrag des aktiven Layers.
    pub fn active_entry(&self) -> Option<&RegisteredLayer> {
        self.registry.active_entry()
    }

    /// Eingeschaltete Tools des aktiven Layers.
    pub fn active_tools(&self) -> Vec<ToolName> {
        self.registry
            .active_entry()
            .map(|e| e.tools.active_tools())
            .unwrap_or_default()
    }

    /// Undo im aktiven Layer erlaubt?
    pub fn can_undo(&self) -> bool {
        self.registry
            .active_entry()
            .is_some_and(|e| e.tools.can_undo())
    }

    /// Redo im aktiven Layer erlaubt?
    pub fn can_redo(&self) -> bool {
        self.registry
            .active_entry()
            .is_some_and(|e| e.tools.can_redo())
    }
}
