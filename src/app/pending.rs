//! Laufende Persistenz-Aufrufe der Mutations-Tools.
//!
//! Eine Mutation besteht aus zwei Hälften: dem `PendingMutation`-Future,
//! das nur Daten und den Service-Handle besitzt, und dem synchronen
//! Abschluss in `handlers::mutation::finish`, der die Session erst nach
//! erfolgreicher Persistenz verändert. Dazwischen darf die Session frei
//! weiterbenutzt werden (Moduswechsel, Layerwechsel, weitere Mutationen).

use super::events::{MutationFlags, MutationKind};
use super::history::ReplayDirection;
use super::services::{FeatureService, ServiceError};
use super::EditError;
use crate::core::{Feature, FeatureId, LayerId};
use futures_util::future::{AbortHandle, AbortRegistration, Abortable, Aborted, LocalBoxFuture};
use futures_util::FutureExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

/// Abbruch-Handles der laufenden Mutationen einer Session, nach Ticket.
pub(crate) type InFlightTable = Rc<RefCell<HashMap<u64, AbortHandle>>>;

/// Hält ein Ticket in der In-Flight-Tabelle, bis die Mutation fertig oder
/// verworfen ist.
struct InFlightTicket {
    ticket: u64,
    table: Weak<RefCell<HashMap<u64, AbortHandle>>>,
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            if let Ok(mut table) = table.try_borrow_mut() {
                table.remove(&self.ticket);
            }
        }
    }
}

/// Von einem Mutations-Tool vorbereitete, noch nicht persistierte Mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    /// Ziel-Layer
    pub layer: LayerId,
    /// Art der Mutation
    pub kind: MutationKind,
    /// Create: Feature ohne ID; Edit: neue Version; Delete: zu löschendes Feature
    pub feature: Feature,
    /// Edit: bisherige Version
    pub previous: Option<Feature>,
    /// Replay-Flags
    pub flags: MutationFlags,
    /// Create-Replay: ID, unter der das Feature zuvor gespeichert war
    pub replaced_id: Option<FeatureId>,
    /// History-Eintrag, aus dem ein Replay stammt
    pub history_entry: Option<u64>,
}

impl MutationRequest {
    /// Richtung, falls die Mutation ein History-Replay ist.
    pub fn replay_direction(&self) -> Option<ReplayDirection> {
        if self.flags.undo {
            Some(ReplayDirection::Undo)
        } else if self.flags.redo {
            Some(ReplayDirection::Redo)
        } else {
            None
        }
    }
}

/// Was der Feature-Store bestätigt hat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// Angelegt unter der vergebenen ID
    Created(FeatureId),
    /// Überschrieben
    Updated,
    /// Gelöscht
    Deleted,
}

/// Ergebnis eines abgeschlossenen Persistenz-Aufrufs.
#[derive(Debug)]
pub struct MutationOutcome {
    /// Laufende Nummer innerhalb der Session
    pub ticket: u64,
    /// Ursprüngliche Anfrage
    pub request: MutationRequest,
    /// Store-Antwort oder Fehler
    pub result: Result<Persisted, EditError>,
}

/// Abbrechbarer Persistenz-Aufruf.
///
/// Leiht nichts von der Session; das Ergebnis muss über
/// `handlers::mutation::finish` (oder `EditingSession::run`) angewendet werden.
#[must_use = "Mutation wird erst nach `finish` in die Session übernommen"]
pub struct PendingMutation {
    ticket: u64,
    layer: LayerId,
    kind: MutationKind,
    flags: MutationFlags,
    future: LocalBoxFuture<'static, MutationOutcome>,
    guard: Option<InFlightTicket>,
}

impl PendingMutation {
    pub(crate) fn start(
        ticket: u64,
        request: MutationRequest,
        service: Rc<dyn FeatureService>,
        registration: AbortRegistration,
    ) -> Self {
        let layer = request.layer;
        let kind = request.kind;
        let flags = request.flags;

        let future = async move {
            let call = persist(service.as_ref(), &request);
            let result = match Abortable::new(call, registration).await {
                Ok(Ok(persisted)) => Ok(persisted),
                Ok(Err(e)) => Err(EditError::Persistence(e)),
                Err(Aborted) => Err(EditError::Aborted),
            };
            MutationOutcome {
                ticket,
                request,
                result,
            }
        }
        .boxed_local();

        Self {
            ticket,
            layer,
            kind,
            flags,
            future,
            guard: None,
        }
    }

    /// Meldet die Mutation in der In-Flight-Tabelle an. Der Eintrag
    /// verschwindet, sobald die Mutation abgeschlossen oder verworfen ist.
    pub(crate) fn tracked_by(mut self, table: &InFlightTable, handle: AbortHandle) -> Self {
        table.borrow_mut().insert(self.ticket, handle);
        self.guard = Some(InFlightTicket {
            ticket: self.ticket,
            table: Rc::downgrade(table),
        });
        self
    }

    /// Laufende Nummer.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Ziel-Layer.
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// Art der Mutation.
    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Replay-Flags.
    pub fn flags(&self) -> MutationFlags {
        self.flags
    }
}

impl Future for PendingMutation {
    type Output = MutationOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<MutationOutcome> {
        let this = self.get_mut();
        let poll = this.future.as_mut().poll(cx);
        if poll.is_ready() {
            this.guard = None;
        }
        poll
    }
}

impl std::fmt::Debug for PendingMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingMutation")
            .field("ticket", &self.ticket)
            .field("layer", &self.layer)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

async fn persist(
    service: &dyn FeatureService,
    request: &MutationRequest,
) -> Result<Persisted, ServiceError> {
    match request.kind {
        MutationKind::Create => service
            .create(request.layer, request.feature.clone())
            .await
            .map(Persisted::Created),
        MutationKind::Edit => service
            .update(request.layer, request.feature.clone())
            .await
            .map(|()| Persisted::Updated),
        MutationKind::Delete => {
            let id = request
                .feature
                .id
                .ok_or_else(|| ServiceError::Rejected("Löschen ohne Feature-ID".into()))?;
            service
                .delete(request.layer, id)
                .await
                .map(|()| Persisted::Deleted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::InMemoryFeatureStore;
    use crate::core::Geometry;
    use futures_util::future::AbortHandle;
    use glam::DVec2;

    fn create_request() -> MutationRequest {
        MutationRequest {
            layer: 1,
            kind: MutationKind::Create,
            feature: Feature::new(Geometry::Point(DVec2::new(1.0, 1.0))),
            previous: None,
            flags: MutationFlags::default(),
            replaced_id: None,
            history_entry: None,
        }
    }

    #[test]
    fn resolves_with_assigned_id() {
        let store = Rc::new(InMemoryFeatureStore::new());
        let (_handle, registration) = AbortHandle::new_pair();

        let pending = PendingMutation::start(1, create_request(), store.clone(), registration);
        let outcome = pollster::block_on(pending);

        assert!(matches!(outcome.result, Ok(Persisted::Created(_))));
        assert_eq!(store.stored_count(1), 1);
    }

    #[test]
    fn aborted_before_completion_never_reaches_store() {
        let store = Rc::new(InMemoryFeatureStore::new());
        let (handle, registration) = AbortHandle::new_pair();

        let pending = PendingMutation::start(1, create_request(), store.clone(), registration);
        handle.abort();
        let outcome = pollster::block_on(pending);

        assert!(matches!(outcome.result, Err(EditError::Aborted)));
        assert_eq!(store.stored_count(1), 0);
    }

    #[test]
    fn dropping_releases_in_flight_ticket() {
        let store = Rc::new(InMemoryFeatureStore::new());
        let table: InFlightTable = Rc::default();
        let (handle, registration) = AbortHandle::new_pair();

        let pending = PendingMutation::start(7, create_request(), store.clone(), registration)
            .tracked_by(&table, handle);
        assert!(table.borrow().contains_key(&7));

        drop(pending);

        assert!(table.borrow().is_empty());
        assert_eq!(store.stored_count(1), 0);
    }

    #[test]
    fn completion_releases_in_flight_ticket() {
        let store = Rc::new(InMemoryFeatureStore::new());
        let table: InFlightTable = Rc::default();
        let (handle, registration) = AbortHandle::new_pair();

        let mut pending = PendingMutation::start(3, create_request(), store, registration)
            .tracked_by(&table, handle);
        let outcome = pollster::block_on(&mut pending);

        assert_eq!(outcome.ticket, 3);
        assert!(table.borrow().is_empty());
    }

    #[test]
    fn replay_direction_follows_flags() {
        let mut request = create_request();
        assert_eq!(request.replay_direction(), None);

        request.flags = MutationFlags::redo();
        assert_eq!(request.replay_direction(), Some(ReplayDirection::Redo));
    }
}
