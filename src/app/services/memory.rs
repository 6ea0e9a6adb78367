//! In-Memory-Feature-Store für Replay-Binary und Tests.
//!
//! Jeder Aufruf gibt einmal an den Executor zurück, bevor er auflöst,
//! damit sich gleichzeitige Anfragen wie beim echten Store überlappen.

use super::{FeatureFetcher, FeatureService, ServiceError};
use crate::core::{Feature, FeatureId, LayerId};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Zähler der Kollaborator-Aufrufe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    /// `create`-Aufrufe
    pub creates: usize,
    /// `update`-Aufrufe
    pub updates: usize,
    /// `delete`-Aufrufe
    pub deletes: usize,
    /// `fetch_feature`-Aufrufe
    pub feature_fetches: usize,
    /// `fetch_url`-Aufrufe
    pub url_fetches: usize,
}

/// Feature-Store im Speicher mit fortlaufender ID-Vergabe und Fehlerinjektion.
pub struct InMemoryFeatureStore {
    features: RefCell<BTreeMap<(LayerId, FeatureId), Feature>>,
    collections: RefCell<HashMap<String, String>>,
    next_id: Cell<FeatureId>,
    failing_writes: Cell<usize>,
    calls: Cell<StoreCalls>,
}

impl Default for InMemoryFeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFeatureStore {
    /// Erstellt einen leeren Store; IDs beginnen bei 1.
    pub fn new() -> Self {
        Self {
            features: RefCell::new(BTreeMap::new()),
            collections: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
            failing_writes: Cell::new(0),
            calls: Cell::new(StoreCalls::default()),
        }
    }

    /// Legt ein Feature direkt im Store ab (ohne Zähler), vergibt ggf. eine ID.
    pub fn seed(&self, layer: LayerId, feature: Feature) -> Feature {
        let id = feature.id.unwrap_or_else(|| self.allocate_id());
        if id >= self.next_id.get() {
            self.next_id.set(id + 1);
        }
        let stored = Feature {
            id: Some(id),
            ..feature
        };
        self.features.borrow_mut().insert((layer, id), stored.clone());
        stored
    }

    /// Hinterlegt einen FeatureCollection-Body unter einer URL.
    pub fn publish_collection(&self, url: impl Into<String>, body: impl Into<String>) {
        self.collections.borrow_mut().insert(url.into(), body.into());
    }

    /// Die nächsten `count` schreibenden Aufrufe werden abgelehnt.
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.set(count);
    }

    /// Bisherige Aufrufzähler.
    pub fn calls(&self) -> StoreCalls {
        self.calls.get()
    }

    /// Gespeicherte Version eines Features.
    pub fn stored(&self, layer: LayerId, id: FeatureId) -> Option<Feature> {
        self.features.borrow().get(&(layer, id)).cloned()
    }

    /// Anzahl gespeicherter Features eines Layers.
    pub fn stored_count(&self, layer: LayerId) -> usize {
        self.features
            .borrow()
            .keys()
            .filter(|(l, _)| *l == layer)
            .count()
    }

    fn allocate_id(&self) -> FeatureId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn count(&self, update: impl FnOnce(&mut StoreCalls)) {
        let mut calls = self.calls.get();
        update(&mut calls);
        self.calls.set(calls);
    }

    fn check_write(&self) -> Result<(), ServiceError> {
        let remaining = self.failing_writes.get();
        if remaining > 0 {
            self.failing_writes.set(remaining - 1);
            return Err(ServiceError::Rejected("injizierter Fehler".into()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl FeatureService for InMemoryFeatureStore {
    async fn create(&self, layer: LayerId, feature: Feature) -> Result<FeatureId, ServiceError> {
        self.count(|c| c.creates += 1);
        yield_once().await;
        self.check_write()?;
        let id = self.allocate_id();
        let stored = Feature {
            id: Some(id),
            ..feature
        };
        self.features.borrow_mut().insert((layer, id), stored);
        Ok(id)
    }

    async fn update(&self, layer: LayerId, feature: Feature) -> Result<(), ServiceError> {
        self.count(|c| c.updates += 1);
        yield_once().await;
        self.check_write()?;
        let id = feature
            .id
            .ok_or_else(|| ServiceError::Rejected("Update ohne Feature-ID".into()))?;
        let mut features = self.features.borrow_mut();
        let slot = features
            .get_mut(&(layer, id))
            .ok_or(ServiceError::NotFound { layer, id })?;
        *slot = feature;
        Ok(())
    }

    async fn delete(&self, layer: LayerId, id: FeatureId) -> Result<(), ServiceError> {
        self.count(|c| c.deletes += 1);
        yield_once().await;
        self.check_write()?;
        self.features
            .borrow_mut()
            .remove(&(layer, id))
            .map(|_| ())
            .ok_or(ServiceError::NotFound { layer, id })
    }
}

#[async_trait(?Send)]
impl FeatureFetcher for InMemoryFeatureStore {
    async fn fetch_feature(&self, layer: LayerId, id: FeatureId) -> Result<Feature, ServiceError> {
        self.count(|c| c.feature_fetches += 1);
        yield_once().await;
        self.stored(layer, id)
            .ok_or(ServiceError::NotFound { layer, id })
    }

    async fn fetch_url(&self, url: &str) -> Result<String, ServiceError> {
        self.count(|c| c.url_fetches += 1);
        yield_once().await;
        self.collections
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| ServiceError::Transport(format!("404 für {url}")))
    }
}

/// Gibt genau einmal `Pending` zurück und weckt sich selbst.
fn yield_once() -> YieldOnce {
    YieldOnce { yielded: false }
}

struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
