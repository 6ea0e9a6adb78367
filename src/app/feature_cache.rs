//! Read-through/Write-through-Cache für vollständige Feature-Daten.
//!
//! Einzige geteilte, veränderliche Ressource zwischen den Tools. Geschrieben
//! wird ausschließlich über `upsert_to_cache` / `delete_from_cache`;
//! zurückgegebene Features sind `Arc`s und werden nie in-place verändert.
//!
//! Gleichzeitige Cache-Misses für denselben Schlüssel werden **nicht**
//! zusammengelegt: jeder Miss löst einen eigenen Fetch aus, der zuletzt
//! auflösende gewinnt.

use super::services::{FeatureFetcher, ServiceError};
use crate::core::{Feature, FeatureCollection, FeatureId, LayerId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// Fehler eines Cache-Zugriffs.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Bulk-Fetch ohne URL, es wird keine Anfrage gestellt
    #[error("Keine URL für den Feature-Abruf angegeben")]
    EmptyUrl,
    /// Feature ohne Store-ID kann nicht nachgeladen werden
    #[error("Feature ohne ID kann nicht nachgeladen werden")]
    MissingId,
    /// Fetch-Kollaborator fehlgeschlagen
    #[error(transparent)]
    Fetch(#[from] ServiceError),
    /// Antwort ist keine lesbare FeatureCollection
    #[error("FeatureCollection nicht lesbar: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Cache-Schlüssel: (Layer, Feature-ID).
pub type CacheKey = (LayerId, FeatureId);

/// Feature-Cache vor dem Fetch-Kollaborator.
pub struct FeatureCache {
    entries: RefCell<HashMap<CacheKey, Arc<Feature>>>,
    fetcher: Rc<dyn FeatureFetcher>,
}

impl FeatureCache {
    /// Erstellt einen leeren Cache.
    pub fn new(fetcher: Rc<dyn FeatureFetcher>) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            fetcher,
        }
    }

    /// Liefert die vollständigen Daten zu einem (Teil-)Feature.
    ///
    /// Treffer lösen sofort auf und liefern dasselbe `Arc` wie zuvor.
    /// Ein Miss stellt genau eine Anfrage und legt das Ergebnis ab.
    pub async fn get_complete_feature(
        &self,
        layer: LayerId,
        partial: &Feature,
    ) -> Result<Arc<Feature>, CacheError> {
        let id = partial.id.ok_or(CacheError::MissingId)?;
        if let Some(hit) = self.cached(layer, id) {
            log::debug!("Cache-Treffer: Layer {} Feature {}", layer, id);
            return Ok(hit);
        }

        log::debug!("Cache-Miss: Layer {} Feature {} wird geladen", layer, id);
        let fetched = self.fetcher.fetch_feature(layer, id).await?;
        Ok(self.upsert_to_cache(layer, id, fetched))
    }

    /// Schreibt die neueste lokale Version eines Features in den Cache.
    pub fn upsert_to_cache(&self, layer: LayerId, id: FeatureId, feature: Feature) -> Arc<Feature> {
        let entry = Arc::new(feature);
        self.entries
            .borrow_mut()
            .insert((layer, id), Arc::clone(&entry));
        entry
    }

    /// Entfernt ein Feature aus dem Cache. Gibt `true` zurück wenn es vorhanden war.
    pub fn delete_from_cache(&self, layer: LayerId, id: FeatureId) -> bool {
        self.entries.borrow_mut().remove(&(layer, id)).is_some()
    }

    /// Lädt eine FeatureCollection von einer URL.
    ///
    /// Eine leere URL schlägt sofort fehl, ohne den Fetcher aufzurufen.
    /// Die geladenen Features werden nicht in den Cache übernommen.
    pub async fn get_feature_from_url(&self, url: &str) -> Result<Vec<Feature>, CacheError> {
        if url.trim().is_empty() {
            log::warn!("Feature-Abruf ohne URL abgelehnt");
            return Err(CacheError::EmptyUrl);
        }

        let body = self.fetcher.fetch_url(url).await?;
        let collection: FeatureCollection = serde_json::from_str(&body)?;
        log::info!(
            "{} Features von {} geladen",
            collection.features.len(),
            url
        );
        Ok(collection.features)
    }

    /// Gibt einen Cache-Eintrag ohne Fetch zurück.
    pub fn cached(&self, layer: LayerId, id: FeatureId) -> Option<Arc<Feature>> {
        self.entries.borrow().get(&(layer, id)).cloned()
    }

    /// Verwirft alle Einträge eines Layers (z.B. wenn der Layer entfernt wird).
    pub fn clear_layer(&self, layer: LayerId) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(l, _), _| *l != layer);
        before - entries.len()
    }

    /// Anzahl der Einträge.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Gibt `true` zurück, wenn der Cache leer ist.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
