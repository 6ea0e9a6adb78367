//! Externe Kollaboratoren: Feature-Persistenz und Feature-Fetch.
//!
//! Der Kern definiert nur die Schnittstellen. Transport, Retry und Timeouts
//! liegen beim Implementierer. Alles läuft auf einem logischen Thread,
//! daher sind die Futures nicht `Send`.

mod memory;

pub use memory::{InMemoryFeatureStore, StoreCalls};

use crate::core::{Feature, FeatureId, LayerId};
use async_trait::async_trait;

/// Fehler eines Kollaborator-Aufrufs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Der Store hat die Anfrage abgelehnt
    #[error("Feature-Store hat abgelehnt: {0}")]
    Rejected(String),
    /// Feature existiert im Store nicht
    #[error("Feature {id} in Layer {layer} nicht gefunden")]
    NotFound {
        /// Layer der Anfrage
        layer: LayerId,
        /// Angefragte Feature-ID
        id: FeatureId,
    },
    /// Transport fehlgeschlagen (Netzwerk, Statuscode, …)
    #[error("Transportfehler: {0}")]
    Transport(String),
}

/// Persistenz-Kollaborator für Create/Edit/Delete.
///
/// Jedes Future löst nur bei Erfolg auf; das zugehörige Mutations-Event
/// wird erst danach ausgelöst.
#[async_trait(?Send)]
pub trait FeatureService {
    /// Legt ein Feature an und gibt die vom Store vergebene ID zurück.
    async fn create(&self, layer: LayerId, feature: Feature) -> Result<FeatureId, ServiceError>;

    /// Überschreibt ein bestehendes Feature (ID muss gesetzt sein).
    async fn update(&self, layer: LayerId, feature: Feature) -> Result<(), ServiceError>;

    /// Löscht ein Feature per ID.
    async fn delete(&self, layer: LayerId, id: FeatureId) -> Result<(), ServiceError>;
}

/// Fetch-Kollaborator für vollständige Feature-Daten.
#[async_trait(?Send)]
pub trait FeatureFetcher {
    /// Lädt ein einzelnes Feature vollständig (alle Attribute).
    async fn fetch_feature(&self, layer: LayerId, id: FeatureId) -> Result<Feature, ServiceError>;

    /// Lädt den Body einer FeatureCollection von einer URL.
    async fn fetch_url(&self, url: &str) -> Result<String, ServiceError>;
}
