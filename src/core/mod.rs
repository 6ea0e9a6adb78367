//! Core-Domänentypen: Geometrien, Features und Layer.
//!
//! Reine Daten ohne Tool- oder Session-Logik. Wer wann mutieren darf,
//! entscheidet der Application-Layer (`crate::app`).

pub mod feature;
pub mod geometry;
pub mod layer;

pub use feature::{Attributes, Feature, FeatureCollection, FeatureId};
pub use geometry::{Geometry, GeometryKind};
pub use layer::{Layer, LayerId};
