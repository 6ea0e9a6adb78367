//! Geometrie eines Features (GeoJSON-ähnlich, ohne Geometrie-Berechnung).

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Art der Geometrie; bestimmt, wie viele Eingabepunkte ein Sketch braucht.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Einzelner Punkt (ein Klick)
    Point,
    /// Linienzug (mindestens zwei Punkte)
    LineString,
    /// Polygon mit einem Außenring (mindestens drei Punkte)
    Polygon,
}

impl GeometryKind {
    /// Mindestanzahl an Stützpunkten für eine gültige Geometrie.
    pub fn min_vertices(self) -> usize {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
        }
    }

    /// `true` wenn die Eingabe aus mehreren Klicks besteht und explizit
    /// abgeschlossen werden muss (Linie, Polygon).
    pub fn requires_multi_point(self) -> bool {
        !matches!(self, GeometryKind::Point)
    }
}

/// Geometrie in Kartenkoordinaten.
///
/// Serialisiert wie GeoJSON: `{"type": "Point", "coordinates": [x, y]}`.
/// Polygone tragen nur den Außenring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Punkt
    Point(DVec2),
    /// Linienzug
    LineString(Vec<DVec2>),
    /// Polygon (Außenring, nicht geschlossen gespeichert)
    Polygon(Vec<DVec2>),
}

impl Geometry {
    /// Baut eine Geometrie aus Sketch-Stützpunkten.
    ///
    /// Gibt `None` zurück wenn zu wenige Punkte vorhanden sind.
    pub fn from_vertices(kind: GeometryKind, vertices: &[DVec2]) -> Option<Self> {
        if vertices.len() < kind.min_vertices() {
            return None;
        }
        Some(match kind {
            GeometryKind::Point => Geometry::Point(vertices[0]),
            GeometryKind::LineString => Geometry::LineString(vertices.to_vec()),
            GeometryKind::Polygon => Geometry::Polygon(vertices.to_vec()),
        })
    }

    /// Art der Geometrie.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Anzahl der Stützpunkte.
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::LineString(points) | Geometry::Polygon(points) => points.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_needs_no_multi_point_input() {
        assert!(!GeometryKind::Point.requires_multi_point());
        assert!(GeometryKind::LineString.requires_multi_point());
        assert!(GeometryKind::Polygon.requires_multi_point());
    }

    #[test]
    fn from_vertices_rejects_too_few_points() {
        let one = [DVec2::new(1.0, 2.0)];
        assert!(Geometry::from_vertices(GeometryKind::LineString, &one).is_none());
        assert!(Geometry::from_vertices(GeometryKind::Polygon, &[one[0], one[0]]).is_none());
        assert_eq!(
            Geometry::from_vertices(GeometryKind::Point, &one),
            Some(Geometry::Point(DVec2::new(1.0, 2.0)))
        );
    }

    #[test]
    fn serializes_geojson_like() {
        let geometry = Geometry::LineString(vec![DVec2::new(0.0, 1.0), DVec2::new(2.0, 3.0)]);
        let json = serde_json::to_value(&geometry).expect("serialisierbar");

        assert_eq!(json["type"], "LineString");
        assert_eq!(json["coordinates"][1][0], 2.0);
    }
}
