//! Boundary representation of footprints.
//!
//! Outside the crate a polygon is an ordered list of `(x, y)` pairs with the
//! first point repeated as the last. Inside it is a `geo::Polygon<f64>`.

use geo::{Coord, LineString, Polygon};

use crate::error::{GeometryError, Result};

/// Ring-closed list of `(x, y)` pairs
pub type Ring = Vec<(f64, f64)>;

/// Build a polygon from a ring. An open ring is closed.
pub fn polygon_from_ring(points: &[(f64, f64)]) -> Polygon<f64> {
    polygon_with_holes(points, &[])
}

/// Build a polygon from an exterior ring and interior rings
pub fn polygon_with_holes(outer: &[(f64, f64)], holes: &[Ring]) -> Polygon<f64> {
    let interiors = holes
        .iter()
        .map(|hole| line_string(hole))
        .collect::<Vec<_>>();
    Polygon::new(line_string(outer), interiors)
}

fn line_string(points: &[(f64, f64)]) -> LineString<f64> {
    points
        .iter()
        .map(|&(x, y)| Coord { x, y })
        .collect::<Vec<_>>()
        .into()
}

/// Exterior ring as `(x, y)` pairs, closing point included
pub fn polygon_to_ring(polygon: &Polygon<f64>) -> Ring {
    polygon.exterior().coords().map(|c| (c.x, c.y)).collect()
}

/// Exterior vertices without the closing repeat
pub fn exterior_vertices(polygon: &Polygon<f64>) -> Vec<Coord<f64>> {
    let mut coords = polygon.exterior().0.clone();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

/// Fail with `DegenerateGeometry` if any ring holds a NaN or infinite coordinate
pub fn ensure_finite(polygon: &Polygon<f64>, what: &str) -> Result<()> {
    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
    for ring in rings {
        if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(GeometryError::DegenerateGeometry(format!(
                "{} has non-finite coordinates",
                what
            )));
        }
    }
    Ok(())
}

pub(crate) fn norm(v: Coord<f64>) -> f64 {
    v.x.hypot(v.y)
}

pub(crate) fn dot(a: Coord<f64>, b: Coord<f64>) -> f64 {
    a.x * b.x + a.y * b.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_ring_is_closed() {
        let poly = polygon_from_ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let ring = polygon_to_ring(&poly);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_closed_ring_kept() {
        let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)];
        let poly = polygon_from_ring(&square);
        assert_eq!(polygon_to_ring(&poly), square);
        assert_eq!(exterior_vertices(&poly).len(), 4);
    }

    #[test]
    fn test_holes_are_carried() {
        let outer = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let hole = vec![(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)];
        let poly = polygon_with_holes(&outer, &[hole]);
        assert_eq!(poly.interiors().len(), 1);
        assert_eq!(poly.interiors()[0].0.len(), 5);
    }

    #[test]
    fn test_ensure_finite() {
        let good = polygon_from_ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(ensure_finite(&good, "area").is_ok());

        let bad = polygon_from_ring(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            ensure_finite(&bad, "area"),
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_empty_ring() {
        let poly = polygon_from_ring(&[]);
        assert!(exterior_vertices(&poly).is_empty());
    }
}
