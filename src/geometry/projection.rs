use geo::{Area, BooleanOps, Centroid, Coord, LineString, Polygon};

use crate::error::{GeometryError, Result};

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Local metric frame anchored at a depot footprint's centroid
///
/// Spherical transverse Mercator with the central meridian and the origin
/// latitude at the centroid, scale factor 1 and no false easting/northing:
/// - x grows east, y grows north, both in meters
/// - the centroid maps to (0, 0)
///
/// Lengths and angles are accurate to well below a meter over a few
/// kilometers, which is what the area sizing and tiling formulas need.
/// A projection is cheap to build and must be rebuilt whenever the
/// footprint it was derived from changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    center: Coord<f64>,
    lon0: f64,
    lat0: f64,
}

impl LocalProjection {
    /// Create a projection centered at `center` (lon, lat in degrees)
    pub fn new(center: Coord<f64>) -> Result<Self> {
        if !center.x.is_finite() || !center.y.is_finite() {
            return Err(GeometryError::Projection(format!(
                "projection center ({}, {}) is not finite",
                center.x, center.y
            )));
        }
        if center.y.abs() >= 90.0 {
            return Err(GeometryError::Projection(format!(
                "projection center latitude {} is out of range",
                center.y
            )));
        }

        Ok(Self {
            center,
            lon0: center.x.to_radians(),
            lat0: center.y.to_radians(),
        })
    }

    /// Projection for an optional depot footprint; `None` without a footprint
    pub fn build(footprint: Option<&Polygon<f64>>) -> Result<Option<Self>> {
        footprint.map(Self::from_footprint).transpose()
    }

    /// Projection centered at the centroid of a geographic footprint
    pub fn from_footprint(footprint: &Polygon<f64>) -> Result<Self> {
        let rings = std::iter::once(footprint.exterior()).chain(footprint.interiors());
        for ring in rings {
            if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(GeometryError::Projection(
                    "footprint has non-finite coordinates".to_string(),
                ));
            }
        }

        let centroid = footprint.centroid().ok_or_else(|| {
            GeometryError::Projection("cannot compute the centroid of an empty footprint".into())
        })?;

        Self::new(centroid.0)
    }

    /// Geographic center of the frame (lon, lat in degrees)
    pub fn center(&self) -> Coord<f64> {
        self.center
    }

    /// Project a (lon, lat) point to local meters
    pub fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        ensure_finite_coord(coord)?;

        let phi = coord.y.to_radians();
        let dlon = coord.x.to_radians() - self.lon0;

        let b = phi.cos() * dlon.sin();
        if b.abs() >= 1.0 {
            return Err(GeometryError::Projection(format!(
                "({}, {}) is too far from the projection center",
                coord.x, coord.y
            )));
        }

        let x = EARTH_RADIUS_M * b.atanh();
        let y = EARTH_RADIUS_M * (phi.tan().atan2(dlon.cos()) - self.lat0);

        ensure_finite_coord(Coord { x, y })
    }

    /// Map a local point in meters back to (lon, lat)
    pub fn unproject(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        ensure_finite_coord(coord)?;

        let xr = coord.x / EARTH_RADIUS_M;
        let d = coord.y / EARTH_RADIUS_M + self.lat0;

        let phi = (d.sin() / xr.cosh()).asin();
        let lon = self.lon0 + xr.sinh().atan2(d.cos());

        ensure_finite_coord(Coord {
            x: lon.to_degrees(),
            y: phi.to_degrees(),
        })
    }

    /// Geographic polygon to local meters, ring by ring
    pub fn to_local(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
        map_polygon(polygon, |c| self.project(c))
    }

    /// Local polygon back to geographic coordinates, ring by ring
    pub fn to_global(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
        map_polygon(polygon, |c| self.unproject(c))
    }

    /// Symmetric-difference area between `polygon` and its projection round
    /// trip, relative to the area of `polygon`
    pub fn round_trip_deviation(&self, polygon: &Polygon<f64>) -> Result<f64> {
        let area = polygon.unsigned_area();
        if area <= 0.0 || !area.is_finite() {
            return Err(GeometryError::DegenerateGeometry(
                "round trip needs a polygon with positive area".to_string(),
            ));
        }

        let back = self.to_global(&self.to_local(polygon)?)?;
        let difference = polygon.xor(&back).unsigned_area();

        Ok(difference / area)
    }

    /// Whether the round-trip deviation of `polygon` stays below `tolerance`
    pub fn check_round_trip(&self, polygon: &Polygon<f64>, tolerance: f64) -> Result<bool> {
        Ok(self.round_trip_deviation(polygon)? < tolerance)
    }
}

fn ensure_finite_coord(coord: Coord<f64>) -> Result<Coord<f64>> {
    if coord.x.is_finite() && coord.y.is_finite() {
        Ok(coord)
    } else {
        Err(GeometryError::Projection(format!(
            "coordinate ({}, {}) is not finite",
            coord.x, coord.y
        )))
    }
}

fn map_polygon(
    polygon: &Polygon<f64>,
    f: impl Fn(Coord<f64>) -> Result<Coord<f64>>,
) -> Result<Polygon<f64>> {
    let map_ring = |ring: &LineString<f64>| -> Result<LineString<f64>> {
        let coords = ring.coords().map(|&c| f(c)).collect::<Result<Vec<_>>>()?;
        Ok(LineString::from(coords))
    };

    let exterior = map_ring(polygon.exterior())?;
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| map_ring(ring))
        .collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ring::{polygon_from_ring, polygon_with_holes};

    fn berlin_depot() -> Polygon<f64> {
        polygon_from_ring(&[
            (13.41, 52.51),
            (13.41, 52.52),
            (13.40, 52.52),
            (13.40, 52.51),
            (13.41, 52.51),
        ])
    }

    #[test]
    fn test_center_maps_to_origin() {
        let proj = LocalProjection::from_footprint(&berlin_depot()).unwrap();
        assert!((proj.center().x - 13.405).abs() < 1e-9);
        assert!((proj.center().y - 52.515).abs() < 1e-9);

        let origin = proj.project(proj.center()).unwrap();
        assert!(origin.x.abs() < 1e-6);
        assert!(origin.y.abs() < 1e-6);
    }

    #[test]
    fn test_1km_north() {
        let proj = LocalProjection::new(Coord { x: -122.4194, y: 37.7749 }).unwrap();

        // 0.009 degrees of latitude is roughly 1 km
        let p = proj
            .project(Coord {
                x: -122.4194,
                y: 37.7749 + 0.009,
            })
            .unwrap();
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 1000.0).abs() < 5.0);
    }

    #[test]
    fn test_east_is_positive_x() {
        let proj = LocalProjection::new(Coord { x: 13.405, y: 52.515 }).unwrap();
        let east = proj.project(Coord { x: 13.41, y: 52.515 }).unwrap();
        let west = proj.project(Coord { x: 13.40, y: 52.515 }).unwrap();

        assert!(east.x > 0.0);
        assert!(west.x < 0.0);
        // 0.01 degrees of longitude at 52.5°N is about 677 m
        assert!((east.x - west.x - 676.7).abs() < 2.0);
    }

    #[test]
    fn test_point_round_trip() {
        let proj = LocalProjection::new(Coord { x: 13.405, y: 52.515 }).unwrap();
        let p = Coord { x: 13.4071, y: 52.5133 };
        let back = proj.unproject(proj.project(p).unwrap()).unwrap();
        assert!((back.x - p.x).abs() < 1e-10);
        assert!((back.y - p.y).abs() < 1e-10);
    }

    #[test]
    fn test_polygon_round_trip() {
        let depot = berlin_depot();
        let proj = LocalProjection::from_footprint(&depot).unwrap();

        let deviation = proj.round_trip_deviation(&depot).unwrap();
        assert!(deviation < 0.01);
        assert!(proj.check_round_trip(&depot, 0.01).unwrap());
    }

    #[test]
    fn test_holes_are_transformed() {
        let outer = vec![(13.40, 52.51), (13.41, 52.51), (13.41, 52.52), (13.40, 52.52)];
        let hole = vec![
            (13.403, 52.513),
            (13.407, 52.513),
            (13.407, 52.517),
            (13.403, 52.517),
        ];
        let poly = polygon_with_holes(&outer, &[hole]);
        let proj = LocalProjection::from_footprint(&poly).unwrap();

        let local = proj.to_local(&poly).unwrap();
        assert_eq!(local.interiors().len(), 1);
        assert_eq!(local.interiors()[0].0.len(), 5);

        let back = proj.to_global(&local).unwrap();
        let original = poly.interiors()[0].0[1];
        let restored = back.interiors()[0].0[1];
        assert!((original.x - restored.x).abs() < 1e-10);
        assert!((original.y - restored.y).abs() < 1e-10);
    }

    #[test]
    fn test_build_without_footprint() {
        assert_eq!(LocalProjection::build(None).unwrap(), None);
        assert!(LocalProjection::build(Some(&berlin_depot())).unwrap().is_some());
    }

    #[test]
    fn test_empty_footprint() {
        let empty = polygon_from_ring(&[]);
        assert!(matches!(
            LocalProjection::from_footprint(&empty),
            Err(GeometryError::Projection(_))
        ));
    }

    #[test]
    fn test_non_finite_footprint() {
        let bad = polygon_from_ring(&[(13.40, 52.51), (f64::INFINITY, 52.51), (13.41, 52.52)]);
        assert!(matches!(
            LocalProjection::from_footprint(&bad),
            Err(GeometryError::Projection(_))
        ));
    }

    #[test]
    fn test_non_finite_point() {
        let proj = LocalProjection::new(Coord { x: 13.405, y: 52.515 }).unwrap();
        assert!(proj.project(Coord { x: f64::NAN, y: 52.0 }).is_err());
        assert!(proj.unproject(Coord { x: 0.0, y: f64::INFINITY }).is_err());
    }
}
