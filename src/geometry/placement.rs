use geo::{Coord, Point, Polygon, Rotate};
use serde::Serialize;

use crate::config::LayoutConfig;
use crate::domain::{Area, Depot};
use crate::error::{GeometryError, Result};
use crate::geometry::dimensions::AreaDimensions;
use crate::geometry::ring::polygon_from_ring;

/// Anchor of an area footprint in the depot's local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Origin corner, meters east of the depot centroid
    pub x: f64,
    /// Origin corner, meters north of the depot centroid
    pub y: f64,
    /// Counter-clockwise rotation of the length edge, radians
    pub angle: f64,
}

impl Placement {
    /// Recover origin and angle from a local footprint built by [`local_rectangle`]
    ///
    /// The origin is the second-to-last ring coordinate; the angle is the
    /// direction from it to the closing coordinate.
    pub fn from_footprint(footprint: &Polygon<f64>) -> Option<Self> {
        let coords = &footprint.exterior().0;
        if coords.len() < 2 {
            return None;
        }
        let origin = coords[coords.len() - 2];
        let last = coords[coords.len() - 1];

        Some(Self {
            x: origin.x,
            y: origin.y,
            angle: (last.y - origin.y).atan2(last.x - origin.x),
        })
    }
}

/// Rectangle with a corner at `origin`, `length` along local X and `width`
/// along local Y, rotated counter-clockwise about `origin`
pub fn local_rectangle(origin: Coord<f64>, dims: AreaDimensions, angle_rad: f64) -> Polygon<f64> {
    let Coord { x, y } = origin;
    let AreaDimensions { length, width } = dims;

    let unrotated = polygon_from_ring(&[
        (x + length, y),
        (x + length, y + width),
        (x, y + width),
        (x, y),
        (x + length, y),
    ]);

    unrotated.rotate_around_point(angle_rad.to_degrees(), Point::from(origin))
}

/// Footprint for `area` placed at a local `origin` and angle, in geographic
/// coordinates
///
/// Nothing is stored and nothing is validated; callers run the validator
/// before keeping the polygon.
pub fn place(
    area: &Area,
    depot: &Depot,
    origin: Coord<f64>,
    angle_rad: f64,
    config: &LayoutConfig,
) -> Result<Polygon<f64>> {
    let projection = depot
        .local_projection()?
        .ok_or(GeometryError::MissingDepotFootprint)?;
    let dims = area.dimensions(config)?;

    if !origin.x.is_finite() || !origin.y.is_finite() || !angle_rad.is_finite() {
        return Err(GeometryError::DegenerateGeometry(format!(
            "placement ({}, {}) at {} rad is not finite",
            origin.x, origin.y, angle_rad
        )));
    }

    let local = local_rectangle(origin, dims, angle_rad);
    let global = projection.to_global(&local)?;

    tracing::debug!(
        "Placed {} area {:?} at ({:.1}, {:.1}) rotated {:.1}°",
        area.layout,
        area.name.as_deref().unwrap_or("<unnamed>"),
        origin.x,
        origin.y,
        angle_rad.to_degrees()
    );

    Ok(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AreaType, VehicleDims};
    use crate::geometry::ring::exterior_vertices;
    use geo::Area as _;
    use std::f64::consts::FRAC_PI_4;

    fn dims() -> AreaDimensions {
        AreaDimensions {
            length: 75.0,
            width: 3.0,
        }
    }

    fn berlin_depot() -> Depot {
        Depot::new("Geo Depot").with_footprint(polygon_from_ring(&[
            (13.41, 52.51),
            (13.41, 52.52),
            (13.40, 52.52),
            (13.40, 52.51),
        ]))
    }

    fn line_area() -> Area {
        Area::new(AreaType::Line, 6)
            .with_row_count(1)
            .with_vehicle(VehicleDims::new(12.0, 2.5))
    }

    #[test]
    fn test_axis_aligned_rectangle() {
        let rect = local_rectangle(Coord { x: 10.0, y: 20.0 }, dims(), 0.0);
        let v = exterior_vertices(&rect);

        assert_eq!(v.len(), 4);
        assert!((v[0].x - 85.0).abs() < 1e-9 && (v[0].y - 20.0).abs() < 1e-9);
        assert!((v[2].x - 10.0).abs() < 1e-9 && (v[2].y - 23.0).abs() < 1e-9);
        assert!((rect.unsigned_area() - 225.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_is_counter_clockwise() {
        let origin = Coord { x: 0.0, y: 0.0 };
        let rect = local_rectangle(origin, dims(), std::f64::consts::FRAC_PI_2);
        let v = exterior_vertices(&rect);

        // the length edge now points north
        assert!(v[0].x.abs() < 1e-9);
        assert!((v[0].y - 75.0).abs() < 1e-9);
        assert!((v[3].x).abs() < 1e-9 && (v[3].y).abs() < 1e-9);
    }

    #[test]
    fn test_placement_recovered() {
        let origin = Coord { x: -12.5, y: 40.0 };
        let rect = local_rectangle(origin, dims(), FRAC_PI_4);
        let placement = Placement::from_footprint(&rect).unwrap();

        assert!((placement.x - origin.x).abs() < 1e-9);
        assert!((placement.y - origin.y).abs() < 1e-9);
        assert!((placement.angle - FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn test_place_round_trips_through_depot_frame() {
        let depot = berlin_depot();
        let config = LayoutConfig::default();
        let origin = Coord { x: -200.0, y: -300.0 };

        let global = place(&line_area(), &depot, origin, 0.3, &config).unwrap();
        // geographic coordinates, not meters
        assert!(global.exterior().coords().all(|c| c.x > 13.39 && c.x < 13.42));

        let local = depot.local_projection().unwrap().unwrap().to_local(&global).unwrap();
        assert!((local.unsigned_area() - 225.0).abs() < 0.01);

        let placement = Placement::from_footprint(&local).unwrap();
        assert!((placement.x - origin.x).abs() < 1e-6);
        assert!((placement.y - origin.y).abs() < 1e-6);
        assert!((placement.angle - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_place_needs_depot_footprint() {
        let depot = Depot::new("No footprint");
        let result = place(
            &line_area(),
            &depot,
            Coord { x: 0.0, y: 0.0 },
            0.0,
            &LayoutConfig::default(),
        );
        assert_eq!(result, Err(GeometryError::MissingDepotFootprint));
    }

    #[test]
    fn test_place_needs_vehicle() {
        let area = Area::new(AreaType::Line, 6).with_row_count(1);
        let result = place(
            &area,
            &berlin_depot(),
            Coord { x: 0.0, y: 0.0 },
            0.0,
            &LayoutConfig::default(),
        );
        assert_eq!(result, Err(GeometryError::MissingAreaDimensions));
    }

    #[test]
    fn test_place_direct_twoside() {
        let area = Area::new(AreaType::DirectTwoside, 10).with_vehicle(VehicleDims::new(12.0, 2.5));
        let result = place(
            &area,
            &berlin_depot(),
            Coord { x: 0.0, y: 0.0 },
            0.0,
            &LayoutConfig::default(),
        );
        assert_eq!(result, Err(GeometryError::NotSupported(AreaType::DirectTwoside)));
    }
}
