use geo::Polygon;

use crate::config::LayoutConfig;
use crate::domain::Area;
use crate::error::Result;
use crate::geometry::projection::LocalProjection;
use crate::geometry::ring::ensure_finite;
use crate::geometry::validation::{FootprintReport, check_area_footprint, check_depot_footprint};

/// A depot and its parking areas
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Depot {
    pub name: String,
    /// Ground outline in geographic coordinates (lon, lat)
    pub footprint: Option<Polygon<f64>>,
    pub areas: Vec<Area>,
}

impl Depot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_footprint(mut self, footprint: Polygon<f64>) -> Self {
        self.footprint = Some(footprint);
        self
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.areas.push(area);
        self
    }

    /// Local metric frame centered on the current footprint
    ///
    /// Built from scratch on every call so it always follows the footprint.
    pub fn local_projection(&self) -> Result<Option<LocalProjection>> {
        LocalProjection::build(self.footprint.as_ref())
    }

    /// Footprint in the depot's own local frame
    pub fn footprint_local(&self) -> Result<Option<Polygon<f64>>> {
        match (self.footprint.as_ref(), self.local_projection()?) {
            (Some(footprint), Some(projection)) => projection.to_local(footprint).map(Some),
            _ => Ok(None),
        }
    }

    /// Issues with the depot footprint (none when absent)
    pub fn check_footprint(&self) -> Result<FootprintReport> {
        check_depot_footprint(self.footprint.as_ref())
    }

    pub fn validate_footprint(&self) -> Result<bool> {
        Ok(self.check_footprint()?.is_valid())
    }

    /// Issues with an area footprint, checked in this depot's local frame
    pub fn check_area(&self, area: &Area, config: &LayoutConfig) -> Result<FootprintReport> {
        let Some(area_footprint) = area.footprint.as_ref() else {
            return Ok(FootprintReport::default());
        };
        ensure_finite(area_footprint, "area footprint")?;

        match (self.footprint.as_ref(), self.local_projection()?) {
            (Some(depot_footprint), Some(projection)) => {
                let area_local = projection.to_local(area_footprint)?;
                let depot_local = projection.to_local(depot_footprint)?;
                check_area_footprint(
                    Some(&area_local),
                    Some(&depot_local),
                    config.rectangle_tolerance,
                )
            }
            _ => check_area_footprint(Some(area_footprint), None, config.rectangle_tolerance),
        }
    }

    pub fn validate_area(&self, area: &Area, config: &LayoutConfig) -> Result<bool> {
        Ok(self.check_area(area, config)?.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AreaType, VehicleDims};
    use crate::geometry::ring::polygon_from_ring;
    use geo::Coord;

    fn berlin_depot() -> Depot {
        Depot::new("Geo Depot").with_footprint(polygon_from_ring(&[
            (13.41, 52.51),
            (13.41, 52.52),
            (13.40, 52.52),
            (13.40, 52.51),
        ]))
    }

    #[test]
    fn test_projection_follows_footprint() {
        let mut depot = berlin_depot();
        let before = depot.local_projection().unwrap().unwrap();

        depot.footprint = Some(polygon_from_ring(&[
            (13.50, 52.51),
            (13.51, 52.51),
            (13.51, 52.52),
            (13.50, 52.52),
        ]));
        let after = depot.local_projection().unwrap().unwrap();

        assert!((before.center().x - 13.405).abs() < 1e-9);
        assert!((after.center().x - 13.505).abs() < 1e-9);

        depot.footprint = None;
        assert!(depot.local_projection().unwrap().is_none());
        assert!(depot.footprint_local().unwrap().is_none());
    }

    #[test]
    fn test_depot_footprint_validation() {
        assert!(berlin_depot().validate_footprint().unwrap());
        assert!(Depot::new("No footprint").validate_footprint().unwrap());

        let bow_tie = Depot::new("Bow tie").with_footprint(polygon_from_ring(&[
            (13.40, 52.51),
            (13.41, 52.52),
            (13.41, 52.51),
            (13.40, 52.52),
        ]));
        assert!(!bow_tie.validate_footprint().unwrap());
    }

    #[test]
    fn test_validate_placed_area() {
        let depot = berlin_depot();
        let config = LayoutConfig::default();
        let mut area = Area::new(AreaType::Line, 36)
            .with_row_count(6)
            .with_vehicle(VehicleDims::new(12.0, 2.5));

        assert!(depot.validate_area(&area, &config).unwrap());

        area.set_footprint_from_local(&depot, Coord { x: -100.0, y: -100.0 }, 0.5, &config)
            .unwrap();
        assert!(depot.validate_area(&area, &config).unwrap());
    }

    #[test]
    fn test_rectangle_tolerance_from_config() {
        let depot = berlin_depot();
        let projection = depot.local_projection().unwrap().unwrap();
        let skewed = polygon_from_ring(&[(0.0, 0.0), (40.0, 0.0), (43.0, 10.0), (3.0, 10.0)]);
        let area = Area::new(AreaType::Line, 2)
            .with_row_count(1)
            .with_footprint(projection.to_global(&skewed).unwrap());

        let strict = LayoutConfig::default();
        assert!(!depot.validate_area(&area, &strict).unwrap());

        let loose = strict.with_rectangle_tolerance(0.5);
        assert!(depot.validate_area(&area, &loose).unwrap());
    }

    #[test]
    fn test_area_without_depot_footprint() {
        let depot = Depot::new("No footprint");
        let area = Area::new(AreaType::Line, 2)
            .with_row_count(1)
            .with_footprint(polygon_from_ring(&[
                (13.401, 52.511),
                (13.402, 52.511),
                (13.402, 52.512),
                (13.401, 52.512),
            ]));

        assert!(!depot.validate_area(&area, &LayoutConfig::default()).unwrap());
    }
}
