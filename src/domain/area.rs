use geo::{Coord, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::LayoutConfig;
use crate::domain::{Depot, VehicleDims};
use crate::error::{GeometryError, Result};
use crate::geometry::dimensions::{AreaDimensions, area_dimensions, check_layout};
use crate::geometry::placement::{Placement, place};
use crate::geometry::tiling::tile;

/// Parking layout of an area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaType {
    /// Vehicles end to end in one or more parallel rows (first in, first out)
    Line,
    /// 45° herringbone spaces reachable from one side
    DirectOneside,
    /// Herringbone spaces reachable from both sides
    DirectTwoside,
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AreaType::Line => "LINE",
            AreaType::DirectOneside => "DIRECT_ONESIDE",
            AreaType::DirectTwoside => "DIRECT_TWOSIDE",
        };
        f.write_str(name)
    }
}

/// A parking area of a depot
///
/// The footprint, when present, is stored in geographic coordinates
/// (lon, lat) exactly as the persistence layer hands it over.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub name: Option<String>,
    pub layout: AreaType,
    pub capacity: u32,
    /// Number of side-by-side rows; LINE areas only
    pub row_count: Option<u32>,
    pub vehicle: Option<VehicleDims>,
    pub footprint: Option<Polygon<f64>>,
}

impl Area {
    pub fn new(layout: AreaType, capacity: u32) -> Self {
        Self {
            name: None,
            layout,
            capacity,
            row_count: None,
            vehicle: None,
            footprint: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_row_count(mut self, row_count: u32) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_vehicle(mut self, vehicle: VehicleDims) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn with_footprint(mut self, footprint: Polygon<f64>) -> Self {
        self.footprint = Some(footprint);
        self
    }

    /// Check the capacity/row count rules of the layout
    pub fn check_constraints(&self) -> Result<()> {
        check_layout(self.layout, self.capacity, self.row_count)
    }

    /// Minimum rectangle this area needs
    pub fn dimensions(&self, config: &LayoutConfig) -> Result<AreaDimensions> {
        let vehicle = self.vehicle.as_ref().ok_or(GeometryError::MissingAreaDimensions)?;
        area_dimensions(self.layout, self.capacity, self.row_count, vehicle, config)
    }

    /// Stored footprint in the depot's local frame
    pub fn footprint_local(&self, depot: &Depot) -> Result<Option<Polygon<f64>>> {
        let Some(footprint) = self.footprint.as_ref() else {
            return Ok(None);
        };
        match depot.local_projection()? {
            Some(projection) => projection.to_local(footprint).map(Some),
            None => Ok(None),
        }
    }

    /// Origin and angle the stored footprint was placed with
    pub fn placement(&self, depot: &Depot) -> Result<Option<Placement>> {
        Ok(self
            .footprint_local(depot)?
            .as_ref()
            .and_then(Placement::from_footprint))
    }

    /// Place the area at a local origin and angle and keep the result
    ///
    /// The new footprint is not validated; see [`Depot::validate_area`].
    pub fn set_footprint_from_local(
        &mut self,
        depot: &Depot,
        origin: Coord<f64>,
        angle_rad: f64,
        config: &LayoutConfig,
    ) -> Result<()> {
        let footprint = place(self, depot, origin, angle_rad, config)?;
        self.footprint = Some(footprint);
        Ok(())
    }

    /// Parking spaces inside the stored footprint, in the depot's local frame
    ///
    /// `None` when the area has no footprint, the depot has no footprint, or
    /// the vehicle is unknown.
    pub fn parking_spaces(
        &self,
        depot: &Depot,
        config: &LayoutConfig,
    ) -> Result<Option<Vec<Polygon<f64>>>> {
        let Some(footprint) = self.footprint_local(depot)? else {
            return Ok(None);
        };
        tile(
            &footprint,
            self.layout,
            self.capacity,
            self.row_count,
            self.vehicle.as_ref(),
            config,
        )
    }
}
