//! Depot plan files
//!
//! A plan is a TOML file describing one depot footprint and its areas. Each
//! area either carries a stored footprint or asks to be placed at a local
//! origin and angle. [`evaluate`] runs placement, validation and tiling for
//! every area and collects the outcome in a serializable [`PlanReport`].

use anyhow::{Context, Result};
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{LayoutConfig, SpaceOutput};
use crate::domain::{Area, AreaType, Depot, VehicleDims};
use crate::error::GeometryError;
use crate::geometry::dimensions::AreaDimensions;
use crate::geometry::placement::Placement;
use crate::geometry::ring::{Ring, polygon_from_ring, polygon_to_ring};
use crate::geometry::validation::FootprintIssue;

fn default_depot_name() -> String {
    "Depot".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanFile {
    pub depot: DepotEntry,
    #[serde(default)]
    pub areas: Vec<AreaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepotEntry {
    #[serde(default = "default_depot_name")]
    pub name: String,
    /// Geographic ring (lon, lat)
    #[serde(default)]
    pub footprint: Option<Ring>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub layout: AreaType,
    pub capacity: u32,
    #[serde(default)]
    pub row_count: Option<u32>,
    #[serde(default)]
    pub vehicle: Option<VehicleDims>,
    /// Requested corner in depot-local meters
    #[serde(default)]
    pub origin: Option<(f64, f64)>,
    #[serde(default)]
    pub angle_deg: f64,
    /// Stored geographic footprint, used when no origin is given
    #[serde(default)]
    pub footprint: Option<Ring>,
}

impl AreaEntry {
    pub fn to_area(&self) -> Area {
        Area {
            name: self.name.clone(),
            layout: self.layout,
            capacity: self.capacity,
            row_count: self.row_count,
            vehicle: self.vehicle,
            footprint: self.footprint.as_deref().map(polygon_from_ring),
        }
    }
}

impl PlanFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {:?}", path))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse plan file: {:?}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Depot with every area as stored (requested placements not applied)
    pub fn to_depot(&self) -> Depot {
        let mut depot = self.bare_depot();
        depot.areas = self.areas.iter().map(AreaEntry::to_area).collect();
        depot
    }

    fn bare_depot(&self) -> Depot {
        let mut depot = Depot::new(self.depot.name.clone());
        depot.footprint = self.depot.footprint.as_deref().map(polygon_from_ring);
        depot
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub depot_name: String,
    pub depot_valid: bool,
    pub depot_issues: Vec<FootprintIssue>,
    /// Geographic center of the local frame
    pub center: Option<(f64, f64)>,
    /// Whether the depot footprint survives a local round trip
    pub round_trip_ok: Option<bool>,
    pub areas: Vec<AreaReport>,
}

impl PlanReport {
    pub fn valid_area_count(&self) -> usize {
        self.areas.iter().filter(|a| a.valid == Some(true)).count()
    }

    pub fn failed_area_count(&self) -> usize {
        self.areas.iter().filter(|a| a.error.is_some()).count()
    }

    pub fn space_count(&self) -> usize {
        self.areas
            .iter()
            .filter_map(|a| a.spaces.as_ref())
            .map(Vec::len)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaReport {
    pub name: Option<String>,
    pub layout: AreaType,
    pub capacity: u32,
    pub dimensions: Option<AreaDimensions>,
    /// Geographic ring of the placed or stored footprint
    pub footprint: Option<Ring>,
    pub placement: Option<Placement>,
    /// `None` when the area has no footprint to check
    pub valid: Option<bool>,
    pub issues: Vec<FootprintIssue>,
    pub spaces: Option<Vec<Ring>>,
    pub error: Option<String>,
}

impl AreaReport {
    fn new(entry: &AreaEntry) -> Self {
        Self {
            name: entry.name.clone(),
            layout: entry.layout,
            capacity: entry.capacity,
            dimensions: None,
            footprint: None,
            placement: None,
            valid: None,
            issues: Vec::new(),
            spaces: None,
            error: None,
        }
    }
}

/// Place, validate and tile every area of a plan
///
/// A failing area is recorded in its own report and the remaining areas
/// are still evaluated. Only a malformed depot footprint aborts.
pub fn evaluate(plan: &PlanFile, config: &LayoutConfig, spaces: SpaceOutput) -> Result<PlanReport> {
    let depot = plan.bare_depot();

    let depot_check = depot
        .check_footprint()
        .with_context(|| format!("Invalid footprint for depot {:?}", depot.name))?;
    let projection = depot
        .local_projection()
        .with_context(|| format!("Cannot build local frame for depot {:?}", depot.name))?;

    let round_trip_ok = match (depot.footprint.as_ref(), projection) {
        (Some(footprint), Some(projection)) if depot_check.is_valid() => Some(
            projection
                .check_round_trip(footprint, config.round_trip_tolerance)
                .context("Depot footprint round trip failed")?,
        ),
        _ => None,
    };

    if !depot_check.is_valid() {
        tracing::warn!(
            "Depot {:?} footprint is invalid: {}",
            depot.name,
            depot_check.summary()
        );
    }

    let areas = plan
        .areas
        .iter()
        .map(|entry| evaluate_area(&depot, entry, config, spaces))
        .collect();

    Ok(PlanReport {
        depot_name: depot.name.clone(),
        depot_valid: depot_check.is_valid(),
        depot_issues: depot_check.issues,
        center: projection.map(|p| (p.center().x, p.center().y)),
        round_trip_ok,
        areas,
    })
}

fn evaluate_area(
    depot: &Depot,
    entry: &AreaEntry,
    config: &LayoutConfig,
    spaces: SpaceOutput,
) -> AreaReport {
    let mut report = AreaReport::new(entry);
    if let Err(e) = fill_area_report(depot, entry, config, spaces, &mut report) {
        tracing::warn!(
            "Area {:?} ({}) failed: {}",
            entry.name.as_deref().unwrap_or("<unnamed>"),
            entry.layout,
            e
        );
        report.error = Some(e.to_string());
    }
    report
}

fn fill_area_report(
    depot: &Depot,
    entry: &AreaEntry,
    config: &LayoutConfig,
    spaces: SpaceOutput,
    report: &mut AreaReport,
) -> crate::error::Result<()> {
    let mut area = entry.to_area();
    area.check_constraints()?;

    if area.vehicle.is_some() {
        report.dimensions = Some(area.dimensions(config)?);
    }

    if let Some((x, y)) = entry.origin {
        if entry.footprint.is_some() {
            return Err(GeometryError::InvalidAreaGeometry(
                "give either an origin or a footprint, not both".to_string(),
            ));
        }
        area.set_footprint_from_local(depot, Coord { x, y }, entry.angle_deg.to_radians(), config)?;
    }

    let Some(footprint) = area.footprint.as_ref() else {
        return Ok(());
    };
    report.footprint = Some(polygon_to_ring(footprint));
    report.placement = area.placement(depot)?;

    let check = depot.check_area(&area, config)?;
    report.valid = Some(check.is_valid());
    report.issues = check.issues.clone();
    if !check.is_valid() {
        return Ok(());
    }

    let Some(local) = (match spaces {
        SpaceOutput::None => None,
        SpaceOutput::Local | SpaceOutput::Global => area.parking_spaces(depot, config)?,
    }) else {
        return Ok(());
    };

    report.spaces = Some(match spaces {
        SpaceOutput::Global => {
            let projection = depot
                .local_projection()?
                .ok_or(GeometryError::MissingDepotFootprint)?;
            local
                .iter()
                .map(|space| projection.to_global(space).map(|g| polygon_to_ring(&g)))
                .collect::<crate::error::Result<Vec<_>>>()?
        }
        _ => local.iter().map(polygon_to_ring).collect(),
    });

    Ok(())
}
