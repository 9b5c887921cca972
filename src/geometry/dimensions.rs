//! Minimum rectangle an area needs for its layout.
//!
//! LINE areas are `vehicles_per_row` vehicles long and `row_count` vehicles
//! wide, each vehicle padded by the spacing. DIRECT_ONESIDE areas are a row
//! of 45° herringbone spaces: consecutive spaces are one `stagger` apart
//! along the baseline, and the depth is the rotated vehicle's projection
//! onto the perpendicular.

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::domain::{AreaType, VehicleDims};
use crate::error::{GeometryError, Result};

/// Length and width of an area rectangle in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaDimensions {
    /// Along the access side
    pub length: f64,
    pub width: f64,
}

impl AreaDimensions {
    pub fn aspect_ratio(&self) -> f64 {
        self.length / self.width
    }
}

/// Check the capacity/row count rules of a layout
pub fn check_layout(layout: AreaType, capacity: u32, row_count: Option<u32>) -> Result<()> {
    if capacity == 0 {
        return Err(GeometryError::InvalidAreaGeometry(
            "capacity must be positive".to_string(),
        ));
    }

    match layout {
        AreaType::Line => vehicles_per_row(capacity, row_count).map(|_| ()),
        AreaType::DirectOneside => no_row_count(layout, row_count),
        AreaType::DirectTwoside => {
            no_row_count(layout, row_count)?;
            if capacity % 2 != 0 {
                return Err(GeometryError::InvalidAreaGeometry(format!(
                    "{} capacity {} must be even",
                    layout, capacity
                )));
            }
            Ok(())
        }
    }
}

fn no_row_count(layout: AreaType, row_count: Option<u32>) -> Result<()> {
    match row_count {
        Some(rows) => Err(GeometryError::InvalidAreaGeometry(format!(
            "{} areas take no row count (got {})",
            layout, rows
        ))),
        None => Ok(()),
    }
}

/// Vehicles in each row of a LINE area
pub fn vehicles_per_row(capacity: u32, row_count: Option<u32>) -> Result<u32> {
    let rows = row_count.ok_or_else(|| {
        GeometryError::InvalidAreaGeometry("LINE areas need a row count".to_string())
    })?;
    if rows == 0 {
        return Err(GeometryError::InvalidAreaGeometry(
            "row count must be positive".to_string(),
        ));
    }
    if capacity % rows != 0 {
        return Err(GeometryError::InvalidAreaGeometry(format!(
            "capacity {} is not divisible by row count {}",
            capacity, rows
        )));
    }
    Ok(capacity / rows)
}

pub fn check_vehicle(vehicle: &VehicleDims) -> Result<()> {
    if vehicle.is_valid() {
        Ok(())
    } else {
        Err(GeometryError::InvalidAreaGeometry(format!(
            "vehicle dimensions {} x {} must be positive",
            vehicle.length, vehicle.width
        )))
    }
}

/// Fail unless the configured herringbone angle is the supported 45°
pub fn check_park_angle(config: &LayoutConfig) -> Result<()> {
    if config.has_fixed_park_angle() {
        Ok(())
    } else {
        Err(GeometryError::InvalidConfiguration(format!(
            "herringbone layouts are only defined for 45°, not {}°",
            config.park_angle_deg
        )))
    }
}

fn check_spacing(config: &LayoutConfig) -> Result<()> {
    if config.spacing.is_finite() && config.spacing >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidConfiguration(format!(
            "spacing {} must be a non-negative distance",
            config.spacing
        )))
    }
}

/// Distance between consecutive herringbone spaces along the baseline
pub fn stagger(vehicle: &VehicleDims, config: &LayoutConfig) -> f64 {
    2.0 * vehicle.width * config.park_angle().cos() + config.spacing
}

/// Minimum rectangle for `capacity` vehicles under `layout`
pub fn area_dimensions(
    layout: AreaType,
    capacity: u32,
    row_count: Option<u32>,
    vehicle: &VehicleDims,
    config: &LayoutConfig,
) -> Result<AreaDimensions> {
    if layout == AreaType::DirectTwoside {
        return Err(GeometryError::NotSupported(layout));
    }
    check_layout(layout, capacity, row_count)?;
    check_vehicle(vehicle)?;
    check_spacing(config)?;

    let spacing = config.spacing;
    let dims = match layout {
        AreaType::Line => {
            let per_row = vehicles_per_row(capacity, row_count)?;
            let rows = row_count.unwrap_or(1);
            AreaDimensions {
                length: per_row as f64 * (spacing + vehicle.length),
                width: rows as f64 * (vehicle.width + spacing),
            }
        }
        AreaType::DirectOneside => {
            check_park_angle(config)?;
            let (sin, cos) = config.park_angle().sin_cos();
            AreaDimensions {
                length: (capacity as f64 - 0.5) * stagger(vehicle, config)
                    + spacing
                    + sin * vehicle.length,
                width: vehicle.length * cos + vehicle.width * sin + spacing,
            }
        }
        AreaType::DirectTwoside => return Err(GeometryError::NotSupported(layout)),
    };

    tracing::debug!(
        "{} area for {} vehicles: {:.2}m x {:.2}m",
        layout,
        capacity,
        dims.length,
        dims.width
    );

    Ok(dims)
}
