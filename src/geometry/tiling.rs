//! Individual parking spaces inside an area footprint.
//!
//! Works in the depot's local frame on a 4-vertex footprint. The two edges
//! leaving the first vertex span the area; which of them is the "length"
//! edge is decided per layout, since a stored rectangle carries no axis
//! metadata.

use geo::{Coord, LineString, Polygon};

use crate::config::LayoutConfig;
use crate::domain::{AreaType, VehicleDims};
use crate::error::{GeometryError, Result};
use crate::geometry::dimensions::{AreaDimensions, area_dimensions, stagger, vehicles_per_row};
use crate::geometry::ring::{ensure_finite, exterior_vertices, norm};

/// Which footprint edge the rows of a LINE area run along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAxis {
    /// Edge from vertex 0 to vertex 1
    First,
    /// Edge from vertex 0 to vertex 3
    Second,
}

/// Pick the row axis from the edge lengths, using the area's semantic
/// dimensions when they are known
pub fn assign_axes(len1: f64, len2: f64, semantic: Option<AreaDimensions>) -> RowAxis {
    match semantic {
        Some(dims) => assign_axes_by_ratio(len1, len2, dims),
        None => assign_axes_by_length(len1, len2),
    }
}

/// Row axis whose edge ratio is closest to the area's length/width ratio
pub fn assign_axes_by_ratio(len1: f64, len2: f64, dims: AreaDimensions) -> RowAxis {
    let ratio1 = len1 / len2;
    let ratio2 = len2 / len1;
    let area_ratio = dims.aspect_ratio();

    if (ratio1 - area_ratio).abs() < (ratio2 - area_ratio).abs() {
        RowAxis::First
    } else {
        RowAxis::Second
    }
}

/// Longer edge is the row axis
pub fn assign_axes_by_length(len1: f64, len2: f64) -> RowAxis {
    if len1 > len2 {
        RowAxis::First
    } else {
        RowAxis::Second
    }
}

/// First vertex and the two unit edges leaving it
#[derive(Debug, Clone, Copy)]
struct EdgeFrame {
    origin: Coord<f64>,
    unit1: Coord<f64>,
    unit2: Coord<f64>,
    len1: f64,
    len2: f64,
}

impl EdgeFrame {
    fn from_footprint(footprint: &Polygon<f64>) -> Result<Self> {
        ensure_finite(footprint, "area footprint")?;

        let vertices = exterior_vertices(footprint);
        if vertices.len() != 4 {
            return Err(GeometryError::DegenerateGeometry(format!(
                "area footprint needs 4 vertices, found {}",
                vertices.len()
            )));
        }

        let vec1 = vertices[1] - vertices[0];
        let vec2 = vertices[3] - vertices[0];
        let len1 = norm(vec1);
        let len2 = norm(vec2);
        if len1 <= 0.0 || len2 <= 0.0 {
            return Err(GeometryError::DegenerateGeometry(
                "area footprint has a zero-length edge".to_string(),
            ));
        }

        Ok(Self {
            origin: vertices[0],
            unit1: vec1 / len1,
            unit2: vec2 / len2,
            len1,
            len2,
        })
    }

    /// (longer, shorter) unit edges
    fn by_length(&self) -> (Coord<f64>, Coord<f64>) {
        match assign_axes_by_length(self.len1, self.len2) {
            RowAxis::First => (self.unit1, self.unit2),
            RowAxis::Second => (self.unit2, self.unit1),
        }
    }
}

fn quad(p1: Coord<f64>, p2: Coord<f64>, p3: Coord<f64>, p4: Coord<f64>) -> Polygon<f64> {
    Polygon::new(LineString::from(vec![p1, p2, p3, p4]), vec![])
}

/// Parking space polygons inside a local-frame area footprint
///
/// Returns `Ok(None)` when the vehicle is unknown. For LINE and
/// DIRECT_ONESIDE areas the result holds exactly `capacity` spaces.
pub fn tile(
    footprint: &Polygon<f64>,
    layout: AreaType,
    capacity: u32,
    row_count: Option<u32>,
    vehicle: Option<&VehicleDims>,
    config: &LayoutConfig,
) -> Result<Option<Vec<Polygon<f64>>>> {
    let Some(vehicle) = vehicle else {
        return Ok(None);
    };

    let spaces = match layout {
        AreaType::Line => {
            let frame = EdgeFrame::from_footprint(footprint)?;
            let dims = area_dimensions(layout, capacity, row_count, vehicle, config)?;
            tile_line(&frame, capacity, row_count, vehicle, dims, config)?
        }
        AreaType::DirectOneside => {
            let frame = EdgeFrame::from_footprint(footprint)?;
            area_dimensions(layout, capacity, row_count, vehicle, config)?;
            tile_direct_oneside(&frame, capacity, vehicle, config)
        }
        AreaType::DirectTwoside => return Err(GeometryError::NotSupported(layout)),
    };

    tracing::debug!("Generated {} {} parking spaces", spaces.len(), layout);

    Ok(Some(spaces))
}

fn tile_line(
    frame: &EdgeFrame,
    capacity: u32,
    row_count: Option<u32>,
    vehicle: &VehicleDims,
    dims: AreaDimensions,
    config: &LayoutConfig,
) -> Result<Vec<Polygon<f64>>> {
    let per_row = vehicles_per_row(capacity, row_count)?;
    let rows = capacity / per_row;
    let spacing = config.spacing;

    let axis = assign_axes(frame.len1, frame.len2, Some(dims));
    let (row_vec, col_vec) = match axis {
        RowAxis::First => (frame.unit1, frame.unit2),
        RowAxis::Second => (frame.unit2, frame.unit1),
    };
    tracing::debug!("LINE rows run along the {:?} edge", axis);

    let mut spaces = Vec::with_capacity(capacity as usize);
    for row in 0..rows {
        for col in 0..per_row {
            // half spacing in front of the first vehicle and beside the first row
            let offset_x = col as f64 * (vehicle.length + spacing) + spacing / 2.0;
            let offset_y = row as f64 * (vehicle.width + spacing) + spacing / 2.0;

            let p1 = frame.origin + row_vec * offset_x + col_vec * offset_y;
            let p2 = p1 + row_vec * vehicle.length;
            let p3 = p2 + col_vec * vehicle.width;
            let p4 = p1 + col_vec * vehicle.width;

            spaces.push(quad(p1, p2, p3, p4));
        }
    }

    Ok(spaces)
}

fn tile_direct_oneside(
    frame: &EdgeFrame,
    capacity: u32,
    vehicle: &VehicleDims,
    config: &LayoutConfig,
) -> Vec<Polygon<f64>> {
    let (baseline, perp) = frame.by_length();
    let (sin, cos) = config.park_angle().sin_cos();
    let spacing = config.spacing;
    let stagger = stagger(vehicle, config);

    // keeps the rotated width corner inside the footprint
    let offset_from_corner = vehicle.width * cos;
    let start = frame.origin
        + perp * (offset_from_corner + sin * spacing)
        + baseline * (spacing / 2.0);

    let across = baseline * (vehicle.width * cos) - perp * (vehicle.width * sin);
    let along = baseline * (vehicle.length * sin) + perp * (vehicle.length * cos);

    (0..capacity)
        .map(|i| {
            let p1 = start + baseline * (i as f64 * stagger);
            let p2 = p1 + across;
            let p3 = p2 + along;
            let p4 = p1 + along;
            quad(p1, p2, p3, p4)
        })
        .collect()
}
