//! Footprint validation
//!
//! Checks candidate footprints before the caller stores them:
//! - depot footprints must be simple rings with positive area, holes inside
//! - area footprints must lie inside the depot, have positive area and be
//!   true rectangles (4 vertices, right angles within a tolerance)
//!
//! "Does not fit" outcomes are reported as issues, never as errors. Only
//! malformed input (NaN/Inf coordinates, zero-length edges) is an error.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Area, Contains, Coord, Line, LineString, Polygon};
use serde::Serialize;
use std::fmt;

use crate::error::{GeometryError, Result};
use crate::geometry::ring::{dot, ensure_finite, exterior_vertices, norm};

/// A reason a footprint was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum FootprintIssue {
    /// The area has a footprint but its depot does not
    MissingDepotFootprint,
    SelfIntersecting,
    /// Interior ring `index` is not inside the outer ring
    HoleOutside { index: usize },
    NonPositiveArea { area: f64 },
    NotContained,
    VertexCount { found: usize },
    /// Largest |dot product| between adjacent unit edges
    NotRectangular { max_dot: f64 },
}

impl fmt::Display for FootprintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FootprintIssue::MissingDepotFootprint => write!(f, "depot has no footprint"),
            FootprintIssue::SelfIntersecting => write!(f, "outline crosses itself"),
            FootprintIssue::HoleOutside { index } => {
                write!(f, "hole {} is not inside the outline", index)
            }
            FootprintIssue::NonPositiveArea { area } => write!(f, "area {} is not positive", area),
            FootprintIssue::NotContained => write!(f, "not inside the depot footprint"),
            FootprintIssue::VertexCount { found } => {
                write!(f, "{} vertices instead of 4", found)
            }
            FootprintIssue::NotRectangular { max_dot } => {
                write!(f, "corners are not right angles (|dot| up to {:.4})", max_dot)
            }
        }
    }
}

/// Result of checking one footprint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FootprintReport {
    pub issues: Vec<FootprintIssue>,
}

impl FootprintReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_valid() {
            "valid".to_string()
        } else {
            self.issues
                .iter()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        }
    }
}

/// Check a depot footprint; an absent footprint has no issues
///
/// The outer ring must be simple and every hole must lie inside it.
pub fn check_depot_footprint(footprint: Option<&Polygon<f64>>) -> Result<FootprintReport> {
    let mut report = FootprintReport::default();
    let Some(footprint) = footprint else {
        return Ok(report);
    };
    ensure_finite(footprint, "depot footprint")?;

    if !is_simple(footprint.exterior()) {
        report.issues.push(FootprintIssue::SelfIntersecting);
    }

    let shell = Polygon::new(footprint.exterior().clone(), vec![]);
    for (index, hole) in footprint.interiors().iter().enumerate() {
        if !shell.contains(&Polygon::new(hole.clone(), vec![])) {
            report.issues.push(FootprintIssue::HoleOutside { index });
        }
    }

    let area = footprint.unsigned_area();
    if area <= 0.0 {
        report.issues.push(FootprintIssue::NonPositiveArea { area });
    }

    Ok(report)
}

pub fn validate_depot_footprint(footprint: Option<&Polygon<f64>>) -> Result<bool> {
    Ok(check_depot_footprint(footprint)?.is_valid())
}

/// Check an area footprint against its depot footprint
///
/// Both polygons must be in the same frame. Right angles are only
/// meaningful in a metric frame, so pass local coordinates.
pub fn check_area_footprint(
    area: Option<&Polygon<f64>>,
    depot: Option<&Polygon<f64>>,
    tolerance: f64,
) -> Result<FootprintReport> {
    let mut report = FootprintReport::default();
    let Some(area) = area else {
        return Ok(report);
    };
    ensure_finite(area, "area footprint")?;

    let Some(depot) = depot else {
        report.issues.push(FootprintIssue::MissingDepotFootprint);
        return Ok(report);
    };
    ensure_finite(depot, "depot footprint")?;

    let vertices = exterior_vertices(area);
    let max_dot = if vertices.len() == 4 {
        Some(rectangle_max_dot(&vertices)?)
    } else {
        None
    };

    if !depot.contains(area) {
        report.issues.push(FootprintIssue::NotContained);
    }

    let size = area.unsigned_area();
    if size <= 0.0 {
        report.issues.push(FootprintIssue::NonPositiveArea { area: size });
    }

    match max_dot {
        None => report.issues.push(FootprintIssue::VertexCount {
            found: vertices.len(),
        }),
        Some(max_dot) if max_dot > tolerance => {
            report.issues.push(FootprintIssue::NotRectangular { max_dot })
        }
        Some(_) => {}
    }

    Ok(report)
}

pub fn validate_area_footprint(
    area: Option<&Polygon<f64>>,
    depot: Option<&Polygon<f64>>,
    tolerance: f64,
) -> Result<bool> {
    Ok(check_area_footprint(area, depot, tolerance)?.is_valid())
}

/// Largest |dot product| of consecutive normalized edges of a closed ring
fn rectangle_max_dot(vertices: &[Coord<f64>]) -> Result<f64> {
    let n = vertices.len();
    let units = (0..n)
        .map(|i| {
            let edge = vertices[(i + 1) % n] - vertices[i];
            let length = norm(edge);
            if length > 0.0 {
                Ok(edge / length)
            } else {
                Err(GeometryError::DegenerateGeometry(format!(
                    "area footprint edge {} has zero length",
                    i
                )))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((0..n)
        .map(|i| dot(units[i], units[(i + 1) % n]).abs())
        .fold(0.0, f64::max))
}

/// Whether a closed ring has no crossing or overlapping segments
///
/// Repeated consecutive vertices are ignored.
fn is_simple(ring: &LineString<f64>) -> bool {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for &coord in ring.coords() {
        if coords.last() != Some(&coord) {
            coords.push(coord);
        }
    }
    let segments: Vec<Line<f64>> = coords.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    let n = segments.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(segments[i], segments[j]) {
                None => {}
                // neighbours meet at their shared vertex
                Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
                Some(_) => return false,
            }
        }
    }
    true
}
