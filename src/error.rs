use thiserror::Error;

use crate::domain::AreaType;

/// Errors raised by the geometry core.
///
/// Answerable validation outcomes (not a rectangle, not contained) are not
/// errors; they come back as `false` or as issues in a report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A local frame could not be built or a coordinate could not be mapped
    #[error("projection error: {0}")]
    Projection(String),

    /// Layout, capacity and row count do not fit together
    #[error("invalid area geometry: {0}")]
    InvalidAreaGeometry(String),

    #[error("depot has no footprint")]
    MissingDepotFootprint,

    #[error("area has no vehicle dimensions")]
    MissingAreaDimensions,

    /// A fixed layout parameter was changed
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{0} areas are not supported")]
    NotSupported(AreaType),

    /// NaN/infinite coordinates or zero-length edges
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
