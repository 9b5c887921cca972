//! depotgeom - Geometry of electric-bus depot parking areas
//!
//! Projects depot footprints into a local metric frame, sizes and places
//! rectangular parking areas, validates them against the depot and tiles
//! them into individual parking spaces.

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod plan;

pub use config::{FileConfig, LayoutConfig, SpaceOutput};
pub use domain::{Area, AreaType, Depot, VehicleDims};
pub use error::{GeometryError, Result};
pub use geometry::{AreaDimensions, FootprintReport, LocalProjection, Placement};
