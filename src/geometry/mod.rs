pub mod dimensions;
pub mod placement;
pub mod projection;
pub mod ring;
pub mod tiling;
pub mod validation;

pub use dimensions::{AreaDimensions, area_dimensions};
pub use placement::{Placement, local_rectangle, place};
pub use projection::LocalProjection;
pub use ring::{Ring, polygon_from_ring, polygon_to_ring};
pub use tiling::{RowAxis, assign_axes, tile};
pub use validation::{
    FootprintIssue, FootprintReport, check_area_footprint, check_depot_footprint,
    validate_area_footprint, validate_depot_footprint,
};
