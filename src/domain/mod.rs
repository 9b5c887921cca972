pub mod area;
pub mod depot;
pub mod vehicle;

pub use area::{Area, AreaType};
pub use depot::Depot;
pub use vehicle::VehicleDims;
