use serde::{Deserialize, Serialize};

/// Footprint of the vehicle type an area is sized for, in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleDims {
    pub length: f64,
    pub width: f64,
}

impl VehicleDims {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    /// Ground area covered by one vehicle
    pub fn footprint_area(&self) -> f64 {
        self.length * self.width
    }

    pub fn is_valid(&self) -> bool {
        self.length.is_finite() && self.width.is_finite() && self.length > 0.0 && self.width > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_validity() {
        assert!(VehicleDims::new(12.0, 2.5).is_valid());
        assert!(!VehicleDims::new(0.0, 2.5).is_valid());
        assert!(!VehicleDims::new(12.0, -1.0).is_valid());
        assert!(!VehicleDims::new(f64::NAN, 2.5).is_valid());
    }

    #[test]
    fn test_footprint_area() {
        assert!((VehicleDims::new(12.0, 2.5).footprint_area() - 30.0).abs() < 1e-12);
    }
}
