use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;
use std::path::{Path, PathBuf};

/// Gap between parked vehicles in meters
pub const SPACING: f64 = 0.5;

/// Herringbone angle for DIRECT_ONESIDE areas, in radians (45°).
/// The sizing and tiling formulas are only derived for this angle.
pub const PARK_ANGLE: f64 = FRAC_PI_4;

/// Largest |dot product| of adjacent unit edges still accepted as a right angle
pub const RECTANGLE_TOLERANCE: f64 = 0.01;

/// Largest symmetric-difference area ratio accepted for a projection round trip
pub const ROUND_TRIP_TOLERANCE: f64 = 0.01;

/// Two angles closer than this (radians) are considered equal
const ANGLE_EPSILON: f64 = 1e-9;

fn default_spacing() -> f64 {
    SPACING
}
fn default_park_angle_deg() -> f64 {
    PARK_ANGLE.to_degrees()
}
fn default_rectangle_tolerance() -> f64 {
    RECTANGLE_TOLERANCE
}
fn default_round_trip_tolerance() -> f64 {
    ROUND_TRIP_TOLERANCE
}

/// Layout constants threaded through every sizing, tiling and validation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between vehicles in meters
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Herringbone angle in degrees
    #[serde(default = "default_park_angle_deg")]
    pub park_angle_deg: f64,
    #[serde(default = "default_rectangle_tolerance")]
    pub rectangle_tolerance: f64,
    #[serde(default = "default_round_trip_tolerance")]
    pub round_trip_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            park_angle_deg: default_park_angle_deg(),
            rectangle_tolerance: default_rectangle_tolerance(),
            round_trip_tolerance: default_round_trip_tolerance(),
        }
    }
}

impl LayoutConfig {
    /// Herringbone angle in radians
    pub fn park_angle(&self) -> f64 {
        self.park_angle_deg.to_radians()
    }

    /// Whether the configured angle is the one the herringbone formulas support
    pub fn has_fixed_park_angle(&self) -> bool {
        (self.park_angle() - PARK_ANGLE).abs() < ANGLE_EPSILON
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_park_angle_deg(mut self, degrees: f64) -> Self {
        self.park_angle_deg = degrees;
        self
    }

    pub fn with_rectangle_tolerance(mut self, tolerance: f64) -> Self {
        self.rectangle_tolerance = tolerance;
        self
    }
}

/// Which frame parking spaces are reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpaceOutput {
    /// Depot-local meters
    #[default]
    Local,
    /// Longitude/latitude degrees
    Global,
    /// Skip parking space generation
    None,
}

fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub spaces: SpaceOutput,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl FileConfig {
    /// Load the first config file found on the search path
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("depotgeom.toml"));
    paths.push(PathBuf::from(".depotgeom.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("depotgeom").join("config.toml"));
        paths.push(config_dir.join("depotgeom.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".depotgeom.toml"));
    }

    paths
}
