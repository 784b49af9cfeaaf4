//! Conversion between Esri map scale denominators and map resolution.

use serde::{Deserialize, Serialize};

/// Number of inches in a meter, as used by Esri for scale computations.
pub const INCHES_PER_METER: f64 = 39.37;

/// Screen dots per inch assuming the OGC standard pixel size of 0.28 mm.
pub const DOTS_PER_INCH: f64 = 25.4 / 0.28;

/// Linear unit of the target map projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LinearUnit {
    /// Meters (e.g. Web Mercator).
    Meters,
    /// International feet.
    Feet,
    /// US survey feet.
    UsFeet,
    /// Degrees of a geographic CRS, measured along the equator of the authalic sphere.
    Degrees,
    /// Any other unit given as number of meters in one unit.
    Custom(f64),
}

impl LinearUnit {
    /// Number of meters in one unit.
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            LinearUnit::Meters => 1.0,
            LinearUnit::Feet => 0.3048,
            LinearUnit::UsFeet => 1200.0 / 3937.0,
            LinearUnit::Degrees => 2.0 * std::f64::consts::PI * 6_370_997.0 / 360.0,
            LinearUnit::Custom(v) => *v,
        }
    }
}

/// Converts scale denominator into map resolution (map units per pixel).
///
/// If the projection unit is unknown (`None`), the scale is converted as if the unit was one meter.
///
/// A scale of `0` has the meaning of "no limit" in Esri documents; this function does not treat it specially and
/// the callers must substitute an appropriate bound before calling it.
pub fn scale_to_resolution(scale: f64, meters_per_unit: Option<f64>) -> f64 {
    let meters_per_unit = meters_per_unit.unwrap_or(1.0);
    scale / (meters_per_unit * INCHES_PER_METER * DOTS_PER_INCH)
}

/// Inclusive range of map resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionRange {
    /// Smallest resolution (most zoomed in).
    pub min: f64,
    /// Largest resolution (most zoomed out).
    pub max: f64,
}

impl ResolutionRange {
    /// Range that contains every resolution.
    pub const UNBOUNDED: ResolutionRange = ResolutionRange {
        min: 0.0,
        max: f64::INFINITY,
    };

    /// Creates a range from the scale bounds. `min_scale` is the smaller scale denominator (zoomed in end).
    ///
    /// A scale of `0` for any of the bounds means that the range is not limited on that side.
    pub fn from_scales(min_scale: f64, max_scale: f64, meters_per_unit: Option<f64>) -> Self {
        let min = if min_scale > 0.0 {
            scale_to_resolution(min_scale, meters_per_unit)
        } else {
            0.0
        };
        let max = if max_scale > 0.0 {
            scale_to_resolution(max_scale, meters_per_unit)
        } else {
            f64::INFINITY
        };

        Self { min, max }
    }

    /// Returns true if the resolution is inside of the range, bounds included.
    pub fn contains(&self, resolution: f64) -> bool {
        self.min <= resolution && resolution <= self.max
    }
}
