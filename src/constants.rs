//! # Constants and type definitions for Orrery
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the `orrery` library.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, J2000 epoch)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU/day ↔ km/s)
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// 1 AU/day expressed in km/s (≈ 1731.457 km/s)
pub const AU_DAY_TO_KM_S: f64 = AU / SECONDS_PER_DAY;

/// Julian Date of the J2000.0 epoch (2000 Jan 1.5 TT)
pub const J2000_JD: f64 = 2_451_545.0;

/// Number of days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// First day covered by the Horizons trajectory of Voyager 1.
///
/// The probe launched on 1977-09-05 at 12:56 UTC; midnight TDB of that day
/// precedes the start of the trajectory file.
pub const VOYAGER1_LAUNCH: &str = "1977-09-06";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Julian Date (days)
pub type JulianDate = f64;
/// Julian centuries since J2000.0
pub type JulianCentury = f64;

/// Normalize an angle in degrees to `[0, 360)`.
#[inline]
pub fn mod360(x: Degree) -> Degree {
    let r = x.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_mod360() {
        assert_eq!(mod360(0.0), 0.0);
        assert_eq!(mod360(360.0), 0.0);
        assert_eq!(mod360(-90.0), 270.0);
        assert_eq!(mod360(725.0), 5.0);
        assert!(mod360(-1e-15) < 360.0);
    }

    #[test]
    fn test_au_day_to_km_s() {
        assert!((AU_DAY_TO_KM_S - 1731.456836805555).abs() < 1e-9);
    }
}
