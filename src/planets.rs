//! # Approximate heliocentric planet positions
//!
//! Keplerian orbital elements for the eight major planets and the routine that turns them into
//! a **true** heliocentric ecliptic longitude for a calendar date.
//!
//! Source of the elements: JPL *Keplerian Elements for Approximate Positions of the Major
//! Planets*, Table 1 (valid 1800–2050 AD). Expected accuracy is about 0.5–2° for the inner
//! planets and 2–5° for the outer ones; mutual perturbations are not modelled.
//!
//! ## Pipeline
//!
//! ```text
//! ISO date ──► Julian Date ──► T (centuries since J2000)
//!                                  │
//!          L = L₀ + L̇·T, ϖ = ϖ₀ + ϖ̇·T
//!                                  │
//!          M = L − ϖ ──► Kepler ──► E ──► ν ──► λ = ν + ϖ
//! ```
//!
//! The on-screen angle used by the renderer is a separate transform, see [`render_angle`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{mod360, Degree, JulianCentury};
use crate::kepler::{eccentric_to_true_anomaly, solve_kepler};
use crate::orrery_errors::OrreryError;
use crate::time::{iso_to_jd, julian_centuries};

/// Fixed J2000 orbital elements of one body.
///
/// The eccentricity rate is negligible over the validity window and is not carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Mean longitude at J2000 (degrees)
    pub mean_longitude: Degree,
    /// Mean longitude rate (degrees per Julian century)
    pub mean_longitude_rate: Degree,
    /// Eccentricity at J2000
    pub eccentricity: f64,
    /// Longitude of perihelion ϖ = Ω + ω at J2000 (degrees)
    pub perihelion_longitude: Degree,
    /// Longitude of perihelion rate (degrees per Julian century)
    pub perihelion_longitude_rate: Degree,
}

impl OrbitalElements {
    pub const fn new(l0: f64, l_dot: f64, e0: f64, peri0: f64, peri_dot: f64) -> Self {
        OrbitalElements {
            mean_longitude: l0,
            mean_longitude_rate: l_dot,
            eccentricity: e0,
            perihelion_longitude: peri0,
            perihelion_longitude_rate: peri_dot,
        }
    }

    /// True heliocentric ecliptic longitude, in `[0, 360)`, at `t` Julian centuries from J2000.
    pub fn ecliptic_longitude(&self, t: JulianCentury) -> Degree {
        let mean_lon = mod360(self.mean_longitude + self.mean_longitude_rate * t);
        let peri = mod360(self.perihelion_longitude + self.perihelion_longitude_rate * t);
        let e = self.eccentricity;

        let mean_anomaly = mod360(mean_lon - peri);
        let ecc_anomaly = solve_kepler(mean_anomaly, e);
        let nu = eccentric_to_true_anomaly(ecc_anomaly, e).to_degrees();

        mod360(nu + peri)
    }
}

/// The eight major planets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    pub const ALL: [Planet; 8] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    /// Canonical English name.
    pub fn name(&self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
        }
    }

    pub fn elements(&self) -> &'static OrbitalElements {
        match self {
            Planet::Mercury => &MERCURY,
            Planet::Venus => &VENUS,
            Planet::Earth => &EARTH,
            Planet::Mars => &MARS,
            Planet::Jupiter => &JUPITER,
            Planet::Saturn => &SATURN,
            Planet::Uranus => &URANUS,
            Planet::Neptune => &NEPTUNE,
        }
    }

    /// True heliocentric ecliptic longitude on the given ISO date.
    pub fn ecliptic_longitude(&self, date_iso: &str) -> Result<Degree, OrreryError> {
        let t = julian_centuries(iso_to_jd(date_iso)?);
        Ok(self.elements().ecliptic_longitude(t))
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Planet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Planet::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("Unknown planet: {s}"))
    }
}

const MERCURY: OrbitalElements =
    OrbitalElements::new(252.25032350, 149472.67411175, 0.20563593, 77.45779628, 0.16047689);
const VENUS: OrbitalElements =
    OrbitalElements::new(181.97909950, 58517.81538729, 0.00677672, 131.60246718, 0.00268329);
const EARTH: OrbitalElements =
    OrbitalElements::new(100.46457166, 35999.37244981, 0.01671123, 102.93768193, 0.32327364);
const MARS: OrbitalElements =
    OrbitalElements::new(-4.55343205, 19140.30268499, 0.09339410, -23.94362959, 0.44441088);
const JUPITER: OrbitalElements =
    OrbitalElements::new(34.39644051, 3034.74612775, 0.04838624, 14.72847983, 0.18199196);
const SATURN: OrbitalElements =
    OrbitalElements::new(49.95424423, 1222.49362201, 0.05386179, 92.59887831, 0.83771232);
const URANUS: OrbitalElements =
    OrbitalElements::new(313.23810451, 428.48202785, 0.04725744, 170.95427630, 0.40805281);
const NEPTUNE: OrbitalElements =
    OrbitalElements::new(-55.12002969, 218.45945325, 0.00859048, 44.96476227, 0.68831688);

/// Heliocentric ecliptic longitude of a planet, looked up by English name.
///
/// Arguments
/// ---------
/// * `planet_name`: canonical English name (`"Earth"`, `"Jupiter"`, …)
/// * `date_iso`: calendar date `YYYY-MM-DD`
///
/// Return
/// ------
/// * The longitude in `[0, 360)`. Names outside the eight-planet set yield `0.0`; callers only
///   ever query that set. A malformed date is an [`OrreryError::InvalidDate`].
pub fn ecliptic_longitude(planet_name: &str, date_iso: &str) -> Result<Degree, OrreryError> {
    match planet_name.parse::<Planet>() {
        Ok(planet) => planet.ecliptic_longitude(date_iso),
        Err(_) => Ok(0.0),
    }
}

/// On-screen rotation angle for an ecliptic longitude.
///
/// Screen rotation runs clockwise while ecliptic longitude runs counterclockwise, both starting
/// from the ♈ direction, hence the negation.
#[inline]
pub fn render_angle(longitude: Degree) -> Degree {
    mod360(-longitude)
}

/// Longitudes of all eight planets on one date, in catalog order.
///
/// Used for the approximate "live" view before any Horizons dataset is available.
pub fn live_longitudes(date_iso: &str) -> Result<Vec<(Planet, Degree)>, OrreryError> {
    let t = julian_centuries(iso_to_jd(date_iso)?);
    Ok(Planet::ALL
        .into_iter()
        .map(|p| (p, p.elements().ecliptic_longitude(t)))
        .collect())
}
