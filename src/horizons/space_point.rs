use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::parser::HorizonsRecord;
use crate::constants::{
    mod360, AstronomicalUnit, Degree, Kilometer, AU, AU_DAY_TO_KM_S, SECONDS_PER_DAY,
};
use crate::orrery_errors::OrreryError;
use crate::time::seconds_to_hms;

/// One observation of one body at one date, in public units.
///
/// Invariants: `angle ∈ [0, 360)` and `distance ≥ 0` for well-formed upstream data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacePoint {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Heliocentric position (AU)
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Heliocentric range (AU)
    pub distance: AstronomicalUnit,
    /// Heliocentric ecliptic angle, degrees in `[0, 360)`
    pub angle: Degree,
    pub distance_km: Kilometer,
    pub speed_kms: f64,
    /// One-way light time in minutes
    pub signal_minutes: f64,
    /// One-way light time as `HH:MM:SS`
    #[serde(rename = "signalHMS")]
    pub signal_hms: String,
}

impl SpacePoint {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// `true` when every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.x,
            self.y,
            self.z,
            self.distance,
            self.angle,
            self.distance_km,
            self.speed_kms,
            self.signal_minutes,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl From<&HorizonsRecord> for SpacePoint {
    fn from(record: &HorizonsRecord) -> Self {
        to_space_point(record)
    }
}

/// Convert a parsed Horizons record into the enriched public point.
///
/// * distance = range (AU)
/// * angle = atan2(y, x) in degrees, normalized
/// * distance_km = range × AU
/// * speed_kms = |v| (AU/day) × AU / 86400
/// * signal = light time (days) in minutes and as `HH:MM:SS`
///
/// Non-finite inputs propagate; see [`NonFinitePolicy`].
pub fn to_space_point(record: &HorizonsRecord) -> SpacePoint {
    let lt_seconds = record.light_time * SECONDS_PER_DAY;
    let pos = &record.position;

    SpacePoint {
        date: record.date.clone(),
        x: pos.x,
        y: pos.y,
        z: pos.z,
        distance: record.range,
        angle: mod360(pos.y.atan2(pos.x).to_degrees()),
        distance_km: record.range * AU,
        speed_kms: record.velocity.norm() * AU_DAY_TO_KM_S,
        signal_minutes: lt_seconds / 60.0,
        signal_hms: seconds_to_hms(lt_seconds),
    }
}

/// What to do with points whose derived quantities are NaN or infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// Keep the point as computed.
    #[default]
    PassThrough,
    /// Drop the offending points and keep the rest.
    DropRecord,
    /// Fail the whole body.
    Reject,
}

impl NonFinitePolicy {
    /// Apply the policy to a converted point sequence.
    pub fn apply(&self, points: Vec<SpacePoint>) -> Result<Vec<SpacePoint>, OrreryError> {
        match self {
            NonFinitePolicy::PassThrough => Ok(points),
            NonFinitePolicy::DropRecord => {
                let before = points.len();
                let kept: Vec<SpacePoint> =
                    points.into_iter().filter(SpacePoint::is_finite).collect();
                if kept.len() < before {
                    warn!(dropped = before - kept.len(), "dropped non-finite ephemeris points");
                }
                Ok(kept)
            }
            NonFinitePolicy::Reject => match points.iter().find(|p| !p.is_finite()) {
                Some(bad) => Err(OrreryError::NonFiniteTelemetry {
                    date: bad.date.clone(),
                }),
                None => Ok(points),
            },
        }
    }
}
