use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("Invalid ISO date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Horizons HTTP {status}: {reason}")]
    HorizonsHttp { status: u16, reason: String },

    #[error("Horizons error: {0}")]
    HorizonsApi(String),

    #[error("parse_error: $$SOE not found")]
    MissingEphemerisMarkers,

    #[error("Non-finite telemetry in record dated {date}")]
    NonFiniteTelemetry { date: String },

    #[error("System clock unavailable: {0}")]
    SystemClock(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Fetch failed: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unable to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl PartialEq for OrreryError {
    fn eq(&self, other: &Self) -> bool {
        use OrreryError::*;
        match (self, other) {
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (
                InvalidDateRange { start: s1, end: e1 },
                InvalidDateRange { start: s2, end: e2 },
            ) => s1 == s2 && e1 == e2,
            (
                HorizonsHttp {
                    status: s1,
                    reason: r1,
                },
                HorizonsHttp {
                    status: s2,
                    reason: r2,
                },
            ) => s1 == s2 && r1 == r2,
            (HorizonsApi(a), HorizonsApi(b)) => a == b,
            (NonFiniteTelemetry { date: a }, NonFiniteTelemetry { date: b }) => a == b,
            (SystemClock(a), SystemClock(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            // Not comparable: same variant means equal
            (ReqwestError(_), ReqwestError(_)) => true,
            (TomlError(_), TomlError(_)) => true,

            (MissingEphemerisMarkers, MissingEphemerisMarkers) => true,

            _ => false,
        }
    }
}
