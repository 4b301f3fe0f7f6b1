//! Parser for the `$$SOE … $$EOE` block of a Horizons `VECTORS` response.
//!
//! With `VEC_TABLE=3` and `VEC_LABELS=YES` each record spans four non-blank lines:
//!
//! ```text
//! 2460000.500000000 = A.D. 2023-Feb-25 00:00:00.0000 TDB
//!  X =-9.153204464516613E-01 Y = 3.883421577396498E-01 Z =-2.546385003474051E-05
//!  VX=-6.971493224307339E-03 VY=-1.598716063085468E-02 VZ= 8.867839138780296E-07
//!  LT= 5.743011127419346E-03 RG= 9.943952567960484E-01 RR=-7.795573006960431E-05
//! ```
//!
//! Parsing is lenient. A record whose date line is unrecognizable costs one line; a record with
//! a short numeric line costs its four-line span, unless that line is itself the date stamp of
//! the next record, in which case scanning resumes there.

use itertools::Itertools;
use nalgebra::Vector3;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::constants::AstronomicalUnit;

pub(crate) const START_MARKER: &str = "$$SOE";
pub(crate) const END_MARKER: &str = "$$EOE";

/// Scientific-notation float: optional sign, digits, optional fraction, mandatory exponent.
static FLOAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-]?\d+\.?\d*[Ee][+-]?\d+").expect("valid float regex"));

/// Calendar part of the record date stamp.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"A\.D\.\s+(\d{4}-[A-Za-z]{3}-\d{2})").expect("valid date regex")
});

/// One state-vector record, in Horizons units.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonsRecord {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Heliocentric position (AU)
    pub position: Vector3<f64>,
    /// Heliocentric velocity (AU/day)
    pub velocity: Vector3<f64>,
    /// One-way light time (days)
    pub light_time: f64,
    /// Heliocentric range (AU)
    pub range: AstronomicalUnit,
}

/// Outcome of trying to read a record at one line offset.
#[derive(Debug, PartialEq)]
enum Scan {
    Record(HorizonsRecord),
    /// Not a record start; move on by this many lines.
    Skip(usize),
}

/// `"2023-Feb-24"` → `"2023-02-24"`; unknown month abbreviations are returned unchanged.
pub fn horizons_date_to_iso(raw: &str) -> String {
    let Some((y, m, d)) = raw.splitn(3, '-').collect_tuple() else {
        return raw.to_string();
    };
    let month = match m {
        "Jan" => "01",
        "Feb" => "02",
        "Mar" => "03",
        "Apr" => "04",
        "May" => "05",
        "Jun" => "06",
        "Jul" => "07",
        "Aug" => "08",
        "Sep" => "09",
        "Oct" => "10",
        "Nov" => "11",
        "Dec" => "12",
        _ => return raw.to_string(),
    };
    format!("{y}-{month}-{d:0>2}")
}

fn floats(line: &str) -> Vec<f64> {
    FLOAT_RE
        .find_iter(line)
        .map(|m| m.as_str().parse::<f64>().unwrap_or(f64::NAN))
        .collect()
}

fn triple(values: &[f64]) -> Option<Vector3<f64>> {
    values
        .iter()
        .copied()
        .take(3)
        .collect_tuple()
        .map(|(x, y, z)| Vector3::new(x, y, z))
}

fn scan_record(lines: &[&str], i: usize) -> Scan {
    let Some(date) = DATE_RE.captures(lines[i]).and_then(|c| c.get(1)) else {
        return Scan::Skip(1);
    };

    // minimum number of floats expected on lines i+1, i+2, i+3
    const WANTED: [usize; 3] = [3, 3, 2];
    let mut values: [Vec<f64>; 3] = Default::default();
    for (k, wanted) in WANTED.into_iter().enumerate() {
        let line = lines[i + 1 + k];
        let found = floats(line);
        if found.len() < wanted {
            if DATE_RE.is_match(line) {
                // truncated record: the next one starts here
                return Scan::Skip(k + 1);
            }
            return Scan::Skip(4);
        }
        values[k] = found;
    }

    let [pos, vel, lt_rg] = values;
    match (triple(&pos), triple(&vel)) {
        (Some(position), Some(velocity)) => Scan::Record(HorizonsRecord {
            date: horizons_date_to_iso(date.as_str()),
            position,
            velocity,
            light_time: lt_rg[0],
            range: lt_rg[1],
        }),
        _ => Scan::Skip(4),
    }
}

/// Parse the raw text of a Horizons vector response.
///
/// Argument
/// --------
/// * `text`: the `result` field of the Horizons JSON response
///
/// Return
/// ------
/// * The records in encounter (chronological) order. Empty when either marker is missing.
pub fn parse_horizons_text(text: &str) -> Vec<HorizonsRecord> {
    let (Some(soe), Some(eoe)) = (text.find(START_MARKER), text.find(END_MARKER)) else {
        return Vec::new();
    };
    let Some(section) = text.get(soe + START_MARKER.len()..eoe) else {
        return Vec::new();
    };

    let lines: Vec<&str> = section
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::with_capacity(lines.len() / 4);
    let mut skipped = 0usize;
    let mut i = 0;

    while i + 3 < lines.len() {
        match scan_record(&lines, i) {
            Scan::Record(record) => {
                records.push(record);
                i += 4;
            }
            Scan::Skip(n) => {
                debug!(line = lines[i], advance = n, "skipping malformed ephemeris line");
                skipped += 1;
                i += n;
            }
        }
    }

    if skipped > 0 {
        debug!(records = records.len(), skipped, "parsed ephemeris block with skips");
    }
    records
}
