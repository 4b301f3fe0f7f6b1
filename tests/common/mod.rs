#![allow(dead_code)]

use approx::assert_relative_eq;
use orrery::horizons::space_point::SpacePoint;
use orrery::loader::{BodyData, BodyStatus};

/// Raw state of one synthetic Horizons record.
#[derive(Debug, Clone, Copy)]
pub struct StateRow {
    /// Horizons calendar stamp, e.g. `"2023-Feb-25"`
    pub date: &'static str,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub light_time: f64,
    pub range: f64,
}

/// The four lines of one record, as Horizons prints them with `VEC_LABELS=YES`.
pub fn record_lines(row: &StateRow, jd: f64) -> [String; 4] {
    let [x, y, z] = row.position;
    let [vx, vy, vz] = row.velocity;
    [
        format!("{jd:.9} = A.D. {} 00:00:00.0000 TDB", row.date),
        format!(" X ={x:.15E} Y ={y:.15E} Z ={z:.15E}"),
        format!(" VX={vx:.15E} VY={vy:.15E} VZ={vz:.15E}"),
        format!(
            " LT={:.15E} RG={:.15E} RR={:.15E}",
            row.light_time, row.range, -7.8e-5
        ),
    ]
}

/// Full response text around the given record lines.
pub fn wrap_ephemeris(lines: &[String]) -> String {
    let mut text = String::from(
        "*******************************************************************************\n\
         Ephemeris / API_USER\n\
         Target body name: synthetic\n\
         *******************************************************************************\n\
         $$SOE\n",
    );
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(
        "$$EOE\n\
         *******************************************************************************\n",
    );
    text
}

pub fn horizons_block(rows: &[StateRow]) -> String {
    let lines: Vec<String> = rows
        .iter()
        .enumerate()
        .flat_map(|(i, row)| record_lines(row, 2_460_000.5 + i as f64))
        .collect();
    wrap_ephemeris(&lines)
}

pub fn sample_rows() -> Vec<StateRow> {
    vec![
        StateRow {
            date: "2023-Feb-25",
            position: [-9.153204464516613E-01, 3.883421577396498E-01, -2.546385003474051E-05],
            velocity: [-6.971493224307339E-03, -1.598716063085468E-02, 8.867839138780296E-07],
            light_time: 5.743011127419346E-03,
            range: 9.943952567960484E-01,
        },
        StateRow {
            date: "2023-Feb-26",
            position: [-9.221058009146372E-01, 3.722574564624339E-01, -2.454979609898457E-05],
            velocity: [-6.598683542466004E-03, -1.618151040924614E-02, 9.412092416036546E-07],
            light_time: 5.742557398393574E-03,
            range: 9.943166870098005E-01,
        },
        StateRow {
            date: "2023-Feb-27",
            position: [-9.286537183364530E-01, 3.560149744609917E-01, -2.357984117808349E-05],
            velocity: [-6.501946213734700E-03, -1.630488024126937E-02, 9.815217880611426E-07],
            light_time: 5.742094116066830E-03,
            range: 9.942364692063402E-01,
        },
        StateRow {
            date: "2023-Mar-01",
            position: [-9.411600617262000E-01, 3.231830003201000E-01, -2.150000000000000E-05],
            velocity: [-5.890000000000000E-03, -1.650000000000000E-02, 1.050000000000000E-06],
            light_time: 5.741100000000000E-03,
            range: 9.940650000000000E-01,
        },
    ]
}

/// A `done` body holding `n` consecutive daily points starting on 2024-01-01.
pub fn daily_body(id: &str, label: &str, n: usize, angle_step: f64) -> BodyData {
    let points: Vec<SpacePoint> = (0..n)
        .map(|i| {
            let angle = (angle_step * i as f64).rem_euclid(360.0);
            let (sin, cos) = angle.to_radians().sin_cos();
            SpacePoint {
                date: format!("2024-01-{:02}", i + 1),
                x: cos,
                y: sin,
                z: 0.0,
                distance: 1.0,
                angle,
                distance_km: 149_597_870.7,
                speed_kms: 29.78,
                signal_minutes: 8.317,
                signal_hms: "00:08:19".into(),
            }
        })
        .collect();

    BodyData {
        body: id.into(),
        label: label.into(),
        points_count: points.len(),
        points,
        status: BodyStatus::Done,
        load_time_ms: 0,
        error: None,
    }
}

pub fn assert_point_close(actual: &SpacePoint, expected: &SpacePoint, epsilon: f64) {
    assert_eq!(actual.date, expected.date);
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
    assert_relative_eq!(actual.distance, expected.distance, epsilon = epsilon);
    assert_relative_eq!(actual.angle, expected.angle, epsilon = epsilon);
    assert_relative_eq!(actual.speed_kms, expected.speed_kms, epsilon = epsilon);
    assert_relative_eq!(
        actual.signal_minutes,
        expected.signal_minutes,
        epsilon = epsilon
    );
}
