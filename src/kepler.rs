use crate::constants::{Degree, Radian, RADEG};

/// Maximum number of Newton iterations.
///
/// The iteration never diverges for `e < 1`; the cap only bounds the loop.
const MAX_ITER: usize = 50;

/// Convergence threshold on the Newton correction (radians).
const CONVERGENCE: f64 = 1e-10;

/// Solve Kepler's equation `M = E − e·sin(E)` for the eccentric anomaly.
///
/// Newton–Raphson seeded with the first-order estimate `E₀ = M + e·sin(M)`.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: the mean anomaly M in degrees
/// * `eccentricity`: the orbit eccentricity, `0 ≤ e < 1`
///
/// Return
/// ------
/// * The eccentric anomaly E in radians.
pub fn solve_kepler(mean_anomaly: Degree, eccentricity: f64) -> Radian {
    let m = mean_anomaly * RADEG;
    let e = eccentricity;

    let mut ecc_anomaly = m + e * m.sin();
    for _ in 0..MAX_ITER {
        let delta = (m - ecc_anomaly + e * ecc_anomaly.sin()) / (1.0 - e * ecc_anomaly.cos());
        ecc_anomaly += delta;
        if delta.abs() < CONVERGENCE {
            break;
        }
    }
    ecc_anomaly
}

/// True anomaly ν (radians) from the eccentric anomaly.
///
/// Uses the half-angle form `ν = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))`, valid in every
/// quadrant.
pub fn eccentric_to_true_anomaly(ecc_anomaly: Radian, eccentricity: f64) -> Radian {
    let half = ecc_anomaly / 2.0;
    let y = (1.0 + eccentricity).sqrt() * half.sin();
    let x = (1.0 - eccentricity).sqrt() * half.cos();
    2.0 * y.atan2(x)
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn residual(m_deg: f64, e: f64, ecc: f64) -> f64 {
        (m_deg * RADEG - ecc + e * ecc.sin()).abs()
    }

    #[test]
    fn test_circular_orbit() {
        for m in [0.0, 45.0, 90.0, 180.0, 270.0] {
            assert_abs_diff_eq!(solve_kepler(m, 0.0), m * RADEG, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_known_value() {
        // Meeus example 30.a: M = 5°, e = 0.1 → E = 5.554589°
        let ecc = solve_kepler(5.0, 0.1);
        assert_abs_diff_eq!(ecc / RADEG, 5.554589, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_mean_anomaly() {
        let ecc = solve_kepler(-2.48, 0.0167);
        assert!(ecc < 0.0);
        assert!(residual(-2.48, 0.0167, ecc) < 1e-10);
    }

    #[test]
    fn test_true_anomaly_symmetry() {
        let e = 0.3;
        assert_abs_diff_eq!(eccentric_to_true_anomaly(0.0, e), 0.0);
        assert_abs_diff_eq!(
            eccentric_to_true_anomaly(std::f64::consts::PI - 1e-12, e),
            std::f64::consts::PI,
            epsilon = 1e-9
        );
        let nu = eccentric_to_true_anomaly(1.0, e);
        assert_abs_diff_eq!(eccentric_to_true_anomaly(-1.0, e), -nu, epsilon = 1e-15);
        // the true anomaly runs ahead of E between perihelion and aphelion
        assert!(nu > 1.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn prop_solution_satisfies_kepler_equation(
            mean_anomaly in 0.0f64..360.0,
            eccentricity in 0.0f64..0.95,
        ) {
            let ecc = solve_kepler(mean_anomaly, eccentricity);
            let err = residual(mean_anomaly, eccentricity, ecc);
            prop_assert!(
                err < 1e-8,
                "M={mean_anomaly}, e={eccentricity}, E={ecc}, residual={err}"
            );
        }
    }
}
