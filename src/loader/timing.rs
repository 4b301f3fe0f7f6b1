//! Small helpers to report load timings in logs.

use std::time::Duration;

/// Human-readable formatter for [`Duration`] values: `"253µs"`, `"42ms"` or `"3.14s"`
/// depending on the scale.
#[inline]
pub fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else {
        let ms = d.as_millis();
        if ms < 1_000 {
            format!("{ms}ms")
        } else {
            let s = d.as_secs_f32();
            format!("{s:.2}s")
        }
    }
}

/// Whole milliseconds of a duration, saturating at `u64::MAX`.
#[inline]
pub fn as_millis_u64(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
