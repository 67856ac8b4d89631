//! Unit conversions: yocto balances, nanosecond timestamps, validator uptime.

use crate::utils::config::{UPTIME_EPSILON, YOCTO_PER_NEAR};
use chrono::{DateTime, Utc};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Convert a yocto-unit decimal string to NEAR
///
/// Exact in the integer part for anything that fits in `u128`; larger values
/// fall back to float parsing. Returns `None` for non-numeric text.
pub fn yocto_to_near(yocto: &str) -> Option<f64> {
    let yocto = yocto.trim();

    if let Ok(value) = yocto.parse::<u128>() {
        let whole = (value / YOCTO_PER_NEAR) as f64;
        let frac = (value % YOCTO_PER_NEAR) as f64 / YOCTO_PER_NEAR as f64;
        return Some(whole + frac);
    }

    yocto
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v / YOCTO_PER_NEAR as f64)
}

/// Nanoseconds since the Unix epoch to a UTC instant
pub fn nanos_to_datetime(nanos: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(nanos / NANOS_PER_SEC).ok()?;
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, subsec)
}

/// Share of expected blocks and chunks actually produced, in percent
pub fn uptime_percent(
    produced_blocks: u64,
    expected_blocks: u64,
    produced_chunks: u64,
    expected_chunks: u64,
) -> f64 {
    // summed as floats; node counters are untrusted and may be near u64::MAX
    let produced = produced_blocks as f64 + produced_chunks as f64;
    let expected = expected_blocks as f64 + expected_chunks as f64;
    produced / (expected + UPTIME_EPSILON) * 100.0
}
