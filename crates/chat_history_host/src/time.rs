//! Time helpers shared by record stamping and adapters.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};

thread_local! {
    static LAST_WRITE_TIMESTAMP_MS: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns a monotonic unix millisecond timestamp for record writes.
///
/// Values are monotonic within the current process even when the system clock does not advance.
pub fn next_monotonic_timestamp_ms() -> u64 {
    let now = unix_time_ms_now();
    LAST_WRITE_TIMESTAMP_MS.with(|last| {
        let next = now.max(last.get().saturating_add(1));
        last.set(next);
        next
    })
}

/// Formats unix milliseconds as an ISO-8601 UTC string with millisecond precision.
pub fn iso_timestamp_from_ms(unix_ms: u64) -> String {
    let millis = i64::try_from(unix_ms).unwrap_or(i64::MAX);
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the write timestamp for a record being persisted now.
pub fn iso_timestamp_now() -> String {
    iso_timestamp_from_ms(next_monotonic_timestamp_ms())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_timestamp_uses_utc_millisecond_format() {
        assert_eq!(iso_timestamp_from_ms(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(
            iso_timestamp_from_ms(1_700_000_000_123),
            "2023-11-14T22:13:20.123Z"
        );
    }

    #[test]
    fn iso_timestamps_never_go_backwards() {
        let first = iso_timestamp_now();
        let second = iso_timestamp_now();
        assert!(second > first);
    }
}
