//! Usage: Unix wall-clock helper.

use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond resolution so token issue stamps order correctly even when
/// two grants land within the same second.
pub(crate) fn now_unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_past_the_epoch_and_monotonic_enough() {
        let first = now_unix_millis();
        let second = now_unix_millis();
        assert!(first > 1_600_000_000_000);
        assert!(second >= first);
    }
}
