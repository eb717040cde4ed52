//! telemetry/history.rs
//!
//! Hourly heart-rate series for the last 24 hours plus the current hour.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::HEART_RATE_BPM;
use crate::types::HistoryPoint;

/// 24 past hours plus the current one.
pub const HISTORY_POINTS: usize = 25;

/// Spacing between consecutive history points.
pub fn history_step() -> Duration {
    Duration::hours(1)
}

/// Build a fresh series ending at `now`, oldest first. Every point is drawn
/// independently; nothing carries over between calls.
pub fn heart_rate_history<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Vec<HistoryPoint> {
    (0..HISTORY_POINTS)
        .rev()
        .map(|hours_ago| HistoryPoint {
            time: now - history_step() * hours_ago as i32,
            heart_rate: rng.gen_range(HEART_RATE_BPM),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_history_has_25_hourly_points_ending_now() {
        let mut rng = StdRng::seed_from_u64(21);
        let now = Utc::now();
        let history = heart_rate_history(&mut rng, now);

        assert_eq!(history.len(), HISTORY_POINTS);
        assert_eq!(history.last().map(|p| p.time), Some(now));
        assert_eq!(history[0].time, now - Duration::hours(24));

        for pair in history.windows(2) {
            assert_eq!(pair[1].time - pair[0].time, history_step());
        }
    }

    #[test]
    fn test_history_heart_rates_in_range() {
        let mut rng = StdRng::seed_from_u64(22);

        for _ in 0..200 {
            for point in heart_rate_history(&mut rng, Utc::now()) {
                assert!(HEART_RATE_BPM.contains(&point.heart_rate));
            }
        }
    }

    #[test]
    fn test_history_is_regenerated_each_call() {
        let mut rng = StdRng::seed_from_u64(23);
        let now = Utc::now();

        let first = heart_rate_history(&mut rng, now);
        let second = heart_rate_history(&mut rng, now);

        assert_ne!(
            first.iter().map(|p| p.heart_rate).collect::<Vec<_>>(),
            second.iter().map(|p| p.heart_rate).collect::<Vec<_>>()
        );
    }
}
