//! Arrival evaluation for active shares.
//!
//! Pure decision logic: given the owner's current fix and the share's
//! recorded progress, decide which notifications fire and what the new
//! progress is. Callers persist the returned progress only after the
//! notifications are enqueued, so a crash in between re-evaluates on the
//! next fix instead of losing the notification. Progress is monotonic,
//! which is what makes that retry safe.

use chrono::{DateTime, Duration, Utc};

use crate::models::ShareProgress;
use crate::services::eta::{self, ARRIVAL_RADIUS_M, NEAR_ETA_MINUTES};

/// Minimum seconds between evaluations of the same share.
pub const ETA_CHECK_INTERVAL_SECS: i64 = 30;

/// Notification decisions produced by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalEvent {
    /// Owner is two minutes out; carries the computed ETA.
    Near { eta_minutes: i64 },
    /// Owner reached the arrival radius.
    Arrived,
}

/// Outcome of evaluating one share against a fresh fix.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareEvaluation {
    pub progress: ShareProgress,
    pub distance_meters: f64,
    pub eta_minutes: i64,
    pub events: Vec<ArrivalEvent>,
}

/// Evaluates a share against the owner's latest fix.
///
/// Returns `None` when the previous evaluation was under
/// [`ETA_CHECK_INTERVAL_SECS`] ago; the caller skips persisting anything.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_share(
    progress: ShareProgress,
    last_evaluated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    owner_lat: f64,
    owner_lon: f64,
    dest_lat: f64,
    dest_lon: f64,
    speed_mps: f64,
) -> Option<ShareEvaluation> {
    if let Some(last) = last_evaluated_at {
        if now.signed_duration_since(last) < Duration::seconds(ETA_CHECK_INTERVAL_SECS) {
            return None;
        }
    }

    let distance = eta::distance_meters(owner_lat, owner_lon, dest_lat, dest_lon);
    let eta = eta::eta_minutes(distance, speed_mps);

    let mut events = Vec::new();
    let mut next = progress;

    if distance <= ARRIVAL_RADIUS_M {
        if progress < ShareProgress::Arrived {
            events.push(ArrivalEvent::Arrived);
        }
        next = next.advance_to(ShareProgress::Arrived);
    } else if eta <= NEAR_ETA_MINUTES && progress < ShareProgress::Near {
        events.push(ArrivalEvent::Near { eta_minutes: eta });
        next = next.advance_to(ShareProgress::Near);
    }

    Some(ShareEvaluation {
        progress: next,
        distance_meters: distance,
        eta_minutes: eta,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEST_LAT: f64 = 48.1486;
    const DEST_LON: f64 = 17.1077;

    // About 0.009 degrees of latitude is one kilometer.
    fn point_at_meters(meters: f64) -> (f64, f64) {
        (DEST_LAT + meters / 111_195.0, DEST_LON)
    }

    fn evaluate(
        progress: ShareProgress,
        meters_out: f64,
        speed: f64,
    ) -> ShareEvaluation {
        let (lat, lon) = point_at_meters(meters_out);
        evaluate_share(progress, None, Utc::now(), lat, lon, DEST_LAT, DEST_LON, speed)
            .expect("no rate limit without a prior evaluation")
    }

    #[test]
    fn test_far_away_stays_unsent() {
        // 10 km at 13.89 m/s is just under 12 minutes out.
        let result = evaluate(ShareProgress::Unsent, 10_000.0, 13.89);
        assert_eq!(result.progress, ShareProgress::Unsent);
        assert!(result.events.is_empty());
        assert_eq!(result.eta_minutes, 11);
    }

    #[test]
    fn test_two_minutes_out_fires_near_once() {
        // 1500 m at 13.89 m/s is under two minutes but outside the radius.
        let result = evaluate(ShareProgress::Unsent, 1_500.0, 13.89);
        assert_eq!(result.progress, ShareProgress::Near);
        assert_eq!(result.events, vec![ArrivalEvent::Near { eta_minutes: 1 }]);

        // Re-evaluating at Near fires nothing.
        let result = evaluate(ShareProgress::Near, 1_400.0, 13.89);
        assert_eq!(result.progress, ShareProgress::Near);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_inside_radius_fires_arrived_once() {
        let result = evaluate(ShareProgress::Near, 50.0, 1.0);
        assert_eq!(result.progress, ShareProgress::Arrived);
        assert_eq!(result.events, vec![ArrivalEvent::Arrived]);

        let result = evaluate(ShareProgress::Arrived, 10.0, 1.0);
        assert_eq!(result.progress, ShareProgress::Arrived);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_starting_inside_radius_skips_near() {
        // A share created at the destination goes straight to arrived
        // without an almost-there warning.
        let result = evaluate(ShareProgress::Unsent, 40.0, 1.0);
        assert_eq!(result.progress, ShareProgress::Arrived);
        assert_eq!(result.events, vec![ArrivalEvent::Arrived]);
    }

    #[test]
    fn test_slow_crawl_near_boundary_no_double_near() {
        // Low ETA but just outside the radius: near fires, then nothing
        // until the radius is crossed.
        let first = evaluate(ShareProgress::Unsent, 110.0, 1.0);
        assert_eq!(first.progress, ShareProgress::Near);
        assert_eq!(first.events.len(), 1);

        let second = evaluate(first.progress, 105.0, 1.0);
        assert!(second.events.is_empty());

        let third = evaluate(second.progress, 95.0, 1.0);
        assert_eq!(third.events, vec![ArrivalEvent::Arrived]);
    }

    #[test]
    fn test_progress_never_regresses_when_moving_away() {
        // Driving away after arriving fires nothing and keeps arrived.
        let result = evaluate(ShareProgress::Arrived, 5_000.0, 13.89);
        assert_eq!(result.progress, ShareProgress::Arrived);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_rate_limit_skips_recent_evaluation() {
        let now = Utc::now();
        let recent = now - Duration::seconds(10);
        let (lat, lon) = point_at_meters(1_000.0);
        let result = evaluate_share(
            ShareProgress::Unsent,
            Some(recent),
            now,
            lat,
            lon,
            DEST_LAT,
            DEST_LON,
            13.89,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_rate_limit_allows_after_interval() {
        let now = Utc::now();
        let old = now - Duration::seconds(ETA_CHECK_INTERVAL_SECS);
        let (lat, lon) = point_at_meters(1_000.0);
        let result = evaluate_share(
            ShareProgress::Unsent,
            Some(old),
            now,
            lat,
            lon,
            DEST_LAT,
            DEST_LON,
            13.89,
        );
        assert!(result.is_some());
    }

    #[test]
    fn test_zero_speed_uses_fallback_for_eta() {
        let result = evaluate(ShareProgress::Unsent, 10_000.0, 0.0);
        assert_eq!(result.eta_minutes, 11);
    }
}
