//! Great-circle distance and arrival estimates.
//!
//! ETA assumes a constant travel speed; when the device reports no usable
//! speed the estimate falls back to a typical urban driving pace.

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Fallback speed when the device reports none, about 50 km/h.
pub const DEFAULT_SPEED_MPS: f64 = 13.89;

/// Within this many meters of the destination counts as arrived.
pub const ARRIVAL_RADIUS_M: f64 = 100.0;

/// ETA at or below this many minutes triggers the almost-there warning.
pub const NEAR_ETA_MINUTES: i64 = 2;

/// Haversine distance in meters between two coordinates.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Whole minutes remaining to cover `distance_m` at `speed_mps`, truncated.
/// Non-positive or non-finite speeds fall back to [`DEFAULT_SPEED_MPS`].
pub fn eta_minutes(distance_m: f64, speed_mps: f64) -> i64 {
    let speed = if speed_mps.is_finite() && speed_mps > 0.0 {
        speed_mps
    } else {
        DEFAULT_SPEED_MPS
    };
    (distance_m / speed / 60.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_same_point() {
        assert_eq!(distance_meters(48.1486, 17.1077, 48.1486, 17.1077), 0.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // One degree of latitude is about 111.2 km on a 6371 km sphere.
        let d = distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_distance_symmetric() {
        let there = distance_meters(48.1486, 17.1077, 50.0755, 14.4378);
        let back = distance_meters(50.0755, 14.4378, 48.1486, 17.1077);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn test_distance_bratislava_vienna() {
        // Roughly 55 km between the two city centers.
        let d = distance_meters(48.1486, 17.1077, 48.2082, 16.3738);
        assert!((54_000.0..57_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_distance_across_antimeridian() {
        let d = distance_meters(0.0, 179.5, 0.0, -179.5);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn test_eta_truncates_to_whole_minutes() {
        // 1000 seconds of travel is 16.66 minutes, truncated to 16.
        assert_eq!(eta_minutes(13_890.0, DEFAULT_SPEED_MPS), 16);
    }

    #[test]
    fn test_eta_zero_distance() {
        assert_eq!(eta_minutes(0.0, 10.0), 0);
    }

    #[test]
    fn test_eta_under_a_minute_is_zero() {
        assert_eq!(eta_minutes(500.0, 10.0), 0);
    }

    #[test]
    fn test_eta_falls_back_on_zero_speed() {
        assert_eq!(eta_minutes(8334.0, 0.0), eta_minutes(8334.0, DEFAULT_SPEED_MPS));
    }

    #[test]
    fn test_eta_falls_back_on_negative_speed() {
        assert_eq!(eta_minutes(8334.0, -3.0), eta_minutes(8334.0, DEFAULT_SPEED_MPS));
    }

    #[test]
    fn test_eta_falls_back_on_nan_speed() {
        assert_eq!(eta_minutes(8334.0, f64::NAN), eta_minutes(8334.0, DEFAULT_SPEED_MPS));
    }

    #[test]
    fn test_eta_walking_pace() {
        // 1.4 m/s over 840 m is exactly 10 minutes.
        assert_eq!(eta_minutes(840.0, 1.4), 10);
    }
}
