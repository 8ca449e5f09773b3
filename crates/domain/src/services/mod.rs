//! Domain services for OnTheWay.
//!
//! Services contain business logic that operates on domain models.

pub mod arrival;
pub mod eta;
pub mod push;

pub use arrival::{evaluate_share, ArrivalEvent, ShareEvaluation, ETA_CHECK_INTERVAL_SECS};

pub use eta::{
    distance_meters, eta_minutes, ARRIVAL_RADIUS_M, DEFAULT_SPEED_MPS, EARTH_RADIUS_M,
    NEAR_ETA_MINUTES,
};

pub use push::{MockPushService, PushMessage, PushResult, PushService};
