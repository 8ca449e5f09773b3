//! Domain models.

pub mod circle;
pub mod contact;
pub mod location;
pub mod notification;
pub mod presence;
pub mod sos;
pub mod trip;
pub mod user;

pub use circle::{Circle, CircleMember};
pub use contact::{Contact, ShareProgress};
pub use location::LocationUpdate;
pub use notification::{Notification, NotificationKind, NotificationStatus};
pub use presence::Presence;
pub use sos::SosEvent;
pub use trip::Trip;
pub use user::User;
