//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod circle;
pub mod contact;
pub mod location;
pub mod mail;
pub mod notification;
pub mod presence;
pub mod sos;
pub mod trip;
pub mod user;

pub use circle::{CircleEntity, CircleMembershipEntity, CircleWithCountEntity, RosterMemberEntity};
pub use contact::{ContactEntity, IncomingShareEntity};
pub use location::{LatestLocationEntity, LocationEntity};
pub use mail::MailEntity;
pub use notification::NotificationEntity;
pub use presence::PresenceEntity;
pub use sos::SosEventEntity;
pub use trip::TripEntity;
pub use user::UserEntity;
