//! Repository implementations for database access.

pub mod circle;
pub mod contact;
pub mod location;
pub mod mail;
pub mod notification;
pub mod presence;
pub mod sos;
pub mod trip;
pub mod user;

pub use circle::CircleRepository;
pub use contact::ContactRepository;
pub use location::LocationRepository;
pub use mail::MailRepository;
pub use notification::NotificationRepository;
pub use presence::PresenceRepository;
pub use sos::SosRepository;
pub use trip::TripRepository;
pub use user::UserRepository;
