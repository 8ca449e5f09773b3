//! Background job scheduler and job implementations.

mod cleanup_locations;
mod cleanup_notifications;
mod deliver_mail;
mod deliver_notifications;
mod refresh_etas;
mod scheduler;

pub use cleanup_locations::CleanupLocationsJob;
pub use cleanup_notifications::CleanupNotificationsJob;
pub use deliver_mail::DeliverMailJob;
pub use deliver_notifications::DeliverNotificationsJob;
pub use refresh_etas::RefreshEtasJob;
pub use scheduler::JobScheduler;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::{build_push_service, EmailService};

/// Register the standard job set.
pub fn register_jobs(scheduler: &mut JobScheduler, config: &Config, pool: PgPool) {
    scheduler.register(CleanupLocationsJob::new(
        pool.clone(),
        i64::from(config.limits.location_retention_days),
    ));
    scheduler.register(CleanupNotificationsJob::new(
        pool.clone(),
        i64::from(config.limits.failed_notification_retention_hours),
    ));
    scheduler.register(RefreshEtasJob::new(pool.clone()));
    scheduler.register(DeliverNotificationsJob::new(
        pool.clone(),
        build_push_service(config),
        config.limits.delivery_batch_size,
    ));
    scheduler.register(DeliverMailJob::new(
        pool,
        EmailService::new(config.email.clone()),
        config.limits.delivery_batch_size,
    ));
}
