//! Background jobs.

pub mod expiry_reminder;
pub mod scheduler;

pub use expiry_reminder::ExpiryReminderJob;
pub use scheduler::{Job, JobSchedule, JobScheduler};
