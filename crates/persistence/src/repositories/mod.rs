//! Repository implementations.

pub mod activity_log;
pub mod analytics;
pub mod audit_log;
pub mod branding;
pub mod catalog;
pub mod content;
pub mod email_template;
pub mod expiry;
pub mod notification;
pub mod password_reset;
pub mod price;
pub mod service_status;
pub mod ticket;
pub mod transaction;
pub mod user;

pub use activity_log::ActivityLogRepository;
pub use analytics::AnalyticsRepository;
pub use audit_log::AuditLogRepository;
pub use branding::BrandingRepository;
pub use catalog::CatalogRepository;
pub use content::ContentRepository;
pub use email_template::EmailTemplateRepository;
pub use expiry::ExpiryReminderRepository;
pub use notification::NotificationRepository;
pub use password_reset::PasswordResetRepository;
pub use price::PriceRepository;
pub use service_status::ServiceStatusRepository;
pub use ticket::TicketRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
