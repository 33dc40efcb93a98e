//! Domain models for the portal.

pub mod analytics;
pub mod branding;
pub mod catalog;
pub mod content;
pub mod email_template;
pub mod logs;
pub mod notification;
pub mod password_reset;
pub mod price;
pub mod service_status;
pub mod ticket;
pub mod user;

pub use analytics::AnalyticsSummary;
pub use branding::Branding;
pub use catalog::{PageTitle, ServiceOffering, Tutorial};
pub use content::{Footer, NewsItem};
pub use email_template::EmailTemplate;
pub use logs::{ActivityLog, AuditLog};
pub use notification::{Notification, NotificationKind};
pub use password_reset::PasswordReset;
pub use price::{Price, PriceKind};
pub use service_status::{ServiceState, ServiceStatus};
pub use ticket::{Ticket, TicketReply, TicketStatus};
pub use user::{days_until, CustomService, User, UserRole};
