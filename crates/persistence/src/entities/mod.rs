//! Database entity definitions (row mappings).

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
pub mod transaction;
pub mod user;

pub use branding::BrandingEntity;
pub use catalog::{PageTitleEntity, ServiceOfferingEntity, TutorialEntity};
pub use content::{FooterEntity, NewsEntity};
pub use email_template::EmailTemplateEntity;
pub use logs::{ActivityLogEntity, AuditLogEntity};
pub use notification::NotificationEntity;
pub use password_reset::PasswordResetEntity;
pub use price::PriceEntity;
pub use service_status::ServiceStatusEntity;
pub use ticket::{TicketEntity, TicketReplyEntity};
pub use transaction::TransactionEntity;
pub use user::UserEntity;
