//! Outbound services.

pub mod dispatch;
pub mod email;

pub use dispatch::{DispatchOptions, Dispatcher};
pub use email::{EmailError, EmailMessage, EmailService};
