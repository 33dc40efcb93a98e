use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Category of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    TicketReply,
    ServiceStatus,
    SubscriptionExpiry,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::TicketReply => "ticket_reply",
            NotificationKind::ServiceStatus => "service_status",
            NotificationKind::SubscriptionExpiry => "subscription_expiry",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(NotificationKind::Info),
            "ticket_reply" => Ok(NotificationKind::TicketReply),
            "service_status" => Ok(NotificationKind::ServiceStatus),
            "subscription_expiry" => Ok(NotificationKind::SubscriptionExpiry),
            _ => Err(format!("Invalid notification kind: {}", s)),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An in-app notification shown on the user dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for s in ["info", "ticket_reply", "service_status", "subscription_expiry"] {
            assert_eq!(NotificationKind::from_str(s).unwrap().as_str(), s);
        }
        assert!(NotificationKind::from_str("alert").is_err());
    }
}
