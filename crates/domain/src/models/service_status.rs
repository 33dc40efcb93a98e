use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Operational state announced for the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Operational,
    Degraded,
    Maintenance,
    Outage,
}

impl ServiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceState::Operational => "operational",
            ServiceState::Degraded => "degraded",
            ServiceState::Maintenance => "maintenance",
            ServiceState::Outage => "outage",
        }
    }
}

impl FromStr for ServiceState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operational" => Ok(ServiceState::Operational),
            "degraded" => Ok(ServiceState::Degraded),
            "maintenance" => Ok(ServiceState::Maintenance),
            "outage" => Ok(ServiceState::Outage),
            _ => Err(format!("Invalid service state: {}", s)),
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A service status announcement. Announcements are append-only; the latest
/// row is the current status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub id: Uuid,
    pub state: ServiceState,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        for s in ["operational", "degraded", "maintenance", "outage"] {
            assert_eq!(ServiceState::from_str(s).unwrap().as_str(), s);
        }
        assert!(ServiceState::from_str("down").is_err());
    }
}
