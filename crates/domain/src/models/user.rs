//! User account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of a user, gating access to admin routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An enabled add-on attached to a subscription (stored as JSON on the user).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomService {
    pub name: String,
    pub enabled: bool,
}

/// A portal user account with subscription and service credential fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub role: UserRole,
    pub subscription_expiration: Option<DateTime<Utc>>,
    pub xc_username: Option<String>,
    pub xc_password: Option<String>,
    pub server_url: Option<String>,
    pub vod_enabled: bool,
    pub custom_services: Vec<CustomService>,
    pub referral_code: String,
    /// Arbitrary per-user preference bag. Never holds security tokens;
    /// password resets live in their own table.
    pub preferences: serde_json::Value,
    pub trial_status: bool,
    pub payment_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whole days until the subscription expires, clamped at zero.
    /// Returns 0 when no expiration is set.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.subscription_expiration {
            Some(expiration) => days_until(expiration, now).max(0),
            None => 0,
        }
    }

    /// Renders the custom services list as "Name: true, Other: false" for
    /// email placeholder substitution.
    pub fn custom_services_text(&self) -> String {
        self.custom_services
            .iter()
            .map(|cs| format!("{}: {}", cs.name, cs.enabled))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Days remaining until `expiration`, rounded up (a partial day counts as
/// a full day, matching `ceil((expiration - now) / 1 day)`).
pub fn days_until(expiration: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (expiration - now).num_seconds();
    if secs <= 0 {
        // Ceil of a non-positive span: 0 at the boundary, negative past it.
        -((-secs) / 86_400)
    } else {
        (secs + 86_399) / 86_400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_expiring_in(days: i64, now: DateTime<Utc>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@demo.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: UserRole::User,
            subscription_expiration: Some(now + Duration::days(days)),
            xc_username: None,
            xc_password: None,
            server_url: None,
            vod_enabled: false,
            custom_services: vec![],
            referral_code: "userref".to_string(),
            preferences: serde_json::json!({}),
            trial_status: false,
            payment_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("user").unwrap(), UserRole::User);
        assert!(UserRole::from_str("root").is_err());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_days_until_exact_days() {
        let now = Utc::now();
        assert_eq!(days_until(now + Duration::days(3), now), 3);
        assert_eq!(days_until(now + Duration::days(7), now), 7);
    }

    #[test]
    fn test_days_until_rounds_up() {
        let now = Utc::now();
        // 2 days and one hour out still counts as 3 days remaining.
        assert_eq!(days_until(now + Duration::days(2) + Duration::hours(1), now), 3);
        assert_eq!(days_until(now + Duration::hours(1), now), 1);
    }

    #[test]
    fn test_days_until_past_expiration() {
        let now = Utc::now();
        assert_eq!(days_until(now - Duration::hours(1), now), 0);
        assert_eq!(days_until(now - Duration::days(2), now), -2);
    }

    #[test]
    fn test_days_remaining_clamped() {
        let now = Utc::now();
        let expired = user_expiring_in(-5, now);
        assert_eq!(expired.days_remaining(now), 0);

        let mut no_sub = user_expiring_in(0, now);
        no_sub.subscription_expiration = None;
        assert_eq!(no_sub.days_remaining(now), 0);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = user_expiring_in(3, Utc::now());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("email").is_some());
    }

    #[test]
    fn test_custom_services_text() {
        let mut user = user_expiring_in(3, Utc::now());
        user.custom_services = vec![
            CustomService { name: "Premium Channels".to_string(), enabled: true },
            CustomService { name: "Extra Streams".to_string(), enabled: false },
        ];
        assert_eq!(
            user.custom_services_text(),
            "Premium Channels: true, Extra Streams: false"
        );
    }
}
