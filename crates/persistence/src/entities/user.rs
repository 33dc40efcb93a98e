//! User entity.

use chrono::{DateTime, Utc};
use domain::models::{User, UserRole};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database entity for users.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    /// Role as stored text ("admin" or "user").
    pub role: String,
    pub subscription_expiration: Option<DateTime<Utc>>,
    pub xc_username: Option<String>,
    pub xc_password: Option<String>,
    pub server_url: Option<String>,
    pub vod_enabled: bool,
    /// JSONB array of `{name, enabled}` objects.
    pub custom_services: serde_json::Value,
    pub referral_code: String,
    pub preferences: serde_json::Value,
    pub trial_status: bool,
    pub payment_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(e: UserEntity) -> Self {
        User {
            id: e.id,
            email: e.email,
            password_hash: e.password_hash,
            // Unknown role text falls back to the least-privileged role.
            role: UserRole::from_str(&e.role).unwrap_or(UserRole::User),
            subscription_expiration: e.subscription_expiration,
            xc_username: e.xc_username,
            xc_password: e.xc_password,
            server_url: e.server_url,
            vod_enabled: e.vod_enabled,
            custom_services: serde_json::from_value(e.custom_services).unwrap_or_default(),
            referral_code: e.referral_code,
            preferences: e.preferences,
            trial_status: e.trial_status,
            payment_status: e.payment_status,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_model() {
        let now = Utc::now();
        let entity = UserEntity {
            id: Uuid::new_v4(),
            email: "user@demo.com".to_string(),
            password_hash: "hash".to_string(),
            role: "admin".to_string(),
            subscription_expiration: None,
            xc_username: Some("xc1".to_string()),
            xc_password: Some("secret".to_string()),
            server_url: Some("http://stream.example.com".to_string()),
            vod_enabled: true,
            custom_services: serde_json::json!([{"name": "Premium", "enabled": true}]),
            referral_code: "ref123".to_string(),
            preferences: serde_json::json!({"theme": "dark"}),
            trial_status: false,
            payment_status: Some("paid".to_string()),
            created_at: now,
            updated_at: now,
        };

        let user: User = entity.into();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.custom_services.len(), 1);
        assert_eq!(user.custom_services[0].name, "Premium");
    }

    #[test]
    fn test_unknown_role_falls_back_to_user() {
        let now = Utc::now();
        let entity = UserEntity {
            id: Uuid::new_v4(),
            email: "u@demo.com".to_string(),
            password_hash: "hash".to_string(),
            role: "superuser".to_string(),
            subscription_expiration: None,
            xc_username: None,
            xc_password: None,
            server_url: None,
            vod_enabled: false,
            custom_services: serde_json::json!([]),
            referral_code: "r".to_string(),
            preferences: serde_json::json!({}),
            trial_status: false,
            payment_status: None,
            created_at: now,
            updated_at: now,
        };
        let user: User = entity.into();
        assert_eq!(user.role, UserRole::User);
    }
}
