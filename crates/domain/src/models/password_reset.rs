use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending password reset. Only the SHA-256 digest of the emailed token is
/// stored; the row is deleted once the reset completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_digest: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_check() {
        let now = Utc::now();
        let reset = PasswordReset {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_digest: "abc".to_string(),
            expires_at: now + Duration::hours(1),
            created_at: now,
        };
        assert!(!reset.is_expired(now));
        assert!(reset.is_expired(now + Duration::hours(2)));
    }
}
