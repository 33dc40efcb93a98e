//! Notification/email dispatcher.
//!
//! Composes recipient, template and data into at most one in-app
//! notification row and at most one outbound email. Everything here is
//! best-effort: a missing template, a render failure or a transport failure
//! is logged and swallowed, never propagated, so the state change that
//! triggered the dispatch is never rolled back.

use std::collections::HashMap;

use domain::models::{NotificationKind, User};
use domain::services::template;
use persistence::repositories::{
    BrandingRepository, EmailTemplateRepository, NotificationRepository,
};
use sqlx::PgPool;
use tracing::{error, warn};

use crate::middleware::metrics::record_email_sent;
use crate::services::email::{EmailMessage, EmailService};

/// What a single dispatch should produce.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Writes an in-app notification row when set.
    pub notification: Option<(NotificationKind, String)>,
    /// Sends a templated email when true.
    pub send_email: bool,
}

impl DispatchOptions {
    pub fn notify(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            notification: Some((kind, message.into())),
            send_email: false,
        }
    }

    pub fn email_only() -> Self {
        Self {
            notification: None,
            send_email: true,
        }
    }

    pub fn with_email(mut self) -> Self {
        self.send_email = true;
        self
    }
}

/// Builds the standard placeholder map for a user, used by account emails
/// and the expiry sweep. Booleans are stringified here since the renderer
/// substitutes text only.
pub fn user_template_data(user: &User) -> HashMap<String, String> {
    let username = user.email.split('@').next().unwrap_or(&user.email);
    let mut data = HashMap::new();
    data.insert("username".to_string(), username.to_string());
    data.insert("email".to_string(), user.email.clone());
    data.insert(
        "xc_username".to_string(),
        user.xc_username.clone().unwrap_or_default(),
    );
    data.insert(
        "xc_password".to_string(),
        user.xc_password.clone().unwrap_or_default(),
    );
    data.insert(
        "server_url".to_string(),
        user.server_url.clone().unwrap_or_default(),
    );
    data.insert(
        "vod_enabled".to_string(),
        if user.vod_enabled { "Yes" } else { "No" }.to_string(),
    );
    data.insert("custom_services".to_string(), user.custom_services_text());
    data.insert("referral_code".to_string(), user.referral_code.clone());
    data.insert(
        "expiration_date".to_string(),
        user.subscription_expiration
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    );
    data
}

#[derive(Clone)]
pub struct Dispatcher {
    templates: EmailTemplateRepository,
    notifications: NotificationRepository,
    branding: BrandingRepository,
    email: EmailService,
}

impl Dispatcher {
    pub fn new(pool: PgPool, email: EmailService) -> Self {
        Self {
            templates: EmailTemplateRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            branding: BrandingRepository::new(pool),
            email,
        }
    }

    /// Dispatches to a single recipient. At most one notification row and
    /// one email send attempt per invocation.
    pub async fn dispatch(
        &self,
        recipient: &User,
        template_name: &str,
        mut data: HashMap<String, String>,
        options: DispatchOptions,
    ) {
        if let Some((kind, message)) = &options.notification {
            if let Err(e) = self
                .notifications
                .create(recipient.id, kind.as_str(), message)
                .await
            {
                error!(
                    user_id = %recipient.id,
                    error = %e,
                    "Failed to write notification row"
                );
            }
        }

        if !options.send_email {
            return;
        }

        let template = match self.templates.latest_by_name(template_name).await {
            Ok(Some(t)) => t,
            Ok(None) => {
                warn!(template = template_name, "Email template missing, skipping send");
                record_email_sent(template_name, false);
                return;
            }
            Err(e) => {
                error!(template = template_name, error = %e, "Failed to resolve template");
                record_email_sent(template_name, false);
                return;
            }
        };

        self.merge_branding(&mut data).await;

        let html = match template::render(&template.body, &data) {
            Ok(html) => html,
            Err(e) => {
                error!(
                    template = template_name,
                    version = template.version,
                    error = %e,
                    "Template failed to render"
                );
                record_email_sent(template_name, false);
                return;
            }
        };
        let subject = template::render_placeholders(&template.subject, &data);

        let message = EmailMessage {
            to: recipient.email.clone(),
            subject,
            body_html: html,
        };
        match self.email.send(message).await {
            Ok(()) => record_email_sent(template_name, true),
            Err(e) => {
                error!(
                    template = template_name,
                    to = %recipient.email,
                    error = %e,
                    "Email send failed"
                );
                record_email_sent(template_name, false);
            }
        }
    }

    /// Merges branding placeholders and the current year into the data map.
    /// Caller-supplied values win over branding defaults.
    async fn merge_branding(&self, data: &mut HashMap<String, String>) {
        let branding = match self.branding.get().await {
            Ok(b) => b,
            Err(e) => {
                error!(error = %e, "Failed to load branding, using defaults");
                domain::models::Branding::default()
            }
        };

        data.entry("primary_color".to_string())
            .or_insert(branding.primary_color);
        data.entry("secondary_color".to_string())
            .or_insert(branding.secondary_color);
        data.entry("logo_url".to_string()).or_insert(branding.logo_url);
        data.entry("portal_name".to_string())
            .or_insert(branding.portal_name);
        data.entry("year".to_string())
            .or_insert_with(|| chrono::Utc::now().format("%Y").to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::{CustomService, UserRole};
    use uuid::Uuid;

    #[test]
    fn test_user_template_data() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "alice@demo.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
            subscription_expiration: Some(now + chrono::Duration::days(3)),
            xc_username: Some("alice_xc".to_string()),
            xc_password: Some("secret".to_string()),
            server_url: Some("http://stream.example.com".to_string()),
            vod_enabled: true,
            custom_services: vec![CustomService {
                name: "Premium".to_string(),
                enabled: true,
            }],
            referral_code: "aliceref".to_string(),
            preferences: serde_json::json!({}),
            trial_status: false,
            payment_status: None,
            created_at: now,
            updated_at: now,
        };

        let data = user_template_data(&user);
        assert_eq!(data["username"], "alice");
        assert_eq!(data["vod_enabled"], "Yes");
        assert_eq!(data["custom_services"], "Premium: true");
        assert_eq!(data["referral_code"], "aliceref");
        assert!(!data["expiration_date"].is_empty());
    }

    #[test]
    fn test_options_builders() {
        let opts = DispatchOptions::notify(NotificationKind::TicketReply, "New reply");
        assert!(opts.notification.is_some());
        assert!(!opts.send_email);

        let opts = opts.with_email();
        assert!(opts.send_email);

        let opts = DispatchOptions::email_only();
        assert!(opts.notification.is_none());
        assert!(opts.send_email);
    }
}
