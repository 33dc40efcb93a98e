use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

/// Returns true for a `#rrggbb` hex color string.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Portal branding. A single row, upserted by admins, merged into every
/// templated email as `{primary_color}`, `{secondary_color}` and `{logo_url}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: String,
    pub portal_name: String,
    pub updated_at: DateTime<Utc>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary_color: "#1a73e8".to_string(),
            secondary_color: "#f5f5f5".to_string(),
            logo_url: String::new(),
            portal_name: "Portal".to_string(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_validation() {
        assert!(is_hex_color("#1a73e8"));
        assert!(is_hex_color("#FFFFFF"));
        assert!(!is_hex_color("1a73e8"));
        assert!(!is_hex_color("#fff"));
        assert!(!is_hex_color("#1a73e8ff"));
        assert!(!is_hex_color("#gggggg"));
    }
}
