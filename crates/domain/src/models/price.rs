use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Whether a price row is a subscription plan or a one-off add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceKind {
    Subscription,
    Addon,
}

impl PriceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceKind::Subscription => "subscription",
            PriceKind::Addon => "addon",
        }
    }
}

impl FromStr for PriceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscription" => Ok(PriceKind::Subscription),
            "addon" => Ok(PriceKind::Addon),
            _ => Err(format!("Invalid price kind: {}", s)),
        }
    }
}

impl fmt::Display for PriceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A priced plan or add-on shown on the portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: Uuid,
    pub name: String,
    pub kind: PriceKind,
    /// Amount in minor currency units (cents).
    pub amount_cents: i64,
    pub currency: String,
    /// Plan duration in days, None for add-ons.
    pub duration_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Price {
    /// Applies a percentage adjustment, rounding to the nearest cent.
    /// Negative percentages decrease the price; the result never drops
    /// below zero.
    pub fn adjusted_by_percent(&self, percent: f64) -> i64 {
        let adjusted = (self.amount_cents as f64) * (1.0 + percent / 100.0);
        (adjusted.round() as i64).max(0)
    }

    /// Applies a fixed adjustment in cents, clamped at zero.
    pub fn adjusted_by_fixed(&self, delta_cents: i64) -> i64 {
        (self.amount_cents + delta_cents).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(amount_cents: i64) -> Price {
        Price {
            id: Uuid::new_v4(),
            name: "1 Month".to_string(),
            kind: PriceKind::Subscription,
            amount_cents,
            currency: "EUR".to_string(),
            duration_days: Some(30),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_percent_adjustment_rounds() {
        assert_eq!(price(1000).adjusted_by_percent(10.0), 1100);
        assert_eq!(price(999).adjusted_by_percent(10.0), 1099);
        assert_eq!(price(1000).adjusted_by_percent(-25.0), 750);
    }

    #[test]
    fn test_adjustments_clamp_at_zero() {
        assert_eq!(price(1000).adjusted_by_percent(-150.0), 0);
        assert_eq!(price(500).adjusted_by_fixed(-800), 0);
        assert_eq!(price(500).adjusted_by_fixed(250), 750);
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(PriceKind::from_str("subscription").unwrap(), PriceKind::Subscription);
        assert_eq!(PriceKind::from_str("addon").unwrap(), PriceKind::Addon);
        assert!(PriceKind::from_str("plan").is_err());
    }
}
