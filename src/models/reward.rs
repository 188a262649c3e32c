//! Reward Models
//!
//! The canonical reward record every heterogeneous upstream shape is
//! normalized into, and the availability/contribution rules defined on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    /// Reward can still be applied to a purchase
    Available,
    /// Reward was consumed
    Redeemed,
    /// Reward lapsed before use
    Expired,
}

impl RewardStatus {
    /// Parse a status label from an upstream feed
    ///
    /// Labels are matched after trimming and lowercasing. `"used"` is the
    /// relational API's spelling of redeemed. Unknown labels return `None`
    /// and the normalizer decides the fallback.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "redeemed" | "used" => Some(Self::Redeemed),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Canonical reward record
///
/// Produced exclusively by `service::rewards::normalize`; the rest of the
/// crate never sees raw upstream shapes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedReward {
    /// Upstream identifier, when one was present
    pub id: Option<String>,

    /// Monetary or point amount, already coerced to a number
    pub amount: f64,

    /// Lower-cased reward kind label, `"unknown"` when absent
    pub kind: String,

    /// Lifecycle status
    pub status: RewardStatus,

    /// When the reward was issued, if the source said
    pub created_at: Option<DateTime<Utc>>,

    /// When the reward lapses; `None` means it never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl NormalizedReward {
    /// Zero-value placeholder for inputs that are not even objects
    ///
    /// Carries `Expired` status so it can never count as available.
    pub fn unknown() -> Self {
        Self {
            id: None,
            amount: 0.0,
            kind: "unknown".to_string(),
            status: RewardStatus::Expired,
            created_at: None,
            expires_at: None,
        }
    }

    /// Whether this reward can currently be applied
    ///
    /// Available means status `Available` and not past `expires_at`. A
    /// reward expiring exactly at `now` is still available.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.status == RewardStatus::Available
            && self.expires_at.map(|expires| expires >= now).unwrap_or(true)
    }

    /// How much this reward adds to a monetary balance
    ///
    /// Percentage-typed kinds (percent credits, percent discounts) and
    /// point kinds are ratios or loyalty units, not money, and contribute
    /// nothing. Credits, fixed discounts, and unrecognized kinds count at
    /// face value.
    pub fn balance_contribution(&self) -> f64 {
        let kind = self.kind.as_str();
        if kind.contains("percent") || kind.contains("point") {
            0.0
        } else {
            self.amount
        }
    }
}
