//! User Model
//!
//! Core user data structures for the referral snapshot feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer record as delivered by the user snapshot feed
///
/// Identifiers are opaque document-store strings; the crate never parses
/// them. `referred_by` is a weak back-reference resolved against the same
/// snapshot, set once at signup and never mutated afterwards. The serde
/// aliases accept the camelCase key names used by the upstream feeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique identifier for the user
    pub id: String,

    /// User's first name
    #[serde(alias = "firstName", default)]
    pub first_name: String,

    /// User's last name
    #[serde(alias = "lastName", default)]
    pub last_name: String,

    /// User's email address
    #[serde(default)]
    pub email: String,

    /// Id of the user whose referral caused this signup, if any
    #[serde(alias = "referredBy", default)]
    pub referred_by: Option<String>,

    /// This user's own referral code, if one was issued
    #[serde(alias = "referralCode", default)]
    pub referral_code: Option<String>,

    /// Timestamp when the user account was created
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full display name, with empty name parts collapsed
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        full.trim().to_string()
    }

    /// Case-insensitive substring match over name, email, and referral code
    ///
    /// The term is expected to be already normalized (trimmed, lowercased);
    /// see `utils::validation::normalize_search_term`.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }

        self.first_name.to_lowercase().contains(term)
            || self.last_name.to_lowercase().contains(term)
            || self.full_name().to_lowercase().contains(term)
            || self.email.to_lowercase().contains(term)
            || self
                .referral_code
                .as_deref()
                .map(|code| code.to_lowercase().contains(term))
                .unwrap_or(false)
    }
}
