//! Referral Pair Models
//!
//! The supplemental referral-pairs feed: one record per asserted
//! referrer/referred relationship. The same relationship may also be
//! asserted by `User::referred_by`; the hierarchy builder deduplicates.

use serde::{Deserialize, Serialize};

/// A single referrer/referred relationship from the pairs feed
///
/// The serde aliases cover the key names used by the different sources of
/// this feed. Identity is the (referrer, referred) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReferralPair {
    /// Id of the user whose code caused the signup
    #[serde(alias = "referrerId")]
    pub referrer_id: String,

    /// Id of the user who signed up
    #[serde(alias = "referredId", alias = "referredUserId", alias = "refereeId")]
    pub referred_id: String,
}

impl ReferralPair {
    pub fn new(referrer_id: impl Into<String>, referred_id: impl Into<String>) -> Self {
        Self {
            referrer_id: referrer_id.into(),
            referred_id: referred_id.into(),
        }
    }
}
