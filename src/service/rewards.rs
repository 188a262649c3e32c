//! Reward Normalization and Aggregation
//!
//! Rewards arrive from two backends with different field names and types
//! for the same concepts. Everything is funneled through [`normalize`]
//! once, and the rest of the crate only ever sees [`NormalizedReward`].

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::reward::{NormalizedReward, RewardStatus};
use crate::utils::coerce::{coerce_bool, coerce_datetime, coerce_f64, coerce_string};

/// Field names probed for each canonical concept, in priority order.
/// The document store ships camelCase, the relational API snake_case.
const ID_KEYS: [&str; 3] = ["id", "_id", "rewardId"];
const AMOUNT_KEYS: [&str; 4] = ["amount", "rewardAmount", "reward_amount", "value"];
const KIND_KEYS: [&str; 3] = ["type", "rewardType", "reward_type"];
const CREATED_KEYS: [&str; 2] = ["createdAt", "created_at"];
const EXPIRES_KEYS: [&str; 3] = ["expiresAt", "expires_at", "expiry"];

/// Normalize one raw reward record of unknown shape
///
/// Total: any JSON value is accepted and none panics. Inputs that are not
/// objects become the zero-value placeholder. Within an object, the first
/// present field wins for each concept; a present-but-unreadable field
/// falls back to the concept's default rather than probing further.
///
/// Status resolution order: an explicit `status` label, then the
/// `used`/`redeemed` booleans, then `Available`.
pub fn normalize(raw: &Value) -> NormalizedReward {
    let Some(record) = raw.as_object() else {
        return NormalizedReward::unknown();
    };

    let first_present = |keys: &[&str]| keys.iter().find_map(|key| record.get(*key));

    let id = first_present(&ID_KEYS).and_then(coerce_string);

    let amount = first_present(&AMOUNT_KEYS)
        .and_then(coerce_f64)
        .unwrap_or(0.0);

    let kind = first_present(&KIND_KEYS)
        .and_then(coerce_string)
        .map(|k| k.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());

    let status = first_present(&["status"])
        .and_then(coerce_string)
        .and_then(|label| RewardStatus::from_label(&label))
        .or_else(|| {
            first_present(&["used", "redeemed"])
                .and_then(coerce_bool)
                .map(|consumed| {
                    if consumed {
                        RewardStatus::Redeemed
                    } else {
                        RewardStatus::Available
                    }
                })
        })
        .unwrap_or(RewardStatus::Available);

    let created_at = first_present(&CREATED_KEYS).and_then(coerce_datetime);
    let expires_at = first_present(&EXPIRES_KEYS).and_then(coerce_datetime);

    NormalizedReward {
        id,
        amount,
        kind,
        status,
        created_at,
        expires_at,
    }
}

/// Normalize a merged reward feed
pub fn normalize_all(raw: &[Value]) -> Vec<NormalizedReward> {
    raw.iter().map(normalize).collect()
}

/// Sum the redeemable monetary value of a reward list
///
/// Only rewards that are available at `now` contribute, and each
/// contributes per its kind (percentage and point kinds count as zero).
/// Pure: the same list and `now` always produce the same sum.
pub fn available_balance(rewards: &[NormalizedReward], now: DateTime<Utc>) -> f64 {
    rewards
        .iter()
        .filter(|reward| reward.is_available(now))
        .map(|reward| reward.balance_contribution())
        .sum()
}
