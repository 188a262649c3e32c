//! Referral Hierarchy Builder
//!
//! Builds the referrer-to-referred adjacency structure from the user
//! snapshot plus the supplemental referral-pairs feed. The same edge may
//! be asserted by both sources; it appears at most once in the output.

use std::collections::{HashMap, HashSet};

use crate::models::referral::ReferralPair;
use crate::models::user::User;

/// Adjacency map from user id to directly referred users
pub type Hierarchy = HashMap<String, Vec<User>>;

/// Result of a hierarchy build
///
/// `unresolved` carries pairs that reference ids absent from the user
/// snapshot. This is advisory, not an error: the missing users may arrive
/// in a later snapshot, at which point a rebuild resolves them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HierarchyBuild {
    /// Every known user id maps to its deduplicated referred list
    pub hierarchy: Hierarchy,
    /// Pairs that could not be resolved against the current snapshot
    pub unresolved: Vec<ReferralPair>,
}

/// Build the referral hierarchy from a user snapshot and a pairs feed
///
/// Pass 1 resolves `User::referred_by` back-references; pass 2 folds in
/// the supplemental pairs feed. Edges are deduplicated by referred id per
/// referrer, so a relationship asserted by both sources appears once.
/// Referred lists keep the order edges were first seen in. Idempotent:
/// equal inputs produce structurally equal results.
pub fn build_hierarchy(users: &[User], pairs: &[ReferralPair]) -> HierarchyBuild {
    let by_id: HashMap<&str, &User> = users.iter().map(|user| (user.id.as_str(), user)).collect();

    let mut hierarchy: Hierarchy = users
        .iter()
        .map(|user| (user.id.clone(), Vec::new()))
        .collect();
    let mut seen: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut unresolved = Vec::new();

    // Pass 1: referred_by back-references into known referrers
    for user in users {
        let Some(referrer_id) = user.referred_by.as_deref() else {
            continue;
        };
        if !by_id.contains_key(referrer_id) {
            continue;
        }
        if seen.entry(referrer_id).or_default().insert(user.id.as_str()) {
            if let Some(list) = hierarchy.get_mut(referrer_id) {
                list.push(user.clone());
            }
        }
    }

    // Pass 2: supplemental pairs, resolved against the same snapshot
    for pair in pairs {
        let referrer_known = by_id.contains_key(pair.referrer_id.as_str());
        let referred = by_id.get(pair.referred_id.as_str()).copied();

        match (referrer_known, referred) {
            (true, Some(referred)) => {
                if seen
                    .entry(pair.referrer_id.as_str())
                    .or_default()
                    .insert(referred.id.as_str())
                {
                    if let Some(list) = hierarchy.get_mut(pair.referrer_id.as_str()) {
                        list.push(referred.clone());
                    }
                }
            }
            _ => unresolved.push(pair.clone()),
        }
    }

    HierarchyBuild {
        hierarchy,
        unresolved,
    }
}
