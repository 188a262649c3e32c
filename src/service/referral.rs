//! Referral Service Implementation
//!
//! The snapshot boundary between external data sources and the pure
//! hierarchy/reward logic. Collaborators push fresh snapshots in; the
//! service never initiates I/O. Because every query runs over the snapshot
//! it holds, callers simply re-query after pushing an update.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use validator::Validate;

use crate::config::AppConfig;
use crate::models::referral::ReferralPair;
use crate::models::requests::{HierarchyStats, UserPage, UserViewQuery};
use crate::models::reward::NormalizedReward;
use crate::models::user::User;
use crate::service::analytics::{self, ViewOptions};
use crate::service::hierarchy::{build_hierarchy, Hierarchy};
use crate::service::rewards;
use crate::utils::error::AppError;
use crate::utils::validation::{normalize_email, normalize_search_term, validate_referral_code};

/// Custom error types for the referral service
#[derive(Error, Debug)]
pub enum ReferralServiceError {
    /// User with the specified identifier was not found in the snapshot
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// View query validation failed with detailed error message
    #[error("Invalid view query: {0}")]
    InvalidQuery(String),
}

impl From<ReferralServiceError> for AppError {
    fn from(err: ReferralServiceError) -> Self {
        match err {
            ReferralServiceError::UserNotFound(id) => {
                AppError::NotFound(format!("User not found: {}", id))
            }
            ReferralServiceError::InvalidQuery(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for referral service operations
pub type ReferralServiceResult<T> = Result<T, ReferralServiceError>;

/// Core referral service holding the latest pushed snapshots
///
/// Owns no connections and spawns nothing. The hierarchy is rebuilt
/// whenever the users or pairs snapshot changes, so queries are cheap and
/// consistent with the data that was last pushed.
pub struct ReferralService {
    /// Tunables for the view and statistics surfaces
    config: AppConfig,

    /// Latest user snapshot, sanitized on ingest
    users: Vec<User>,

    /// Latest supplemental referral-pairs feed
    pairs: Vec<ReferralPair>,

    /// Normalized rewards per user id
    rewards: HashMap<String, Vec<NormalizedReward>>,

    /// Adjacency built from `users` and `pairs`
    hierarchy: Hierarchy,

    /// Pairs that did not resolve against the current user snapshot
    unresolved: Vec<ReferralPair>,
}

impl ReferralService {
    /// Creates a new referral service with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Creates a new referral service with the provided configuration
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            users: Vec::new(),
            pairs: Vec::new(),
            rewards: HashMap::new(),
            hierarchy: Hierarchy::new(),
            unresolved: Vec::new(),
        }
    }

    /// Replaces the user snapshot and rebuilds the hierarchy
    ///
    /// Ingest sanitation: emails are normalized to lowercase and referral
    /// codes that fail the format check are dropped to `None`. The feeds
    /// this snapshot comes from disagree on hygiene, so it is enforced
    /// here once.
    pub fn update_users(&mut self, mut users: Vec<User>) {
        let mut dropped_codes = 0usize;
        for user in &mut users {
            user.email = normalize_email(&user.email);
            if let Some(code) = user.referral_code.as_deref() {
                if !validate_referral_code(code) {
                    user.referral_code = None;
                    dropped_codes += 1;
                }
            }
        }

        if dropped_codes > 0 {
            warn!(
                "user snapshot carried {} malformed referral codes, dropped",
                dropped_codes
            );
        }
        info!("user snapshot replaced: {} users", users.len());

        self.users = users;
        self.rebuild();
    }

    /// Replaces the supplemental referral-pairs feed and rebuilds
    pub fn update_referral_pairs(&mut self, pairs: Vec<ReferralPair>) {
        debug!("referral pairs feed replaced: {} pairs", pairs.len());
        self.pairs = pairs;
        self.rebuild();
    }

    /// Replaces one user's raw reward feed with its normalized form
    ///
    /// This is the single normalization boundary: raw records from any
    /// backend enter here and only `NormalizedReward` is stored.
    pub fn update_rewards(&mut self, user_id: impl Into<String>, raw_rewards: &[Value]) {
        let user_id = user_id.into();
        let normalized = rewards::normalize_all(raw_rewards);
        debug!(
            "rewards replaced for {}: {} records",
            user_id,
            normalized.len()
        );
        self.rewards.insert(user_id, normalized);
    }

    /// Aggregate statistics over the current hierarchy
    pub fn stats(&self) -> HierarchyStats {
        analytics::analyze(&self.users, &self.hierarchy, &self.config.stats)
    }

    /// Filtered, sorted, paginated view over the current user snapshot
    pub fn user_view(&self, query: &UserViewQuery) -> ReferralServiceResult<UserPage> {
        let options = self.resolve_view_options(query)?;
        Ok(analytics::user_view(&self.users, &self.hierarchy, &options))
    }

    /// Redeemable monetary balance for a user at `now`
    ///
    /// A user without a reward feed, including one absent from the user
    /// snapshot entirely, has a balance of zero.
    pub fn available_balance(&self, user_id: &str, now: DateTime<Utc>) -> f64 {
        match self.rewards.get(user_id) {
            Some(rewards) => rewards::available_balance(rewards, now),
            None => {
                debug!("no reward feed for {}, balance is zero", user_id);
                0.0
            }
        }
    }

    /// Users directly referred by the given user
    pub fn direct_referrals(&self, user_id: &str) -> ReferralServiceResult<&[User]> {
        self.hierarchy
            .get(user_id)
            .map(Vec::as_slice)
            .ok_or_else(|| ReferralServiceError::UserNotFound(user_id.to_string()))
    }

    /// Looks up a user by id in the current snapshot
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    /// The current user snapshot
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// The current adjacency map, for tree rendering
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Pairs awaiting resolution against a future user snapshot
    ///
    /// Advisory: these are not errors. They clear on their own once the
    /// referenced users arrive.
    pub fn unresolved_pairs(&self) -> &[ReferralPair] {
        &self.unresolved
    }

    fn rebuild(&mut self) {
        let build = build_hierarchy(&self.users, &self.pairs);
        self.hierarchy = build.hierarchy;
        self.unresolved = build.unresolved;

        if !self.unresolved.is_empty() {
            debug!(
                "{} referral pairs deferred awaiting user records",
                self.unresolved.len()
            );
        }
    }

    fn resolve_view_options(&self, query: &UserViewQuery) -> ReferralServiceResult<ViewOptions> {
        query
            .validate()
            .map_err(|e| ReferralServiceError::InvalidQuery(e.to_string()))?;

        let page_size = query
            .page_size
            .map(|size| size as usize)
            .unwrap_or(self.config.view.default_page_size);
        if page_size > self.config.view.max_page_size {
            return Err(ReferralServiceError::InvalidQuery(format!(
                "Page size {} exceeds the maximum of {}",
                page_size, self.config.view.max_page_size
            )));
        }

        let search = query
            .search
            .as_deref()
            .map(normalize_search_term)
            .filter(|term| !term.is_empty());

        Ok(ViewOptions {
            search,
            sort_by: query.sort_by,
            direction: query.direction,
            page: query.page.map(|page| page as usize).unwrap_or(1),
            page_size,
        })
    }
}

impl Default for ReferralService {
    fn default() -> Self {
        Self::new()
    }
}
