//! Referral Service Library
//!
//! Referral hierarchy construction, hierarchy analytics, and reward
//! aggregation for the storefront admin console. The crate consumes
//! in-memory snapshots pushed by external data sources (a document store
//! and a relational REST API) and answers the queries the console renders:
//! referral statistics, a filtered/sorted/paginated customer view, and
//! per-customer available reward balances.
//!
//! # Features
//!
//! - **Reward Normalization**: heterogeneous reward records from multiple
//!   backends are funneled through one total, never-panicking boundary
//! - **Reward Aggregation**: available balances computed under per-kind
//!   contribution rules (percentage and point rewards carry no monetary
//!   value)
//! - **Hierarchy Construction**: referrer adjacency built from user
//!   back-references plus a supplemental pairs feed, with edge dedup and
//!   deferred resolution for not-yet-known users
//! - **Hierarchy Analytics**: referral counts, top referrers, cycle-safe
//!   depth computation, and a stable-sorted paginated user view
//! - **Snapshot Driven**: no I/O anywhere; collaborators push snapshots
//!   and re-query
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use referral_service::{ReferralService, User};
//! use serde_json::json;
//!
//! let mut service = ReferralService::new();
//!
//! // A data source pushes the latest user snapshot
//! service.update_users(vec![
//!     User {
//!         id: "a".to_string(),
//!         first_name: "Ada".to_string(),
//!         last_name: "Lovelace".to_string(),
//!         email: "ada@example.com".to_string(),
//!         referred_by: None,
//!         referral_code: Some("ADA123".to_string()),
//!         created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
//!     },
//!     User {
//!         id: "b".to_string(),
//!         first_name: "Grace".to_string(),
//!         last_name: "Hopper".to_string(),
//!         email: "grace@example.com".to_string(),
//!         referred_by: Some("a".to_string()),
//!         referral_code: None,
//!         created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
//!     },
//! ]);
//!
//! // Raw reward records keep their upstream shapes until this boundary
//! service.update_rewards(
//!     "a",
//!     &[json!({"amount": "50", "status": "available", "type": "credit"})],
//! );
//!
//! let stats = service.stats();
//! assert_eq!(stats.total_users, 2);
//! assert_eq!(stats.top_referrers[0].id, "a");
//!
//! assert_eq!(service.available_balance("a", Utc::now()), 50.0);
//! ```
//!
//! # Architecture
//!
//! The library is organized into several layers:
//!
//! - **Models**: user, referral-pair, and normalized-reward records plus
//!   the view query/response types
//! - **Service Layer**: reward normalization and aggregation, hierarchy
//!   construction, analytics, and the [`ReferralService`] snapshot facade
//! - **Utils**: shared error types, input coercion, and validation
//! - **Config**: pagination bounds and statistics tunables with
//!   environment overrides
//!
//! The pure functions under `service` are usable directly when a caller
//! manages its own snapshots; [`ReferralService`] packages them behind a
//! push-snapshots-then-query surface.

/// Configuration management for view and statistics settings
pub mod config;

/// Data models and request/response structures
pub mod models;

/// Business logic: rewards, hierarchy, analytics, and the snapshot facade
pub mod service;

/// Shared utilities for errors, coercion, and validation
pub mod utils;

// Re-export commonly used types for convenient access
pub use config::{AppConfig, StatsConfig, ViewConfig};
pub use models::{
    referral::ReferralPair,
    requests::{HierarchyStats, SortDirection, SortKey, UserPage, UserRow, UserViewQuery},
    reward::{NormalizedReward, RewardStatus},
    user::User,
};
pub use service::{
    analytics::{analyze, user_view, ViewOptions},
    hierarchy::{build_hierarchy, Hierarchy, HierarchyBuild},
    rewards::{available_balance, normalize, normalize_all},
    ReferralService, ReferralServiceError, ReferralServiceResult,
};
pub use utils::error::{AppError, AppResult, ErrorResponse};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
