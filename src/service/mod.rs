//! Service Layer
//!
//! Business logic for the referral service: reward normalization and
//! aggregation, hierarchy construction, analytics, and the snapshot
//! facade that ties them together.

pub mod analytics;
pub mod hierarchy;
pub mod referral;
pub mod rewards;

// Re-export services
pub use hierarchy::{build_hierarchy, Hierarchy, HierarchyBuild};
pub use referral::{ReferralService, ReferralServiceError, ReferralServiceResult};
