//! Request and Response Models
//!
//! Query parameters for the paginated user view and the response payloads
//! handed to presentation layers, with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::User;

/// Sort key for the paginated user view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Full name, case-insensitive
    #[default]
    Name,
    /// Email address, case-insensitive
    Email,
    /// Account creation time
    CreatedAt,
    /// Number of direct referrals
    ReferralCount,
}

/// Sort direction for the paginated user view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Query parameters for the filtered, sorted, paginated user view
///
/// `page` is 1-based. Omitted values fall back to the configured defaults.
/// Invalid parameters fail validation with a descriptive error instead of
/// silently misbehaving.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserViewQuery {
    /// Case-insensitive substring matched against first name, last name,
    /// email, and referral code
    #[validate(length(max = 120, message = "Search terms are limited to 120 characters"))]
    pub search: Option<String>,

    /// Column to sort by
    #[serde(alias = "sortBy", default)]
    pub sort_by: SortKey,

    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,

    /// 1-based page number
    #[validate(range(min = 1, message = "Page numbers start at 1"))]
    pub page: Option<u32>,

    /// Rows per page
    #[serde(alias = "pageSize")]
    #[validate(range(min = 1, message = "Page size must be at least 1"))]
    pub page_size: Option<u32>,
}

/// One row of the paginated user view
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub referral_code: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Number of users this user directly referred
    pub referral_count: usize,
}

impl UserRow {
    pub fn from_user(user: &User, referral_count: usize) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            referral_code: user.referral_code.clone(),
            created_at: user.created_at,
            referral_count,
        }
    }
}

/// One page of the user view plus the totals the pagination UI needs
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserPage {
    pub users: Vec<UserRow>,
    /// Total rows matching the filter, across all pages
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Aggregate statistics over the referral hierarchy
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HierarchyStats {
    /// Users in the snapshot
    pub total_users: usize,
    /// Users with at least one direct referral
    pub users_with_referrals: usize,
    /// Users who were themselves referred by someone
    pub users_referred: usize,
    /// Length of the longest referrer-to-referred chain from any root
    pub max_depth: usize,
    /// Top referrers by direct referral count
    pub top_referrers: Vec<UserRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validator::Validate;

    #[test]
    fn test_query_defaults() {
        let query = UserViewQuery::default();
        assert_eq!(query.sort_by, SortKey::Name);
        assert_eq!(query.direction, SortDirection::Ascending);
        assert!(query.page.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_validation_rejects_zero_page() {
        let query = UserViewQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_query_validation_rejects_zero_page_size() {
        let query = UserViewQuery {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_query_validation_rejects_oversized_search() {
        let query = UserViewQuery {
            search: Some("a".repeat(121)),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_query_deserialization() {
        let query: UserViewQuery = serde_json::from_value(json!({
            "search": "ada",
            "sortBy": "referralCount",
            "direction": "desc",
            "page": 2,
            "pageSize": 10
        }))
        .unwrap();

        assert_eq!(query.sort_by, SortKey::ReferralCount);
        assert_eq!(query.direction, SortDirection::Descending);
        assert_eq!(query.page, Some(2));
        assert_eq!(query.page_size, Some(10));
    }

    #[test]
    fn test_sort_key_deserialization() {
        let key: SortKey = serde_json::from_value(json!("createdAt")).unwrap();
        assert_eq!(key, SortKey::CreatedAt);

        let direction: SortDirection = serde_json::from_value(json!("ascending")).unwrap();
        assert_eq!(direction, SortDirection::Ascending);
    }
}
