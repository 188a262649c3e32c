//! Hierarchy Analytics
//!
//! Statistics over a built referral hierarchy and the filtered, sorted,
//! paginated user view the customer table renders from. All functions are
//! pure over the snapshots they are given; parameter validation happens at
//! the service boundary before these run.

use std::collections::HashSet;

use crate::config::StatsConfig;
use crate::models::requests::{HierarchyStats, SortDirection, SortKey, UserPage, UserRow};
use crate::models::user::User;
use crate::service::hierarchy::Hierarchy;

/// Already-validated parameters for the paginated user view
///
/// Produced from a `UserViewQuery` by the service boundary. `search` is
/// pre-normalized (trimmed, lowercased) and `page`/`page_size` are
/// positive.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub search: Option<String>,
    pub sort_by: SortKey,
    pub direction: SortDirection,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            search: None,
            sort_by: SortKey::default(),
            direction: SortDirection::default(),
            page: 1,
            page_size: 25,
        }
    }
}

/// Compute aggregate statistics over the hierarchy
pub fn analyze(users: &[User], hierarchy: &Hierarchy, config: &StatsConfig) -> HierarchyStats {
    let users_with_referrals = hierarchy.values().filter(|list| !list.is_empty()).count();
    let users_referred = users.iter().filter(|u| u.referred_by.is_some()).count();

    HierarchyStats {
        total_users: users.len(),
        users_with_referrals,
        users_referred,
        max_depth: max_depth(users, hierarchy),
        top_referrers: top_referrers(users, hierarchy, config.top_referrers_limit),
    }
}

/// Top referrers by direct referral count, descending
///
/// Ties break by earlier account creation. Users with no referrals are
/// not referrers and never appear.
fn top_referrers(users: &[User], hierarchy: &Hierarchy, limit: usize) -> Vec<UserRow> {
    let mut referrers: Vec<UserRow> = users
        .iter()
        .map(|user| UserRow::from_user(user, referral_count(hierarchy, &user.id)))
        .filter(|row| row.referral_count > 0)
        .collect();

    referrers.sort_by(|a, b| {
        b.referral_count
            .cmp(&a.referral_count)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    referrers.truncate(limit);
    referrers
}

/// Longest referrer-to-referred chain reachable from any root user
///
/// Roots are users with no referrer. Each traversal carries its own
/// visited set; a repeated node truncates that path instead of recursing
/// forever, so cyclic input terminates.
fn max_depth(users: &[User], hierarchy: &Hierarchy) -> usize {
    users
        .iter()
        .filter(|user| user.referred_by.is_none())
        .map(|root| {
            let mut visiting = HashSet::new();
            chain_depth(&root.id, hierarchy, &mut visiting)
        })
        .max()
        .unwrap_or(0)
}

fn chain_depth<'a>(
    user_id: &'a str,
    hierarchy: &'a Hierarchy,
    visiting: &mut HashSet<&'a str>,
) -> usize {
    if !visiting.insert(user_id) {
        // Cycle: truncate at the repeated node
        return 0;
    }

    let depth = hierarchy
        .get(user_id)
        .map(|referred| {
            referred
                .iter()
                .map(|child| 1 + chain_depth(&child.id, hierarchy, visiting))
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);

    visiting.remove(user_id);
    depth
}

fn referral_count(hierarchy: &Hierarchy, user_id: &str) -> usize {
    hierarchy.get(user_id).map(Vec::len).unwrap_or(0)
}

/// Filtered, sorted, paginated view over the user snapshot
///
/// The sort is stable: rows with equal keys keep their snapshot order. A
/// page past the end of the result set comes back empty rather than
/// erroring, so a live refresh that shrinks the result set cannot break
/// an open pagination UI.
pub fn user_view(users: &[User], hierarchy: &Hierarchy, options: &ViewOptions) -> UserPage {
    let page_size = options.page_size.max(1);
    let page = options.page.max(1);

    let mut rows: Vec<UserRow> = users
        .iter()
        .filter(|user| match options.search.as_deref() {
            Some(term) => user.matches_search(term),
            None => true,
        })
        .map(|user| UserRow::from_user(user, referral_count(hierarchy, &user.id)))
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match options.sort_by {
            SortKey::Name => full_name_key(a).cmp(&full_name_key(b)),
            SortKey::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::ReferralCount => a.referral_count.cmp(&b.referral_count),
        };
        match options.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    let total_count = rows.len();
    let total_pages = total_count.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size);
    let users = if start >= rows.len() {
        Vec::new()
    } else {
        let end = (start + page_size).min(rows.len());
        rows[start..end].to_vec()
    };

    UserPage {
        users,
        total_count,
        page,
        page_size,
        total_pages,
    }
}

fn full_name_key(row: &UserRow) -> String {
    format!("{} {}", row.first_name.trim(), row.last_name.trim())
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::referral::ReferralPair;
    use crate::service::hierarchy::build_hierarchy;
    use chrono::{TimeZone, Utc};

    fn create_test_user(id: &str, referred_by: Option<&str>, day: u32) -> User {
        User {
            id: id.to_string(),
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            email: format!("{}@example.com", id),
            referred_by: referred_by.map(str::to_string),
            referral_code: Some(format!("CODE{}", id.to_uppercase())),
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        }
    }

    fn chain_users() -> Vec<User> {
        vec![
            create_test_user("a", None, 1),
            create_test_user("b", Some("a"), 2),
            create_test_user("c", Some("a"), 3),
            create_test_user("d", Some("b"), 4),
        ]
    }

    #[test]
    fn test_analyze_referral_chain() {
        let users = chain_users();
        let build = build_hierarchy(&users, &[]);
        let stats = analyze(&users, &build.hierarchy, &StatsConfig::default());

        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.users_with_referrals, 2); // a and b
        assert_eq!(stats.users_referred, 3); // b, c, d
        assert_eq!(stats.max_depth, 2); // a -> b -> d

        assert_eq!(stats.top_referrers.len(), 2);
        assert_eq!(stats.top_referrers[0].id, "a");
        assert_eq!(stats.top_referrers[0].referral_count, 2);
        assert_eq!(stats.top_referrers[1].id, "b");
    }

    #[test]
    fn test_analyze_empty_snapshot() {
        let build = build_hierarchy(&[], &[]);
        let stats = analyze(&[], &build.hierarchy, &StatsConfig::default());

        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.max_depth, 0);
        assert!(stats.top_referrers.is_empty());
    }

    #[test]
    fn test_max_depth_zero_without_referrals() {
        let users = vec![create_test_user("a", None, 1), create_test_user("b", None, 2)];
        let build = build_hierarchy(&users, &[]);
        let stats = analyze(&users, &build.hierarchy, &StatsConfig::default());

        assert_eq!(stats.max_depth, 0);
    }

    #[test]
    fn test_depth_terminates_on_cycle() {
        // a refers b by back-reference; the pairs feed asserts b refers a
        let users = vec![create_test_user("a", None, 1), create_test_user("b", Some("a"), 2)];
        let pairs = vec![ReferralPair::new("b", "a")];
        let build = build_hierarchy(&users, &pairs);

        let stats = analyze(&users, &build.hierarchy, &StatsConfig::default());

        // a -> b, then the repeated node truncates the path
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_top_referrers_tie_breaks_by_created_at() {
        // x and y each referred one user; y is the older account
        let users = vec![
            create_test_user("y", None, 1),
            create_test_user("x", None, 5),
            create_test_user("p", Some("x"), 6),
            create_test_user("q", Some("y"), 7),
        ];
        let build = build_hierarchy(&users, &[]);
        let stats = analyze(&users, &build.hierarchy, &StatsConfig::default());

        assert_eq!(stats.top_referrers[0].id, "y");
        assert_eq!(stats.top_referrers[1].id, "x");
    }

    #[test]
    fn test_top_referrers_respects_limit() {
        let mut users: Vec<User> = (0..8)
            .map(|i| create_test_user(&format!("r{}", i), None, i + 1))
            .collect();
        for i in 0..8 {
            users.push(create_test_user(
                &format!("child{}", i),
                Some(&format!("r{}", i)),
                20,
            ));
        }
        let build = build_hierarchy(&users, &[]);
        let stats = analyze(
            &users,
            &build.hierarchy,
            &StatsConfig {
                top_referrers_limit: 3,
            },
        );

        assert_eq!(stats.top_referrers.len(), 3);
    }

    #[test]
    fn test_view_search_filters_across_fields() {
        let users = chain_users();
        let build = build_hierarchy(&users, &[]);

        let by_name = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                search: Some("firstb".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_name.total_count, 1);
        assert_eq!(by_name.users[0].id, "b");

        let by_code = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                search: Some("codec".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_code.total_count, 1);
        assert_eq!(by_code.users[0].id, "c");

        let by_email = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                search: Some("d@example".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_email.total_count, 1);
        assert_eq!(by_email.users[0].id, "d");
    }

    #[test]
    fn test_view_sort_by_referral_count_descending() {
        let users = chain_users();
        let build = build_hierarchy(&users, &[]);

        let page = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                sort_by: SortKey::ReferralCount,
                direction: SortDirection::Descending,
                ..Default::default()
            },
        );

        assert_eq!(page.users[0].id, "a"); // 2 referrals
        assert_eq!(page.users[1].id, "b"); // 1 referral
        // c and d both have zero; snapshot order is preserved
        assert_eq!(page.users[2].id, "c");
        assert_eq!(page.users[3].id, "d");
    }

    #[test]
    fn test_view_sort_is_stable_on_ties() {
        // All four users share a creation date via equal sort keys
        let mut users = chain_users();
        for user in &mut users {
            user.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        }
        let build = build_hierarchy(&users, &[]);

        let page = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                sort_by: SortKey::CreatedAt,
                ..Default::default()
            },
        );

        let ids: Vec<&str> = page.users.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_view_pagination() {
        let users = chain_users();
        let build = build_hierarchy(&users, &[]);

        let first = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                sort_by: SortKey::CreatedAt,
                page: 1,
                page_size: 3,
                ..Default::default()
            },
        );
        assert_eq!(first.users.len(), 3);
        assert_eq!(first.total_count, 4);
        assert_eq!(first.total_pages, 2);

        let second = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                sort_by: SortKey::CreatedAt,
                page: 2,
                page_size: 3,
                ..Default::default()
            },
        );
        assert_eq!(second.users.len(), 1);
        assert_eq!(second.users[0].id, "d");

        // Past the end: empty page, same totals
        let past = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                page: 9,
                page_size: 3,
                ..Default::default()
            },
        );
        assert!(past.users.is_empty());
        assert_eq!(past.total_count, 4);
    }

    #[test]
    fn test_view_empty_result() {
        let users = chain_users();
        let build = build_hierarchy(&users, &[]);

        let page = user_view(
            &users,
            &build.hierarchy,
            &ViewOptions {
                search: Some("zzz".to_string()),
                ..Default::default()
            },
        );

        assert!(page.users.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }
}
