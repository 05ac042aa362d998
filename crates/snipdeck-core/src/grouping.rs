//! Deterministic grouping of active snippets into asset bundles.

use crate::filenames::group_filename;
use crate::gain::minified_estimate;
use crate::types::{Group, GroupKey, PageScope, Snippet};
use std::collections::HashMap;

/// Priority used for pages missing from the table (sorts last).
pub const DEFAULT_PAGE_PRIORITY: u8 = 5;

/// Per-page sort priorities.
///
/// Seeded from the catalog defaults; configuration may override individual
/// pages. Lookups for pages absent from the table fall back to
/// [`DEFAULT_PAGE_PRIORITY`].
#[derive(Debug, Clone)]
pub struct PagePriorities {
    table: HashMap<PageScope, u8>,
}

impl Default for PagePriorities {
    fn default() -> Self {
        Self {
            table: PageScope::all().iter().map(|p| (*p, p.priority())).collect(),
        }
    }
}

impl PagePriorities {
    /// Catalog defaults with individual pages overridden.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (PageScope, u8)>,
    {
        let mut priorities = Self::default();
        priorities.table.extend(overrides);
        priorities
    }

    /// Sort priority for one page scope.
    pub fn priority(&self, pages: PageScope) -> u8 {
        self.table
            .get(&pages)
            .copied()
            .unwrap_or(DEFAULT_PAGE_PRIORITY)
    }
}

/// Partitions the active snippets into groups keyed by
/// (kind, location, pages).
///
/// Inactive snippets never contribute. Members keep store order inside
/// their group, and sizes accumulate per member
/// (`minified_size` uses the fixed 70%-reduction estimate). The result is
/// sorted by kind, then location, then page priority; ties preserve first
/// appearance order, so the same input always yields the same output.
///
/// Pure function, total over any input; an empty slice yields an empty
/// vector. Callers own storing the result.
pub fn compute_groups(snippets: &[Snippet], priorities: &PagePriorities) -> Vec<Group> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut by_key: HashMap<GroupKey, Group> = HashMap::new();

    for snippet in snippets.iter().filter(|s| s.active) {
        let key = snippet.group_key();
        let group = by_key.entry(key).or_insert_with(|| {
            order.push(key);
            Group {
                key,
                kind: snippet.kind,
                location: snippet.location,
                pages: snippet.pages,
                codes: Vec::new(),
                filename: group_filename(snippet.kind, snippet.location, snippet.pages),
                total_size: 0,
                minified_size: 0,
            }
        });

        group.codes.push(snippet.clone());
        group.total_size += snippet.content.len();
        group.minified_size += minified_estimate(snippet.content.len());
    }

    let mut groups: Vec<Group> = order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect();

    // Stable sort keeps insertion order within equal sort keys.
    groups.sort_by(|a, b| {
        a.kind
            .cli_name()
            .cmp(b.kind.cli_name())
            .then_with(|| a.location.cli_name().cmp(b.location.cli_name()))
            .then_with(|| priorities.priority(a.pages).cmp(&priorities.priority(b.pages)))
    });

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, SnippetKind};
    use chrono::Utc;
    use uuid::Uuid;

    fn snippet(
        name: &str,
        content: &str,
        kind: SnippetKind,
        location: Location,
        pages: PageScope,
    ) -> Snippet {
        Snippet {
            id: Uuid::new_v4(),
            name: name.to_string(),
            content: content.to_string(),
            kind,
            location,
            pages,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let groups = compute_groups(&[], &PagePriorities::default());
        assert!(groups.is_empty());
    }

    #[test]
    fn same_key_snippets_share_one_group() {
        let snippets = vec![
            snippet(
                "a",
                &"x".repeat(100),
                SnippetKind::Css,
                Location::Head,
                PageScope::All,
            ),
            snippet(
                "b",
                &"y".repeat(300),
                SnippetKind::Css,
                Location::Head,
                PageScope::All,
            ),
        ];

        let groups = compute_groups(&snippets, &PagePriorities::default());

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.codes.len(), 2);
        assert_eq!(group.total_size, 400);
        assert_eq!(group.minified_size, 120);
        assert_eq!(group.filename, "css-head-allpages.min.css");
        assert_eq!(group.codes[0].name, "a");
        assert_eq!(group.codes[1].name, "b");
    }

    #[test]
    fn inactive_snippets_are_excluded() {
        let mut inactive = snippet(
            "off",
            ".x{}",
            SnippetKind::Css,
            Location::Head,
            PageScope::All,
        );
        inactive.active = false;
        let active = snippet(
            "on",
            ".y{}",
            SnippetKind::Css,
            Location::Head,
            PageScope::All,
        );

        let groups = compute_groups(&[inactive, active], &PagePriorities::default());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].codes.len(), 1);
        assert_eq!(groups[0].codes[0].name, "on");
    }

    #[test]
    fn deactivating_sole_member_removes_the_group() {
        let mut only = snippet(
            "only",
            ".x{}",
            SnippetKind::Js,
            Location::Footer,
            PageScope::Cart,
        );

        let before = compute_groups(std::slice::from_ref(&only), &PagePriorities::default());
        assert_eq!(before.len(), 1);

        only.active = false;
        let after = compute_groups(std::slice::from_ref(&only), &PagePriorities::default());
        assert!(after.is_empty());

        only.active = true;
        let restored = compute_groups(std::slice::from_ref(&only), &PagePriorities::default());
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].key, before[0].key);
        assert_eq!(restored[0].filename, before[0].filename);
    }

    #[test]
    fn groups_sort_by_kind_location_then_page_priority() {
        let snippets = vec![
            snippet(
                "account js",
                "a()",
                SnippetKind::Js,
                Location::Footer,
                PageScope::Account,
            ),
            snippet(
                "home css",
                ".h{}",
                SnippetKind::Css,
                Location::Head,
                PageScope::Home,
            ),
            snippet(
                "all css",
                ".a{}",
                SnippetKind::Css,
                Location::Head,
                PageScope::All,
            ),
            snippet(
                "footer css",
                ".f{}",
                SnippetKind::Css,
                Location::Footer,
                PageScope::All,
            ),
        ];

        let groups = compute_groups(&snippets, &PagePriorities::default());
        let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();

        assert_eq!(
            keys,
            vec![
                "css-footer-all".to_string(),
                "css-head-all".to_string(),
                "css-head-home".to_string(),
                "js-footer-account".to_string(),
            ]
        );
    }

    #[test]
    fn priority_overrides_reorder_groups() {
        let snippets = vec![
            snippet(
                "all",
                ".a{}",
                SnippetKind::Css,
                Location::Head,
                PageScope::All,
            ),
            snippet(
                "checkout",
                ".c{}",
                SnippetKind::Css,
                Location::Head,
                PageScope::Checkout,
            ),
        ];

        let promoted = PagePriorities::with_overrides([(PageScope::Checkout, 0)]);
        let groups = compute_groups(&snippets, &promoted);

        assert_eq!(groups[0].pages, PageScope::Checkout);
        assert_eq!(groups[1].pages, PageScope::All);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let snippets = vec![
            snippet(
                "one",
                ".one{}",
                SnippetKind::Css,
                Location::Head,
                PageScope::Product,
            ),
            snippet(
                "two",
                "two()",
                SnippetKind::Js,
                Location::Head,
                PageScope::All,
            ),
            snippet(
                "three",
                ".three{}",
                SnippetKind::Css,
                Location::Head,
                PageScope::Product,
            ),
        ];

        let first = compute_groups(&snippets, &PagePriorities::default());
        let second = compute_groups(&snippets, &PagePriorities::default());

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.key, b.key);
            assert_eq!(a.filename, b.filename);
            let a_ids: Vec<Uuid> = a.codes.iter().map(|c| c.id).collect();
            let b_ids: Vec<Uuid> = b.codes.iter().map(|c| c.id).collect();
            assert_eq!(a_ids, b_ids);
        }
    }

    #[cfg(feature = "property-tests")]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn kind_strategy() -> impl Strategy<Value = SnippetKind> {
            prop::sample::select(SnippetKind::all().to_vec())
        }

        fn location_strategy() -> impl Strategy<Value = Location> {
            prop::sample::select(Location::all().to_vec())
        }

        fn pages_strategy() -> impl Strategy<Value = PageScope> {
            prop::sample::select(PageScope::all().to_vec())
        }

        fn snippet_strategy() -> impl Strategy<Value = Snippet> {
            (
                kind_strategy(),
                location_strategy(),
                pages_strategy(),
                0usize..500,
                any::<bool>(),
            )
                .prop_map(|(kind, location, pages, len, active)| {
                    let mut s = snippet("gen", &"z".repeat(len), kind, location, pages);
                    s.active = active;
                    s
                })
        }

        proptest! {
            #[test]
            fn partition_is_total_and_non_overlapping(
                snippets in prop::collection::vec(snippet_strategy(), 0..40)
            ) {
                let groups = compute_groups(&snippets, &PagePriorities::default());

                let grouped: usize = groups.iter().map(|g| g.codes.len()).sum();
                let active = snippets.iter().filter(|s| s.active).count();
                prop_assert_eq!(grouped, active);

                let mut keys: Vec<GroupKey> = groups.iter().map(|g| g.key).collect();
                let total_keys = keys.len();
                keys.sort_by_key(|k| k.to_string());
                keys.dedup();
                prop_assert_eq!(keys.len(), total_keys);
            }

            #[test]
            fn members_match_their_group_key(
                snippets in prop::collection::vec(snippet_strategy(), 0..40)
            ) {
                let groups = compute_groups(&snippets, &PagePriorities::default());

                for group in &groups {
                    prop_assert!(!group.codes.is_empty());
                    for member in &group.codes {
                        prop_assert_eq!(member.group_key(), group.key);
                        prop_assert!(member.active);
                    }
                    let expected: usize =
                        group.codes.iter().map(|c| c.content.len()).sum();
                    prop_assert_eq!(group.total_size, expected);
                }
            }
        }
    }
}
