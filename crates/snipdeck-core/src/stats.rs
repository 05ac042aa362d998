//! Dashboard counters over the active snippet set.

use crate::gain::estimate_gain;
use crate::grouping::{compute_groups, PagePriorities};
use crate::types::{DashboardStats, Snippet};

/// Recomputes the dashboard counters.
///
/// Counts and sizes cover active snippets only. The gain estimate applies
/// the group formula to the entire active population, and is 0 when no
/// active content exists. Callers re-run this after every store mutation;
/// nothing is cached.
pub fn compute_stats(snippets: &[Snippet], priorities: &PagePriorities) -> DashboardStats {
    let active: Vec<&Snippet> = snippets.iter().filter(|s| s.active).collect();
    let groups = compute_groups(snippets, priorities);
    let gain = estimate_gain(&active);

    DashboardStats {
        total_active_codes: active.len(),
        total_active_groups: groups.len(),
        total_minified_size: gain.minified_size,
        estimated_performance_gain: gain.total_gain,
    }
}
