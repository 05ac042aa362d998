//! Grouping suggestions for candidate snippets.

use crate::gain::estimate_gain;
use crate::types::{Group, Snippet, Suggestion, SuggestionKind};

/// Predicts where `candidate` would land among `existing_groups`.
///
/// Groups are keyed uniquely by (kind, location, pages), so at most one
/// group can match. On a match the gain estimate covers the union of that
/// group's members and the candidate; otherwise it covers the candidate
/// alone.
pub fn suggest(candidate: &Snippet, existing_groups: &[Group]) -> Suggestion {
    let key = candidate.group_key();

    match existing_groups.iter().find(|g| g.key == key) {
        Some(group) => {
            let mut codes: Vec<&Snippet> = group.codes.iter().collect();
            codes.push(candidate);

            Suggestion {
                kind: SuggestionKind::ExistingGroup,
                group_key: Some(group.key),
                member_count: Some(group.codes.len()),
                performance_gain: estimate_gain(&codes),
                message: format!(
                    "Will be added to the group \"{}\" with {} existing snippets.",
                    group.display_name(),
                    group.codes.len()
                ),
            }
        }
        None => Suggestion {
            kind: SuggestionKind::NewGroup,
            group_key: None,
            member_count: None,
            performance_gain: estimate_gain(&[candidate]),
            message: format!(
                "A new group will be created for {} in the {} targeting {}.",
                candidate.kind.display_name(),
                candidate.location.display_name(),
                candidate.pages.label()
            ),
        },
    }
}
