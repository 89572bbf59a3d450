//! Presentation grouping.
//!
//! Splits a ranked list into one primary suggestion and up to two secondary
//! ones. The primary slot is reserved for high-priority candidates; when
//! none survived the pipeline the turn simply has no headline suggestion.

use serde::{Deserialize, Serialize};

use crate::suggestions::scoring::ScoredSuggestion;
use crate::suggestions::types::{Suggestion, SuggestionPriority};

/// Secondary slots available per turn.
const SECONDARY_SLOTS: usize = 2;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionGroups {
    pub primary: Option<Suggestion>,
    pub secondary: Vec<Suggestion>,
}

impl SuggestionGroups {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_empty()
    }

    pub fn len(&self) -> usize {
        usize::from(self.primary.is_some()) + self.secondary.len()
    }
}

/// Group an already ranked list. The primary is the best-scoring
/// high-priority candidate; the secondaries are the next best of whatever
/// remains, in rank order.
pub fn group(ranked: Vec<ScoredSuggestion>) -> SuggestionGroups {
    let mut suggestions: Vec<Suggestion> =
        ranked.into_iter().map(|scored| scored.suggestion).collect();

    let primary = suggestions
        .iter()
        .position(|suggestion| suggestion.priority == SuggestionPriority::High)
        .map(|index| suggestions.remove(index));

    suggestions.truncate(SECONDARY_SLOTS);
    SuggestionGroups { primary, secondary: suggestions }
}

#[cfg(test)]
mod tests {
    use crate::suggestions::presentation::{group, SuggestionGroups};
    use crate::suggestions::scoring::ScoredSuggestion;
    use crate::suggestions::types::{Suggestion, SuggestionKind, SuggestionPriority};

    fn scored(id: &str, priority: SuggestionPriority, score: f64) -> ScoredSuggestion {
        ScoredSuggestion {
            suggestion: Suggestion::new(id, SuggestionKind::DealAlert, priority, "msg"),
            score,
        }
    }

    #[test]
    fn best_high_priority_candidate_takes_the_primary_slot() {
        let groups = group(vec![
            scored("m1", SuggestionPriority::Medium, 9.0),
            scored("h1", SuggestionPriority::High, 8.0),
            scored("h2", SuggestionPriority::High, 7.0),
            scored("l1", SuggestionPriority::Low, 1.0),
        ]);

        assert_eq!(groups.primary.as_ref().map(|s| s.id.as_str()), Some("h1"));
        let secondary: Vec<&str> = groups.secondary.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(secondary, vec!["m1", "h2"]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn no_high_priority_means_no_primary() {
        let groups = group(vec![
            scored("m1", SuggestionPriority::Medium, 5.0),
            scored("l1", SuggestionPriority::Low, 2.0),
            scored("l2", SuggestionPriority::Low, 1.0),
        ]);

        assert!(groups.primary.is_none());
        let secondary: Vec<&str> = groups.secondary.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(secondary, vec!["m1", "l1"]);
    }

    #[test]
    fn never_more_than_three_in_total() {
        let ranked = (0..6)
            .map(|n| {
                let priority =
                    if n == 0 { SuggestionPriority::High } else { SuggestionPriority::Medium };
                scored(&format!("s{n}"), priority, 10.0 - n as f64)
            })
            .collect();

        assert_eq!(group(ranked).len(), 3);
    }

    #[test]
    fn empty_input_yields_an_empty_group() {
        let groups = group(Vec::new());
        assert_eq!(groups, SuggestionGroups::default());
        assert!(groups.is_empty());
    }
}
