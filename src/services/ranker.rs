use std::collections::HashSet;

use crate::{models::ItemId, services::interactions::ItemCounts};

/// Number of recommendations returned when the caller does not ask for a size
pub const DEFAULT_LIMIT: usize = 10;

/// Orders candidate items by popularity
///
/// Items in `exclude` are dropped first, so a user is never offered something
/// they already interacted with. The rest are sorted by count descending, ties
/// broken by item id ascending, and cut to `limit`. A short candidate set
/// yields a short list; `limit == 0` yields an empty one.
pub fn rank(counts: &ItemCounts, exclude: &HashSet<ItemId>, limit: usize) -> Vec<ItemId> {
    if limit == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<(&ItemId, u64)> = counts
        .iter()
        .filter(|(item_id, count)| **count > 0 && !exclude.contains(*item_id))
        .map(|(item_id, count)| (item_id, *count))
        .collect();

    candidates.sort_unstable_by(|(a_id, a_count), (b_id, b_count)| {
        b_count.cmp(a_count).then_with(|| a_id.cmp(b_id))
    });
    candidates.truncate(limit);

    candidates
        .into_iter()
        .map(|(item_id, _)| item_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> ItemId {
        ItemId::parse(id).unwrap()
    }

    fn counts(entries: &[(&str, u64)]) -> ItemCounts {
        entries.iter().map(|(id, c)| (item(id), *c)).collect()
    }

    fn ids(ranked: &[ItemId]) -> Vec<&str> {
        ranked.iter().map(ItemId::as_str).collect()
    }

    #[test]
    fn test_sorts_by_count_descending() {
        let ranked = rank(&counts(&[("3", 1), ("1", 3), ("2", 2)]), &HashSet::new(), 10);
        assert_eq!(ids(&ranked), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_excluded_items_never_returned() {
        let exclude: HashSet<ItemId> = [item("1")].into_iter().collect();
        let ranked = rank(&counts(&[("1", 2), ("2", 2), ("3", 1)]), &exclude, 2);
        assert_eq!(ids(&ranked), vec!["2", "3"]);
    }

    #[test]
    fn test_ties_broken_by_item_id() {
        let ranked = rank(
            &counts(&[("c", 5), ("a", 5), ("b", 5), ("z", 9)]),
            &HashSet::new(),
            10,
        );
        assert_eq!(ids(&ranked), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let ranked = rank(&counts(&[("1", 3), ("2", 2), ("3", 1)]), &HashSet::new(), 2);
        assert_eq!(ids(&ranked), vec!["1", "2"]);
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let ranked = rank(&counts(&[("1", 3)]), &HashSet::new(), 0);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_short_candidate_set_is_not_padded() {
        let ranked = rank(&counts(&[("1", 1)]), &HashSet::new(), DEFAULT_LIMIT);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_zero_counts_are_not_candidates() {
        let ranked = rank(&counts(&[("1", 0), ("2", 1)]), &HashSet::new(), 10);
        assert_eq!(ids(&ranked), vec!["2"]);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let mapping = counts(&[("x", 2), ("y", 2), ("w", 2), ("v", 1)]);
        let first = rank(&mapping, &HashSet::new(), 10);
        for _ in 0..20 {
            assert_eq!(rank(&mapping.clone(), &HashSet::new(), 10), first);
        }
    }
}
