//! Greedy duplicate grouping.
//!
//! Each not-yet-grouped item in input order becomes a seed. Every other
//! ungrouped item scoring at least `threshold` against the seed joins its
//! group. Members are compared with the seed only, never with each other,
//! so two members of one group may be less similar to each other than the
//! threshold. Groups with a single member are dropped, and that seed stays
//! available to later seeds.

use std::collections::HashSet;
use std::hash::Hash;

use partdup_core::Signature;

use crate::similarity::SimilarityScorer;

/// Default similarity threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// Partitions signatures into groups of likely duplicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateGrouper {
    scorer: SimilarityScorer,
}

impl DuplicateGrouper {
    /// Create a grouper using the standard scorer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grouper with a specific scorer.
    pub fn with_scorer(scorer: SimilarityScorer) -> Self {
        Self { scorer }
    }

    /// The scorer used for pairwise comparisons.
    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    /// Group `items` whose similarity to a common seed is `>= threshold`.
    ///
    /// Ids must be unique. Every returned group has at least two members,
    /// the seed first and then matches in input order, and no id appears
    /// in more than one group.
    pub fn group<Id>(&self, items: &[(Id, Signature)], threshold: f64) -> Vec<Vec<Id>>
    where
        Id: Clone + Eq + Hash,
    {
        let mut grouped: HashSet<&Id> = HashSet::with_capacity(items.len());
        let mut groups = Vec::new();

        for (i, (seed_id, seed_sig)) in items.iter().enumerate() {
            if grouped.contains(seed_id) {
                continue;
            }

            let mut group = vec![seed_id.clone()];

            for (j, (id, sig)) in items.iter().enumerate() {
                if i == j || grouped.contains(id) {
                    continue;
                }
                if self.scorer.score(seed_sig, sig) >= threshold {
                    group.push(id.clone());
                    grouped.insert(id);
                }
            }

            if group.len() > 1 {
                grouped.insert(seed_id);
                groups.push(group);
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partdup_core::{BoundingBox, GeometryHash};

    fn sig(bbox: [f64; 6], volume: f64, area: f64, hash: &str) -> Signature {
        Signature::new(
            BoundingBox::from_array(bbox),
            volume,
            area,
            GeometryHash::from_label(hash),
        )
    }

    fn bracket() -> Signature {
        sig([0.0, 0.0, 0.0, 10.0, 5.0, 2.0], 100.0, 220.0, "hash1")
    }

    fn block() -> Signature {
        sig([0.0, 0.0, 0.0, 20.0, 10.0, 4.0], 400.0, 880.0, "hash2")
    }

    /// Volume-only signature with a unique hash, for precise scores.
    fn vol(volume: f64, hash: &str) -> Signature {
        sig([0.0, 0.0, 0.0, 1.0, 1.0, 1.0], volume, 6.0, hash)
    }

    #[test]
    fn test_identical_pair() {
        let s = bracket();
        let groups = DuplicateGrouper::new().group(&[("a", s.clone()), ("b", s)], 0.95);
        assert_eq!(groups, vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_groups_three_of_four() {
        let items = vec![
            ("part1.stl", bracket()),
            ("part2.stl", bracket()),
            ("part3.stl", block()),
            ("part4.stl", bracket()),
        ];

        let groups = DuplicateGrouper::new().group(&items, 0.95);
        assert_eq!(groups, vec![vec!["part1.stl", "part2.stl", "part4.stl"]]);
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<(&str, Signature)> = Vec::new();
        assert!(DuplicateGrouper::new().group(&items, 0.5).is_empty());
    }

    #[test]
    fn test_single_item() {
        assert!(DuplicateGrouper::new().group(&[("a", bracket())], 0.95).is_empty());
    }

    #[test]
    fn test_all_singletons() {
        let items = vec![("a", bracket()), ("b", block())];
        assert!(DuplicateGrouper::new().group(&items, 0.95).is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 0.5 * 0.5 + 0.3 + 0.2 = 0.75 exactly
        let items = vec![("a", vol(1.0, "a")), ("b", vol(2.0, "b"))];
        let grouper = DuplicateGrouper::new();

        assert_eq!(grouper.group(&items, 0.75), vec![vec!["a", "b"]]);
        assert!(grouper.group(&items, 0.76).is_empty());
    }

    #[test]
    fn test_members_compared_to_seed_only() {
        // b and c each score 0.875 against a, but about 0.78 against each other.
        let items = vec![
            ("a", vol(1.0, "a")),
            ("b", vol(4.0 / 3.0, "b")),
            ("c", vol(0.75, "c")),
        ];
        let grouper = DuplicateGrouper::new();
        let score_bc = grouper.scorer().score(&items[1].1, &items[2].1);
        assert!(score_bc < 0.85);

        let groups = grouper.group(&items, 0.85);
        assert_eq!(groups, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_order_dependence() {
        // Chain a - b - c: b is close to both ends, the ends are far apart.
        let a = vol(1.0, "a");
        let b = vol(4.0 / 3.0, "b");
        let c = vol(16.0 / 9.0, "c");
        let grouper = DuplicateGrouper::new();

        let groups = grouper.group(&[("a", a.clone()), ("b", b.clone()), ("c", c.clone())], 0.85);
        assert_eq!(groups, vec![vec!["a", "b"]]);

        let groups = grouper.group(&[("b", b), ("a", a), ("c", c)], 0.85);
        assert_eq!(groups, vec![vec!["b", "a", "c"]]);
    }

    #[test]
    fn test_unmatched_item_is_omitted() {
        let items = vec![
            ("a", vol(1.0, "a")),
            ("x", vol(100.0, "x")),
            ("y", vol(1.0, "y")),
        ];
        let groups = DuplicateGrouper::new().group(&items, 0.95);
        assert_eq!(groups, vec![vec!["a", "y"]]);
    }

    #[test]
    fn test_each_id_in_one_group() {
        let items = vec![
            ("a", bracket()),
            ("b", block()),
            ("c", bracket()),
            ("d", block()),
            ("e", vol(3.0, "e")),
        ];
        let groups = DuplicateGrouper::new().group(&items, 0.95);

        assert_eq!(groups, vec![vec!["a", "c"], vec!["b", "d"]]);
        let mut all: Vec<_> = groups.iter().flatten().collect();
        let before = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), before);
    }

    #[test]
    fn test_lower_threshold_finds_more_groups() {
        // Each near pair scores about 0.983.
        let items = vec![
            ("a", bracket()),
            ("b", block()),
            ("a2", sig([0.0, 0.0, 0.0, 10.1, 5.1, 2.0], 102.0, 224.0, "h3")),
            ("b2", sig([0.0, 0.0, 0.0, 20.2, 10.2, 4.0], 408.0, 896.0, "h4")),
        ];
        let grouper = DuplicateGrouper::new();

        let loose = grouper.group(&items, 0.90);
        let strict = grouper.group(&items, 0.99);

        assert_eq!(loose, vec![vec!["a", "a2"], vec!["b", "b2"]]);
        assert!(strict.is_empty());
        assert!(loose.len() >= strict.len());
    }

    #[test]
    fn test_threshold_zero_groups_everything() {
        let items = vec![("a", bracket()), ("b", block()), ("c", vol(3.0, "c"))];
        let groups = DuplicateGrouper::new().group(&items, 0.0);
        assert_eq!(groups, vec![vec!["a", "b", "c"]]);
    }
}
