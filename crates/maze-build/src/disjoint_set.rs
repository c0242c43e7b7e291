//! Disjoint set over dense integer ids, for builders that think in edges.

/// Union-by-rank with full path compression on every find.
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(len: usize) -> DisjointSet {
        DisjointSet {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    /// Root of `elem`'s set. Walks up once, then points everything on the
    /// walked path straight at the root.
    pub fn find(&mut self, elem: usize) -> usize {
        let mut root = elem;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut walk = elem;
        while self.parent[walk] != root {
            let next = self.parent[walk];
            self.parent[walk] = root;
            walk = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns false when they were
    /// already one set, which is exactly the "this wall must stand" signal
    /// edge-based builders need.
    pub fn made_union(&mut self, a: usize, b: usize) -> bool {
        let x = self.find(a);
        let y = self.find(b);
        if x == y {
            return false;
        }
        if self.rank[x] > self.rank[y] {
            self.parent[y] = x;
        } else if self.rank[x] < self.rank[y] {
            self.parent[x] = y;
        } else {
            self.parent[x] = y;
            self.rank[y] += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn singletons_merge_once_and_only_once() {
        let mut sets = DisjointSet::new(4);
        assert!(sets.made_union(0, 1));
        assert!(!sets.made_union(1, 0));
        assert!(sets.made_union(2, 3));
        assert!(sets.made_union(0, 3));
        assert!(!sets.made_union(1, 2));
        let root = sets.find(0);
        assert!((0..4).all(|e| sets.find(e) == root));
    }

    #[test]
    fn compression_flattens_the_walked_path() {
        let mut sets = DisjointSet::new(8);
        for pair in 0..7 {
            sets.made_union(pair, pair + 1);
        }
        let root = sets.find(0);
        for elem in 0..8 {
            sets.find(elem);
            assert_eq!(sets.parent[elem], root);
        }
    }

    proptest! {
        /// Union-by-rank bounds rank (and therefore tree height) by log2 n.
        #[test]
        fn rank_stays_logarithmic(merges in proptest::collection::vec((0usize..64, 0usize..64), 0..200)) {
            let mut sets = DisjointSet::new(64);
            for (a, b) in merges {
                sets.made_union(a, b);
            }
            let max_rank = sets.rank.iter().copied().max().unwrap();
            prop_assert!(u32::from(max_rank) <= 64usize.ilog2());
        }

        /// `made_union` agrees with root equality before and after.
        #[test]
        fn union_reports_connectivity(merges in proptest::collection::vec((0usize..32, 0usize..32), 0..100)) {
            let mut sets = DisjointSet::new(32);
            for (a, b) in merges {
                let joined_before = sets.find(a) == sets.find(b);
                let merged = sets.made_union(a, b);
                prop_assert_eq!(merged, !joined_before);
                prop_assert_eq!(sets.find(a), sets.find(b));
            }
        }
    }
}
