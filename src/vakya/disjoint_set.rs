//! Union-find over node ids.

use std::collections::BTreeMap;

/// Disjoint sets of `T`. Elements are added implicitly on first use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisjointSet<T: Ord + Copy> {
    parent: BTreeMap<T, T>,
}

impl<T: Ord + Copy> DisjointSet<T> {
    pub fn new() -> Self {
        Self { parent: BTreeMap::new() }
    }

    /// Representative of the set containing `x`.
    pub fn find(&self, x: T) -> T {
        let mut cur = x;
        while let Some(&p) = self.parent.get(&cur) {
            if p == cur {
                break;
            }
            cur = p;
        }
        cur
    }

    /// Merge the sets of `x` and `y`.
    pub fn union(&mut self, x: T, y: T) {
        let (rx, ry) = (self.find(x), self.find(y));
        self.parent.entry(rx).or_insert(rx);
        self.parent.entry(ry).or_insert(ry);
        if rx != ry {
            self.parent.insert(rx, ry);
        }
    }

    pub fn connected(&self, x: T, y: T) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of disjoint sets among the elements seen so far.
    pub fn len(&self) -> usize {
        self.parent.iter().filter(|(k, p)| k == p).count()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_find() {
        let mut ds = DisjointSet::new();
        assert!(ds.is_empty());
        assert!(ds.connected(1, 1));
        assert!(!ds.connected(1, 2));

        ds.union(1, 2);
        ds.union(3, 4);
        assert!(ds.connected(1, 2));
        assert!(!ds.connected(2, 3));
        assert_eq!(ds.len(), 2);

        ds.union(2, 4);
        assert!(ds.connected(1, 3));
        assert_eq!(ds.len(), 1);

        let copy = ds.clone();
        ds.union(5, 1);
        assert!(!copy.connected(5, 1));
        assert!(ds.connected(5, 3));
    }
}
