use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

/// Rows of a slice grouped by a key
///
/// Groups are kept in key order so every aggregate comes out in the same
/// order on every run. Rows whose key is `None` belong to no group.
#[derive(Debug)]
pub struct GroupBy<'a, K, T>
where
    K: Debug + Ord + Clone,
{
    /// Row indices per key
    groups: BTreeMap<K, Vec<usize>>,

    /// Grouped rows
    source: &'a [T],
}

impl<'a, K, T> GroupBy<'a, K, T>
where
    K: Debug + Ord + Clone,
{
    /// Group `source` by the key `key` extracts from each row
    pub fn new<F>(source: &'a [T], key: F) -> Self
    where
        F: Fn(&'a T) -> Option<K>,
    {
        let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
        for (i, row) in source.iter().enumerate() {
            if let Some(k) = key(row) {
                groups.entry(k).or_default().push(i);
            }
        }

        GroupBy { groups, source }
    }

    /// Return the size of each group
    pub fn size(&self) -> BTreeMap<K, usize> {
        self.groups
            .iter()
            .map(|(k, indices)| (k.clone(), indices.len()))
            .collect()
    }

    /// Number of rows per group satisfying `predicate`
    pub fn count_where<P>(&self, predicate: P) -> BTreeMap<K, usize>
    where
        P: Fn(&T) -> bool,
    {
        self.groups
            .iter()
            .map(|(k, indices)| {
                let count = indices.iter().filter(|&&i| predicate(&self.source[i])).count();
                (k.clone(), count)
            })
            .collect()
    }

    /// Calculate the sum for each group
    ///
    /// `None` values are skipped, as a missing cell in a column sum would be.
    pub fn sum<F>(&self, value: F) -> BTreeMap<K, f64>
    where
        F: Fn(&T) -> Option<f64>,
    {
        self.groups
            .iter()
            .map(|(k, indices)| {
                let total: f64 = indices.iter().filter_map(|&i| value(&self.source[i])).sum();
                (k.clone(), total)
            })
            .collect()
    }

    /// Number of distinct values per group
    pub fn count_distinct<V, F>(&self, value: F) -> BTreeMap<K, usize>
    where
        V: Ord,
        F: Fn(&'a T) -> V,
    {
        let source = self.source;
        self.groups
            .iter()
            .map(|(k, indices)| {
                let distinct: BTreeSet<V> = indices.iter().map(|&i| value(&source[i])).collect();
                (k.clone(), distinct.len())
            })
            .collect()
    }
}
