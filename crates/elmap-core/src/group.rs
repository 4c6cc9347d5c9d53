//! Kind-partitioned id sets threaded through resolution.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ElementId, ElementRef};

/// Element ids bucketed by kind.
///
/// Buckets are kept in kind order and ids in numeric order so that every
/// pass over a group is deterministic. The host store gives each id exactly
/// one kind, so buckets built from store rows never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindGroup {
    buckets: BTreeMap<String, BTreeSet<ElementId>>,
}

impl KindGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` to the bucket for `kind`, creating the bucket if needed.
    ///
    /// Returns `true` if the id was not already present.
    pub fn insert(&mut self, kind: &str, id: ElementId) -> bool {
        if let Some(bucket) = self.buckets.get_mut(kind) {
            return bucket.insert(id);
        }
        self.buckets.insert(kind.to_string(), BTreeSet::from([id]));
        true
    }

    /// Remove the bucket for `kind` and hand its ids to the caller.
    pub fn take(&mut self, kind: &str) -> Option<BTreeSet<ElementId>> {
        self.buckets.remove(kind)
    }

    #[must_use]
    pub fn ids(&self, kind: &str) -> Option<&BTreeSet<ElementId>> {
        self.buckets.get(kind)
    }

    #[must_use]
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.buckets.contains_key(kind)
    }

    /// Kinds currently present, in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of distinct kinds.
    #[must_use]
    pub fn kind_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total ids across all buckets.
    #[must_use]
    pub fn id_count(&self) -> usize {
        self.buckets.values().map(BTreeSet::len).sum()
    }
}

impl Extend<ElementRef> for KindGroup {
    fn extend<T: IntoIterator<Item = ElementRef>>(&mut self, iter: T) {
        for element in iter {
            self.insert(&element.kind, element.id);
        }
    }
}

impl FromIterator<ElementRef> for KindGroup {
    fn from_iter<T: IntoIterator<Item = ElementRef>>(iter: T) -> Self {
        let mut group = Self::new();
        group.extend(iter);
        group
    }
}

#[cfg(test)]
mod tests {
    use super::KindGroup;
    use crate::model::ElementRef;

    #[test]
    fn insert_creates_bucket_and_dedupes() {
        let mut group = KindGroup::new();
        assert!(group.insert("entry", 4));
        assert!(!group.insert("entry", 4));
        assert!(group.insert("asset", 7));

        assert_eq!(group.kind_count(), 2);
        assert_eq!(group.id_count(), 2);
        assert_eq!(group.kinds().collect::<Vec<_>>(), vec!["asset", "entry"]);
    }

    #[test]
    fn take_consumes_the_whole_bucket() {
        let mut group: KindGroup = [
            ElementRef::new(1, "matrix_block"),
            ElementRef::new(2, "matrix_block"),
            ElementRef::new(3, "entry"),
        ]
        .into_iter()
        .collect();

        let blocks = group.take("matrix_block").expect("bucket present");
        assert_eq!(blocks.into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert!(!group.contains_kind("matrix_block"));
        assert!(group.take("matrix_block").is_none());
        assert_eq!(group.id_count(), 1);
    }
}
