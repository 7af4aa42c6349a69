use std::collections::HashSet;

use crate::Address;

/// Eligible records that exhausted their retry budget in a pass.
///
/// Entries are keyed by the record's position in the eligible list, so an
/// owner listed on several rows appears once per row. Iteration follows
/// insertion order so the escalation pass visits records in the order they
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureSet {
    order: Vec<(usize, Address)>,
    positions: HashSet<usize>,
}

impl FailureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the record at `position`, returning false if it was already present
    pub fn insert(&mut self, position: usize, recipient: Address) -> bool {
        if self.positions.insert(position) {
            self.order.push((position, recipient));
            true
        } else {
            false
        }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Address)> {
        self.order.iter().map(|(position, recipient)| (*position, recipient))
    }

    /// Fold another set into this one
    pub fn merge(&mut self, other: FailureSet) {
        self.extend(other);
    }
}

impl IntoIterator for FailureSet {
    type Item = (usize, Address);
    type IntoIter = std::vec::IntoIter<(usize, Address)>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

impl FromIterator<(usize, Address)> for FailureSet {
    fn from_iter<I: IntoIterator<Item = (usize, Address)>>(iter: I) -> Self {
        let mut set = FailureSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<(usize, Address)> for FailureSet {
    fn extend<I: IntoIterator<Item = (usize, Address)>>(&mut self, iter: I) {
        for (position, recipient) in iter {
            self.insert(position, recipient);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[(usize, &str)]) -> Vec<(usize, Address)> {
        items.iter().map(|(p, a)| (*p, Address::from(*a))).collect()
    }

    #[test]
    fn test_insert_is_unique_per_position() {
        let mut set = FailureSet::new();
        assert!(set.insert(0, Address::from("a")));
        assert!(set.insert(1, Address::from("b")));
        assert!(!set.insert(0, Address::from("a")));
        assert_eq!(set.len(), 2);
        assert!(set.contains(0));
        assert!(!set.contains(2));
    }

    #[test]
    fn test_same_owner_on_two_rows_kept_twice() {
        let set: FailureSet = entries(&[(3, "a"), (7, "a")]).into_iter().collect();
        assert_eq!(set.len(), 2);

        let owners: Vec<&str> = set.iter().map(|(_, a)| a.as_str()).collect();
        assert_eq!(owners, vec!["a", "a"]);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let set: FailureSet = entries(&[(4, "c"), (0, "a"), (2, "b"), (0, "a")])
            .into_iter()
            .collect();
        let order: Vec<usize> = set.iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec![4, 0, 2]);
    }

    #[test]
    fn test_merge() {
        let mut first: FailureSet = entries(&[(0, "a"), (1, "b")]).into_iter().collect();
        let second: FailureSet = entries(&[(1, "b"), (5, "c")]).into_iter().collect();
        first.merge(second);

        assert_eq!(first.into_iter().collect::<Vec<_>>(), entries(&[(0, "a"), (1, "b"), (5, "c")]));
    }
}
