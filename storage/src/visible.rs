/// Ordered asset ids whose relationships are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    ids: Vec<u64>,
}

impl VisibleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` unless already present. Returns whether it was added.
    pub fn push(&mut self, id: u64) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let len_before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        self.ids.len() < len_before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<u64> for VisibleSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut set = VisibleSet::new();
        for id in iter {
            set.push(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order_and_skips_duplicates() {
        let mut set = VisibleSet::new();
        assert!(set.push(3));
        assert!(set.push(1));
        assert!(!set.push(3));
        assert_eq!(set.ids(), &[3, 1]);
    }

    #[test]
    fn remove_and_clear() {
        let mut set: VisibleSet = [1, 2, 3].into_iter().collect();
        assert!(set.remove(2));
        assert!(!set.remove(2));
        assert_eq!(set.ids(), &[1, 3]);
        set.clear();
        assert!(set.is_empty());
    }
}
