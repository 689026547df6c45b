use super::pass::{Pass, PassId};

/// Live passes in draw order (insertion order, minus removals).
///
/// Ids are never reused, including across a `clear`, so a stale [`PassId`]
/// can never remove a newer pass.
#[derive(Debug)]
pub struct PassRegistry<P = Pass> {
    entries: Vec<(PassId, P)>,
    next_id: u64,
}

impl<P> Default for PassRegistry<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<P> PassRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the id the next inserted pass will be registered under.
    pub(crate) fn reserve_id(&mut self) -> PassId {
        let id = PassId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, id: PassId, pass: P) {
        self.entries.push((id, pass));
    }

    /// Removes every pass.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes the pass registered under `id`. Returns `false` if it is not live.
    pub fn remove(&mut self, id: PassId) -> bool {
        match self.entries.iter().position(|(i, _)| *i == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: PassId) -> bool {
        self.entries.iter().any(|(i, _)| *i == id)
    }

    pub fn get(&self, id: PassId) -> Option<&P> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, p)| p)
    }

    /// Live ids in draw order.
    pub fn ids(&self) -> Vec<PassId> {
        self.entries.iter().map(|(i, _)| *i).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.entries.iter().map(|(_, p)| p)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut P> {
        self.entries.iter_mut().map(|(_, p)| p)
    }

    /// Removes every pass matching `pred`, returning how many were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&P) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, p)| !pred(p));
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&'static str]) -> (PassRegistry<&'static str>, Vec<PassId>) {
        let mut reg = PassRegistry::new();
        let ids = names
            .iter()
            .map(|n| {
                let id = reg.reserve_id();
                reg.insert(id, *n);
                id
            })
            .collect();
        (reg, ids)
    }

    // ── remove ────────────────────────────────────────────────────────────

    #[test]
    fn remove_drops_exactly_one_by_identity() {
        let (mut reg, ids) = registry(&["a", "b", "c"]);
        assert!(reg.remove(ids[1]));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.iter().copied().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(reg.ids(), [ids[0], ids[2]]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let (mut reg, ids) = registry(&["a"]);
        assert!(reg.remove(ids[0]));
        assert!(!reg.remove(ids[0]));
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_where_counts_matches() {
        let (mut reg, _) = registry(&["keep", "drop", "drop", "keep"]);
        assert_eq!(reg.remove_where(|p| *p == "drop"), 2);
        assert_eq!(reg.len(), 2);
    }

    // ── ids ───────────────────────────────────────────────────────────────

    #[test]
    fn ids_are_not_reused_after_clear() {
        let (mut reg, first) = registry(&["a", "b"]);
        reg.clear();
        assert!(reg.is_empty());

        let id = reg.reserve_id();
        reg.insert(id, "c");
        assert!(!first.contains(&id));
        assert!(!reg.remove(first[0]));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn draw_order_is_insertion_order() {
        let (reg, ids) = registry(&["x", "y", "z"]);
        assert_eq!(reg.ids(), ids);
        assert_eq!(reg.get(ids[2]), Some(&"z"));
    }
}
