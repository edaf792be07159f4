/// Rebuilds a cached value only when its key changes.
///
/// The stale value is dropped before the new one is built, so a value whose
/// `Drop` releases a resource has released it by the time `build` runs.
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Return the cached value, rebuilding it when `key` differs from the
    /// cached key.
    pub fn get_or_rebuild(&mut self, key: K, build: impl FnOnce() -> V) -> &V {
        if self.slot.as_ref().is_some_and(|(cached, _)| *cached != key) {
            self.slot = None;
        }
        let (_, value) = self.slot.get_or_insert_with(|| (key, build()));
        value
    }

    pub fn get(&self) -> Option<&V> {
        self.slot.as_ref().map(|(_, value)| value)
    }

    /// Whether the cached value was built for exactly this key.
    pub fn matches(&self, key: &K) -> bool {
        self.slot.as_ref().is_some_and(|(cached, _)| cached == key)
    }
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
