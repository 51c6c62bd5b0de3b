/// Single-slot cache: remembers the value computed for the most recent key.
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
    misses: u64,
}

impl<K: PartialEq, V> Memo<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: None,
            misses: 0,
        }
    }

    /// Return the cached value for `key`, computing it first if the key
    /// differs from the last one seen.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> &V {
        if !matches!(&self.slot, Some((cached, _)) if *cached == key) {
            self.slot = None;
        }
        let (_, value) = self.slot.get_or_insert_with(|| {
            self.misses += 1;
            let value = compute(&key);
            (key, value)
        });
        value
    }

    /// Number of times a value had to be computed.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_is_computed_once() {
        let mut memo = Memo::new();
        assert_eq!(*memo.get_or_compute(1, |k| k * 10), 10);
        assert_eq!(*memo.get_or_compute(1, |_| panic!("recomputed")), 10);
        assert_eq!(memo.misses(), 1);
    }

    #[test]
    fn new_key_replaces_slot() {
        let mut memo = Memo::new();
        memo.get_or_compute("a", |_| 1);
        assert_eq!(*memo.get_or_compute("b", |_| 2), 2);
        assert_eq!(*memo.get_or_compute("a", |_| 3), 3);
        assert_eq!(memo.misses(), 3);
    }

    #[test]
    fn clear_forces_recompute() {
        let mut memo = Memo::new();
        memo.get_or_compute(7, |_| "x");
        memo.clear();
        memo.get_or_compute(7, |_| "y");
        assert_eq!(memo.misses(), 2);
    }
}
