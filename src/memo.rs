//! Single-entry memoization.

/// Remembers the most recent computation and its key.
///
/// Only one entry is ever held: a lookup with a key equal to the stored one returns the
/// stored value, any other key recomputes and replaces it.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
}

impl<K: PartialEq, V> Memo<K, V> {
    pub const fn new() -> Self {
        Memo { entry: None }
    }

    /// Returns the value for `key`, computing it with `compute` unless the stored key is equal.
    ///
    /// The second element of the tuple is `true` when `compute` ran.
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> (&V, bool)
    where
        F: FnOnce(&K) -> V,
    {
        let (entry, computed) = match self.entry.take() {
            Some(entry) if entry.0 == key => (entry, false),
            _ => {
                let value = compute(&key);
                ((key, value), true)
            }
        };
        let (_, value) = self.entry.insert(entry);
        (&*value, computed)
    }

    /// The stored value, if its key equals `key`.
    pub fn peek(&self, key: &K) -> Option<&V> {
        match &self.entry {
            Some((stored, value)) if stored == key => Some(value),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.entry = None;
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
    fn test_reuses_equal_key() {
        let mut memo = Memo::new();
        let mut calls = 0;
        let (v, computed) = memo.get_or_compute(3, |k| {
            calls += 1;
            k * 2
        });
        assert_eq!((*v, computed), (6, true));
        let (v, computed) = memo.get_or_compute(3, |_| unreachable!());
        assert_eq!((*v, computed), (6, false));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_holds_only_latest() {
        let mut memo = Memo::new();
        memo.get_or_compute("a", |_| 1);
        memo.get_or_compute("b", |_| 2);
        assert_eq!(memo.peek(&"a"), None);
        assert_eq!(memo.peek(&"b"), Some(&2));
        let (v, computed) = memo.get_or_compute("a", |_| 3);
        assert_eq!((*v, computed), (3, true));
        memo.clear();
        assert_eq!(memo.peek(&"a"), None);
    }

    #[test]
    fn test_hit_after_miss_keeps_entry() {
        let mut memo: Memo<String, Vec<u8>> = Memo::default();
        memo.get_or_compute("x".to_string(), |_| vec![1]);
        memo.get_or_compute("y".to_string(), |_| vec![2]);
        let (v, computed) = memo.get_or_compute("y".to_string(), |_| vec![3]);
        assert_eq!((v.as_slice(), computed), (&[2u8][..], false));
        assert_eq!(memo.peek(&"y".to_string()), Some(&vec![2]));
    }
}
