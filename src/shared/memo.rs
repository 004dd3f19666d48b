use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

/// Thread-safe memo table shared between the UI and the fetch worker.
/// Clones share the same storage.
#[derive(Debug)]
pub struct Memo<K, V> {
    // Arc lets us share ownership. RwLock lets us read/write safely.
    inner: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Memo<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    // Helper to get a value without manually locking everywhere
    pub fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.get(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let memo: Memo<String, u32> = Memo::new();
        let other = memo.clone();
        other.insert("btc".into(), 7);

        assert_eq!(memo.get(&"btc".to_string()), Some(7));
        assert_eq!(memo.get(&"eth".to_string()), None);

        memo.insert("btc".into(), 8);
        assert_eq!(other.get(&"btc".to_string()), Some(8));
    }
}
