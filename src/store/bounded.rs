use std::collections::HashMap;
use std::hash::Hash;

/// Insertion-ordered map with a hard entry cap.
///
/// `save` removes any existing entry under the key, appends the new one at
/// the back, then evicts from the front while over capacity. Re-saving a key
/// therefore refreshes its recency.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    capacity: usize,
    index: HashMap<K, V>,
    order: Vec<K>,
}

impl<K: Eq + Hash + Clone, V> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            index: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn save(&mut self, key: K, value: V) {
        if self.index.remove(&key).is_some() {
            self.order.retain(|k| k != &key);
        }
        self.order.push(key.clone());
        self.index.insert(key, value);

        while self.index.len() > self.capacity {
            let oldest = self.order.remove(0);
            self.index.remove(&oldest);
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key)
    }
}
