use std::{fmt, hash::Hash};

use super::OrderedMap;

/// A multimap whose value collections behave like insertion-ordered sets.
#[derive(Clone, PartialEq, Eq)]
pub struct SetMultimap<K, V> {
    map: OrderedMap<K, Vec<V>>,
}

impl<K, V> Default for SetMultimap<K, V>
where
    K: Clone + Hash + Eq,
{
    fn default() -> Self {
        SetMultimap::new()
    }
}

impl<K, V> SetMultimap<K, V>
where
    K: Clone + Hash + Eq,
{
    pub fn new() -> Self {
        SetMultimap {
            map: OrderedMap::new(),
        }
    }

    /// Returns the values under `k`, or an empty slice.
    pub fn get(&self, k: &K) -> &[V] {
        self.map.get(k).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.map.contains_key(k)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values().flat_map(|vs| vs.iter())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v)))
    }

    pub fn key_count(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> SetMultimap<K, V>
where
    K: Clone + Hash + Eq,
    V: PartialEq,
{
    /// Adds `v` under `k`. Returns `false` if the pair was already present.
    pub fn put(&mut self, k: K, v: V) -> bool {
        crate::utils::push_unique(self.map.get_or_insert_with(k, Vec::new), v)
    }

    pub fn contains_value(&self, v: &V) -> bool {
        self.values().any(|x| x == v)
    }
}

impl<K, V> std::iter::FromIterator<(K, V)> for SetMultimap<K, V>
where
    K: Clone + Hash + Eq,
    V: PartialEq,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = SetMultimap::new();
        for (k, v) in iter {
            m.put(k, v);
        }
        m
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SetMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::SetMultimap;

    #[test]
    fn put_ignores_duplicate_pairs() {
        let mut m = SetMultimap::new();
        assert!(m.put("k", 1));
        assert!(m.put("k", 2));
        assert!(!m.put("k", 1));
        assert_eq!(m.get(&"k"), &[1, 2]);
        assert!(m.get(&"missing").is_empty());
    }
}
