use std::{
    fmt,
    hash::Hash,
    iter::FromIterator,
    ops::Index,
};

use fnv::FnvHashMap;

/// A hash map that iterates in insertion order.
///
/// Re-inserting an existing key replaces its value in place; the key keeps its
/// original position.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    indices: FnvHashMap<K, usize>,
}

pub struct Iter<'a, K: 'a, V: 'a> {
    inner: std::slice::Iter<'a, (K, V)>,
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Clone + Hash + Eq,
{
    fn default() -> Self {
        OrderedMap::new()
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Clone + Hash + Eq,
{
    pub fn new() -> OrderedMap<K, V> {
        OrderedMap {
            entries: Vec::new(),
            indices: FnvHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, k: &K) -> Option<&V> {
        self.indices.get(k).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.indices.contains_key(k)
    }

    /// Inserts `v` under `k`, returning the previous value if there was one.
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        if let Some(&idx) = self.indices.get(&k) {
            return Some(std::mem::replace(&mut self.entries[idx].1, v));
        }

        let idx = self.entries.len();
        self.indices.insert(k.clone(), idx);
        self.entries.push((k, v));
        None
    }

    /// Returns the value under `k`, inserting one built by `f` first if needed.
    pub fn get_or_insert_with<F>(&mut self, k: K, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let idx = match self.indices.get(&k) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.indices.insert(k.clone(), idx);
                self.entries.push((k, f()));
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V>
where
    K: Clone + Hash + Eq,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Clone + Hash + Eq,
{
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        let mut m = OrderedMap::new();
        for (k, v) in iter {
            m.insert(k, v);
        }
        m
    }
}

impl<K, V> Index<&K> for OrderedMap<K, V>
where
    K: Clone + Hash + Eq + fmt::Debug,
{
    type Output = V;

    fn index(&self, k: &K) -> &V {
        match self.get(k) {
            Some(v) => v,
            None => panic!("no entry found for key {:?}", k),
        }
    }
}

impl<K, V> PartialEq for OrderedMap<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, V> Eq for OrderedMap<K, V>
where
    K: Eq,
    V: Eq,
{
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}
