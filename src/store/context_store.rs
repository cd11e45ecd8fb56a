use rustc_hash::FxHashMap;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Names one shared context value. Independent of identity keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(Rc<str>);

impl ContextKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextKey {
    fn from(key: &str) -> Self {
        ContextKey(Rc::from(key))
    }
}

impl From<String> for ContextKey {
    fn from(key: String) -> Self {
        ContextKey(Rc::from(key))
    }
}

impl From<&ContextKey> for ContextKey {
    fn from(key: &ContextKey) -> Self {
        key.clone()
    }
}

/// Type-erased subscriber callback.
pub type Listener = Rc<dyn Fn(&dyn Any)>;

#[derive(Default)]
struct ContextEntry {
    value: Option<Rc<dyn Any>>,
    next_id: u64,
    subscribers: BTreeMap<u64, Listener>,
}

/// Current values and subscribers for every context key.
///
/// The store never calls listeners itself: [`ContextStore::set`] hands back
/// the listeners to notify so the caller can run them after releasing its
/// borrow of the store.
#[derive(Default)]
pub struct ContextStore {
    entries: FxHashMap<ContextKey, ContextEntry>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, key: &ContextKey) -> &mut ContextEntry {
        self.entries.entry(key.clone()).or_default()
    }

    /// Store `value` unless the key already holds one. Returns whether the
    /// value was stored.
    pub fn seed(&mut self, key: &ContextKey, value: Rc<dyn Any>) -> bool {
        let entry = self.entry(key);
        if entry.value.is_some() {
            return false;
        }
        entry.value = Some(value);
        true
    }

    pub fn get(&self, key: &ContextKey) -> Option<Rc<dyn Any>> {
        self.entries.get(key)?.value.clone()
    }

    /// Commit `value` and return the current subscribers with their ids,
    /// in id order.
    ///
    /// Callers notifying them one by one should skip ids for which
    /// [`ContextStore::is_subscribed`] has turned false in the meantime.
    pub fn set(&mut self, key: &ContextKey, value: Rc<dyn Any>) -> Vec<(u64, Listener)> {
        let entry = self.entry(key);
        entry.value = Some(value);
        entry
            .subscribers
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect()
    }

    /// Register `listener` under the next id for `key`.
    pub fn subscribe(&mut self, key: &ContextKey, listener: Listener) -> u64 {
        let entry = self.entry(key);
        let id = entry.next_id;
        entry.next_id += 1;
        entry.subscribers.insert(id, listener);
        id
    }

    /// Remove the subscription `id`. Returns whether it was registered.
    pub fn unsubscribe(&mut self, key: &ContextKey, id: u64) -> bool {
        self.entries
            .get_mut(key)
            .is_some_and(|entry| entry.subscribers.remove(&id).is_some())
    }

    pub fn is_subscribed(&self, key: &ContextKey, id: u64) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.subscribers.contains_key(&id))
    }

    pub fn subscriber_count(&self, key: &ContextKey) -> usize {
        self.entries
            .get(key)
            .map_or(0, |entry| entry.subscribers.len())
    }

    pub fn contains(&self, key: &ContextKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
