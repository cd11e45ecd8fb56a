use crate::key::HookKey;
use rustc_hash::FxHashMap;
use std::any::Any;
use std::rc::Rc;

/// One unit of persisted state bound to one hook call site.
pub type Slot = Rc<dyn Any>;

/// Ordered slot storage, one entry per identity key.
///
/// Positions are 1-based and follow hook call order: the slot for the
/// third hook called during a render lives at position 3.
#[derive(Default)]
pub struct SlotStore {
    entries: FxHashMap<HookKey, Vec<Option<Slot>>>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry for `key` if it does not exist yet.
    pub fn ensure(&mut self, key: &HookKey) {
        if !self.entries.contains_key(key) {
            self.entries.insert(key.clone(), Vec::new());
        }
    }

    /// Read the slot at `position`, if one has been written.
    pub fn read(&self, key: &HookKey, position: usize) -> Option<Slot> {
        let index = position.checked_sub(1)?;
        self.entries.get(key)?.get(index)?.clone()
    }

    /// Store `slot` at `position`, extending the entry as needed.
    pub fn write(&mut self, key: &HookKey, position: usize, slot: Slot) -> Slot {
        debug_assert!(position > 0, "slot positions start at 1");
        let index = position.saturating_sub(1);
        let entry = self.entries.entry(key.clone()).or_default();
        if entry.len() <= index {
            entry.resize_with(index + 1, || None);
        }
        entry[index] = Some(Rc::clone(&slot));
        slot
    }

    /// Remove the entry for `key`, returning its slots in position order.
    pub fn remove(&mut self, key: &HookKey) -> Option<Vec<Slot>> {
        self.entries
            .remove(key)
            .map(|slots| slots.into_iter().flatten().collect())
    }

    /// Number of slots written for `key`.
    pub fn len(&self, key: &HookKey) -> usize {
        self.entries.get(key).map_or(0, Vec::len)
    }

    pub fn contains(&self, key: &HookKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys with an entry.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
