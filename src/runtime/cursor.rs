use super::Runtime;
use crate::hooks::SlotAccess;
use crate::key::HookKey;
use crate::store::Slot;
use std::cell::Cell;

/// Per-render cursor over one key's slots.
///
/// Each hook call advances the cursor by one, so the Nth hook called in a
/// render always resolves to the Nth slot of the key. Callers must issue
/// the same hooks in the same order on every render; a different order
/// hands slots to the wrong call sites.
pub struct CursorHandle {
    runtime: Runtime,
    key: HookKey,
    position: Cell<usize>,
}

impl CursorHandle {
    pub(crate) fn new(runtime: Runtime, key: HookKey) -> Self {
        Self {
            runtime,
            key,
            position: Cell::new(0),
        }
    }

    /// Advance to the next position and return its slot, if written.
    pub fn next(&self) -> Option<Slot> {
        let position = self.position.get() + 1;
        self.position.set(position);
        self.runtime.inner.slots.borrow().read(&self.key, position)
    }

    /// Store `slot` at the current position.
    pub fn write(&self, slot: Slot) -> Slot {
        let position = self.position.get();
        tracing::trace!(key = %self.key, position, "writing hook slot");
        self.runtime
            .inner
            .slots
            .borrow_mut()
            .write(&self.key, position, slot)
    }

    /// Position of the most recent hook call; 0 before the first.
    pub fn position(&self) -> usize {
        self.position.get()
    }

    pub fn key(&self) -> &HookKey {
        &self.key
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

impl SlotAccess for CursorHandle {
    fn next_slot(&self) -> Option<Slot> {
        self.next()
    }

    fn write_slot(&self, slot: Slot) -> Slot {
        self.write(slot)
    }

    fn key(&self) -> &HookKey {
        &self.key
    }

    fn position(&self) -> usize {
        self.position.get()
    }
}
