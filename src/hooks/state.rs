use super::{claim_slot, Callback, SlotAccess};
use crate::config::HookKind;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub(crate) struct StateSlot<T> {
    value: RefCell<T>,
    on_update: Option<Callback<T>>,
}

/// Local state of one hook call site.
///
/// Handles returned on different renders of the same key point at the
/// same slot.
pub struct State<T> {
    slot: Rc<StateSlot<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: Clone + 'static> State<T> {
    /// Get the current value.
    pub fn get(&self) -> T {
        self.slot.value.borrow().clone()
    }

    /// Replace the value, then notify the update callback if there is one.
    ///
    /// There is no equality check: every call notifies.
    pub fn set(&self, value: T) {
        *self.slot.value.borrow_mut() = value.clone();
        if let Some(on_update) = &self.slot.on_update {
            on_update(&value);
        }
    }

    /// Update the value in place, then notify like [`State::set`].
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let value = {
            let mut value = self.slot.value.borrow_mut();
            f(&mut value);
            value.clone()
        };
        if let Some(on_update) = &self.slot.on_update {
            on_update(&value);
        }
    }
}

impl<T> State<T> {
    /// Read the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.value.borrow())
    }

    /// Whether two handles share a slot.
    pub fn ptr_eq(a: &State<T>, b: &State<T>) -> bool {
        Rc::ptr_eq(&a.slot, &b.slot)
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&self.slot.value.borrow()).finish()
    }
}

/// The state hook.
///
/// The first call writes `initial` and the update callback into a new
/// slot. Later calls ignore both arguments and return the stored slot.
pub fn state<T, S>(slots: &S, initial: T, on_update: Option<Callback<T>>) -> State<T>
where
    T: Clone + 'static,
    S: SlotAccess + ?Sized,
{
    if let Some(slot) = claim_slot::<StateSlot<T>, _>(slots, HookKind::State) {
        return State { slot };
    }

    let slot = Rc::new(StateSlot {
        value: RefCell::new(initial),
        on_update,
    });
    slots.write_slot(slot.clone());
    State { slot }
}

pub(crate) struct RefSlot<T> {
    value: RefCell<T>,
}

/// A mutable cell that survives renders and never notifies anyone.
pub struct Ref<T> {
    slot: Rc<RefSlot<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: Clone + 'static> Ref<T> {
    pub fn get(&self) -> T {
        self.slot.value.borrow().clone()
    }
}

impl<T> Ref<T> {
    pub fn set(&self, value: T) {
        *self.slot.value.borrow_mut() = value;
    }

    /// Store `value`, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.slot.value.replace(value)
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.value.borrow())
    }

    pub fn ptr_eq(a: &Ref<T>, b: &Ref<T>) -> bool {
        Rc::ptr_eq(&a.slot, &b.slot)
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.slot.value.borrow()).finish()
    }
}

/// The ref hook: same slot discipline as [`state`], without notifications.
pub fn ref_cell<T, S>(slots: &S, initial: T) -> Ref<T>
where
    T: 'static,
    S: SlotAccess + ?Sized,
{
    if let Some(slot) = claim_slot::<RefSlot<T>, _>(slots, HookKind::Ref) {
        return Ref { slot };
    }

    let slot = Rc::new(RefSlot {
        value: RefCell::new(initial),
    });
    slots.write_slot(slot.clone());
    Ref { slot }
}

#[cfg(test)]
mod tests {
    use crate::Runtime;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn state_survives_renders() {
        let factory = Runtime::new().factory(Some("state"));

        let count = factory.acquire().use_state(0);
        assert_eq!(count.get(), 0);
        assert_eq!(factory.acquire().use_state(0).get(), 0);

        count.set(5);
        let again = factory.acquire().use_state(100);
        assert_eq!(again.get(), 5);
        assert!(super::State::ptr_eq(&count, &again));
    }

    #[test]
    fn set_notifies_every_time() {
        let factory = Runtime::new().factory(Some("state"));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let count = factory.acquire().use_state_with(0, {
            let seen = Rc::clone(&seen);
            move |value: &i32| seen.borrow_mut().push(*value)
        });

        count.set(1);
        count.set(1);
        count.update(|value| *value += 1);

        assert_eq!(*seen.borrow(), vec![1, 1, 2]);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn state_without_callback_is_silent() {
        let factory = Runtime::new().factory(Some("state"));
        let name = factory.acquire().use_state(None::<String>);
        assert_eq!(name.get(), None);

        name.set(Some("ada".to_owned()));
        assert_eq!(factory.acquire().use_state(None::<String>).get(), Some("ada".to_owned()));
    }

    #[test]
    fn first_callback_is_kept() {
        let factory = Runtime::new().factory(Some("state"));
        let first = Rc::new(RefCell::new(0));
        let second = Rc::new(RefCell::new(0));

        factory.acquire().use_state_with(0, {
            let first = Rc::clone(&first);
            move |_: &i32| *first.borrow_mut() += 1
        });
        let count = factory.acquire().use_state_with(0, {
            let second = Rc::clone(&second);
            move |_: &i32| *second.borrow_mut() += 1
        });

        count.set(3);
        assert_eq!(*first.borrow(), 1);
        assert_eq!(*second.borrow(), 0);
    }

    #[test]
    fn ref_allows_mutation_and_ignores_new_initial_values() {
        let factory = Runtime::new().factory(Some("ref"));

        let cell = factory.acquire().use_ref(0);
        assert_eq!(cell.get(), 0);

        cell.set(1);
        assert_eq!(cell.get(), 1);

        let same = factory.acquire().use_ref(42);
        assert_eq!(same.get(), 1);
        assert_eq!(same.replace(7), 1);
        assert_eq!(cell.with(|value| *value), 7);
    }
}
