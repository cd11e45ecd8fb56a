use super::{claim_slot, Callback, SlotAccess};
use crate::config::HookKind;
use std::cell::RefCell;
use std::rc::Rc;

/// Reducer function: current state and action in, next state out.
///
/// Returning the current `Rc` (rather than a new allocation) tells the
/// reducer hook nothing changed.
pub type ReduceFn<S, A> = Rc<dyn Fn(&Rc<S>, A) -> Rc<S>>;

pub(crate) struct ReducerSlot<S, A> {
    state: RefCell<Rc<S>>,
    reduce: ReduceFn<S, A>,
    on_update: Option<Callback<Rc<S>>>,
}

/// State driven by dispatched actions.
pub struct Reducer<S, A> {
    slot: Rc<ReducerSlot<S, A>>,
}

impl<S, A> Clone for Reducer<S, A> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<S: 'static, A: 'static> Reducer<S, A> {
    /// Current state.
    pub fn get(&self) -> Rc<S> {
        Rc::clone(&self.slot.state.borrow())
    }

    /// Reduce `action` into the state.
    ///
    /// If the reducer hands back the current `Rc` nothing is stored and
    /// nobody is notified. Returns whether the state changed.
    pub fn dispatch(&self, action: A) -> bool {
        let current = self.get();
        let next = (self.slot.reduce)(&current, action);
        if Rc::ptr_eq(&next, &current) {
            return false;
        }

        *self.slot.state.borrow_mut() = Rc::clone(&next);
        if let Some(on_update) = &self.slot.on_update {
            on_update(&next);
        }
        true
    }

    pub fn ptr_eq(a: &Reducer<S, A>, b: &Reducer<S, A>) -> bool {
        Rc::ptr_eq(&a.slot, &b.slot)
    }
}

/// The reducer hook.
///
/// The first call seeds the state with `initial` and keeps `reduce` and
/// `on_update` for the lifetime of the slot.
pub fn reducer<St, A, S>(
    slots: &S,
    reduce: ReduceFn<St, A>,
    initial: St,
    on_update: Option<Callback<Rc<St>>>,
) -> Reducer<St, A>
where
    St: 'static,
    A: 'static,
    S: SlotAccess + ?Sized,
{
    if let Some(slot) = claim_slot::<ReducerSlot<St, A>, _>(slots, HookKind::Reducer) {
        return Reducer { slot };
    }

    let slot = Rc::new(ReducerSlot {
        state: RefCell::new(Rc::new(initial)),
        reduce,
        on_update,
    });
    slots.write_slot(slot.clone());
    Reducer { slot }
}
