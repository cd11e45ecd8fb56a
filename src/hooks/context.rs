use super::{claim_slot, SlotAccess};
use crate::config::HookKind;
use crate::error::{HookError, Result};
use crate::runtime::{Runtime, RuntimeInner};
use crate::store::{ContextKey, Listener};
use std::any::{type_name, Any};
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

pub(crate) struct ContextSlot {
    key: ContextKey,
}

/// Accessor for one shared context value.
///
/// The value lives in the runtime's context store, not in the slot; every
/// handle for the same key sees the same value.
pub struct Context<T> {
    slot: Rc<ContextSlot>,
    runtime: Weak<RuntimeInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
            runtime: Weak::clone(&self.runtime),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("key", &self.slot.key)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> Context<T> {
    pub fn key(&self) -> &ContextKey {
        &self.slot.key
    }

    /// Current value of the context.
    pub fn get(&self) -> Option<T> {
        self.try_get().ok()
    }

    /// Current value of the context, or why there is none.
    pub fn try_get(&self) -> Result<T> {
        let runtime = Runtime::upgrade(&self.runtime).ok_or(HookError::RuntimeDropped)?;
        let value = runtime
            .inner
            .contexts
            .borrow()
            .get(self.key())
            .ok_or_else(|| HookError::ContextUnset(self.key().clone()))?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| HookError::ContextType {
                key: self.key().clone(),
                expected: type_name::<T>(),
            })
    }

    /// Commit `value`, then call every subscriber with it in subscription
    /// order. Subscribers observe the store already updated.
    ///
    /// The subscribers are those registered when `set` is called. One that
    /// is unsubscribed by an earlier callback of the same broadcast is
    /// skipped.
    pub fn set(&self, value: T) {
        let Some(runtime) = Runtime::upgrade(&self.runtime) else {
            tracing::warn!(key = %self.key(), "context set after its runtime was dropped");
            return;
        };

        let value = Rc::new(value);
        let listeners = runtime
            .inner
            .contexts
            .borrow_mut()
            .set(self.key(), value.clone());
        tracing::debug!(
            key = %self.key(),
            subscribers = listeners.len(),
            "broadcasting context value"
        );
        for (id, listener) in listeners {
            let live = runtime.inner.contexts.borrow().is_subscribed(self.key(), id);
            if live {
                listener(&*value);
            }
        }
    }

    /// Call `callback` with every value set from now on.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.subscriber().subscribe(callback)
    }

    /// A handle that can subscribe to this context but not set it.
    pub fn subscriber(&self) -> ContextSubscriber<T> {
        ContextSubscriber {
            key: self.key().clone(),
            runtime: Weak::clone(&self.runtime),
            _marker: PhantomData,
        }
    }

    /// What a dependent unit needs to follow this context: the current
    /// value and a way to subscribe.
    pub fn child_props(&self) -> ChildProps<T> {
        ChildProps {
            initial_value: self.get(),
            subscriber: self.subscriber(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        Runtime::upgrade(&self.runtime).map_or(0, |runtime| {
            runtime.inner.contexts.borrow().subscriber_count(self.key())
        })
    }

    pub fn ptr_eq(a: &Context<T>, b: &Context<T>) -> bool {
        Rc::ptr_eq(&a.slot, &b.slot)
    }
}

/// Subscribe-only access to a context.
pub struct ContextSubscriber<T> {
    key: ContextKey,
    runtime: Weak<RuntimeInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ContextSubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            runtime: Weak::clone(&self.runtime),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ContextSubscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSubscriber")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> ContextSubscriber<T> {
    pub fn key(&self) -> &ContextKey {
        &self.key
    }

    /// Register `callback` under a fresh subscription id.
    ///
    /// Values of another type set under the same key are skipped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let Some(runtime) = Runtime::upgrade(&self.runtime) else {
            tracing::warn!(key = %self.key, "subscribing after the runtime was dropped");
            return Subscription {
                key: self.key.clone(),
                id: 0,
                runtime: Weak::new(),
                active: Cell::new(false),
            };
        };

        let listener: Listener = Rc::new(move |value: &dyn Any| {
            if let Some(value) = value.downcast_ref::<T>() {
                callback(value);
            }
        });
        let id = runtime
            .inner
            .contexts
            .borrow_mut()
            .subscribe(&self.key, listener);
        tracing::debug!(key = %self.key, id, "context subscription added");

        Subscription {
            key: self.key.clone(),
            id,
            runtime: self.runtime.clone(),
            active: Cell::new(true),
        }
    }
}

/// Bundle handed to a dependent unit so it can follow a context.
#[derive(Clone, Debug)]
pub struct ChildProps<T> {
    pub initial_value: Option<T>,
    pub subscriber: ContextSubscriber<T>,
}

/// A registered context subscriber.
///
/// Dropping a `Subscription` leaves the callback registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    key: ContextKey,
    id: u64,
    runtime: Weak<RuntimeInner>,
    active: Cell<bool>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn key(&self) -> &ContextKey {
        &self.key
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Remove exactly this subscription. Returns whether it was removed;
    /// later calls are no-ops.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.replace(false) {
            return false;
        }
        let Some(runtime) = Runtime::upgrade(&self.runtime) else {
            return false;
        };
        let removed = runtime
            .inner
            .contexts
            .borrow_mut()
            .unsubscribe(&self.key, self.id);
        tracing::debug!(key = %self.key, id = self.id, removed, "context subscription removed");
        removed
    }
}

/// The context hook.
///
/// On the slot's first call, seeds the store with `initial` if `key` has
/// no value yet. Later calls reuse the key recorded in the slot.
pub fn context<T, S>(slots: &S, runtime: &Runtime, key: ContextKey, initial: T) -> Context<T>
where
    T: Clone + 'static,
    S: SlotAccess + ?Sized,
{
    let slot = match claim_slot::<ContextSlot, _>(slots, HookKind::Context) {
        Some(slot) => slot,
        None => {
            if runtime.inner.contexts.borrow_mut().seed(&key, Rc::new(initial)) {
                tracing::debug!(key = %key, "seeded context");
            }
            let slot = Rc::new(ContextSlot { key });
            slots.write_slot(slot.clone());
            slot
        }
    };

    Context {
        slot,
        runtime: runtime.downgrade(),
        _marker: PhantomData,
    }
}
