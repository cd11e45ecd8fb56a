//! Hook operations.
//!
//! Every hook is a plain function over a [`SlotAccess`]: it reads the next
//! slot, reuses it if it holds the hook's record, and otherwise writes a
//! fresh one. [`HookSet`] bundles those functions for one render of one
//! identity key:
//! - [`HookSet::use_state`] / [`HookSet::use_state_with`]: local state
//! - [`HookSet::use_ref`]: a mutable cell that never notifies
//! - [`HookSet::use_reducer`] / [`HookSet::use_reducer_with`]: action-driven state
//! - [`HookSet::use_effect`]: side effects gated on dependencies
//! - [`HookSet::use_memo`]: cached computation gated on dependencies
//! - [`HookSet::use_context`]: shared, broadcast state

mod context;
mod effect;
mod memo;
mod reducer;
mod state;

pub use context::{context, ChildProps, Context, ContextSubscriber, Subscription};
pub use effect::{effect, teardown, Teardown};
pub use memo::memo;
pub use reducer::{reducer, ReduceFn, Reducer};
pub use state::{ref_cell, state, Ref, State};

pub(crate) use effect::EffectSlot;

use crate::config::{HookConfig, HookKind};
use crate::deps::{Dep, Deps};
use crate::error::Result;
use crate::key::HookKey;
use crate::runtime::{CursorHandle, Runtime};
use crate::store::{ContextKey, Slot};
use std::any::Any;
use std::rc::Rc;

/// Update callback passed to state and reducer hooks.
pub type Callback<T> = Rc<dyn Fn(&T)>;

/// Positional slot access for one render of one key.
pub trait SlotAccess {
    /// Advance to the next position and return its slot, if written.
    fn next_slot(&self) -> Option<Slot>;

    /// Store `slot` at the current position.
    fn write_slot(&self, slot: Slot) -> Slot;

    fn key(&self) -> &HookKey;

    fn position(&self) -> usize;
}

/// Take the next slot if it holds a `T`.
///
/// A slot of another type means the hooks of this key were called in a
/// different order than on an earlier render. The slot is reported and
/// treated as absent, so the caller overwrites it.
pub(crate) fn claim_slot<T, S>(slots: &S, hook: HookKind) -> Option<Rc<T>>
where
    T: Any,
    S: SlotAccess + ?Sized,
{
    let slot = slots.next_slot()?;
    match slot.downcast::<T>() {
        Ok(slot) => Some(slot),
        Err(_) => {
            tracing::warn!(
                key = %slots.key(),
                position = slots.position(),
                hook = %hook,
                "hook slot holds another hook's state; hook call order changed between renders"
            );
            None
        }
    }
}

/// The hooks of one render of one identity key.
///
/// Hooks must be called in the same order on every render of a key: the
/// Nth call always resolves to the Nth slot.
///
/// A set built with a restricted [`HookConfig`] still has every typed
/// method, but debug builds panic when one of them is called for a hook
/// the config does not expose.
///
/// ```
/// use hookbox::{deps, Runtime};
///
/// let runtime = Runtime::new();
/// for _ in 0..3 {
///     let hooks = runtime.hooks("greeter");
///     let name = hooks.use_state(String::from("world"));
///     let greeting = hooks.use_memo(|_| format!("hello, {}", name.get()), deps![]);
///     assert_eq!(greeting, "hello, world");
/// }
/// ```
pub struct HookSet {
    cursor: CursorHandle,
    config: Rc<HookConfig>,
}

impl HookSet {
    pub(crate) fn new(cursor: CursorHandle, config: Rc<HookConfig>) -> Self {
        Self { cursor, config }
    }

    pub fn key(&self) -> &HookKey {
        self.cursor.key()
    }

    pub fn runtime(&self) -> &Runtime {
        self.cursor.runtime()
    }

    pub fn cursor(&self) -> &CursorHandle {
        &self.cursor
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Look up a hook by the name this set exposes it under.
    pub fn resolve(&self, name: &str) -> Result<HookKind> {
        self.config.resolve(name)
    }

    pub fn exposes(&self, kind: HookKind) -> bool {
        self.config.exposes(kind)
    }

    fn check_exposed(&self, kind: HookKind) {
        debug_assert!(
            self.exposes(kind),
            "`{kind}` is not exposed by the hook set for `{}`",
            self.key()
        );
    }

    /// Local state without an update callback.
    pub fn use_state<T: Clone + 'static>(&self, initial: T) -> State<T> {
        self.check_exposed(HookKind::State);
        state(&self.cursor, initial, None)
    }

    /// Local state whose `set` calls `on_update` with the new value.
    pub fn use_state_with<T, F>(&self, initial: T, on_update: F) -> State<T>
    where
        T: Clone + 'static,
        F: Fn(&T) + 'static,
    {
        self.check_exposed(HookKind::State);
        state(&self.cursor, initial, Some(Rc::new(on_update)))
    }

    pub fn use_ref<T: 'static>(&self, initial: T) -> Ref<T> {
        self.check_exposed(HookKind::Ref);
        ref_cell(&self.cursor, initial)
    }

    pub fn use_reducer<St, A, R>(&self, reduce: R, initial: St) -> Reducer<St, A>
    where
        St: 'static,
        A: 'static,
        R: Fn(&Rc<St>, A) -> Rc<St> + 'static,
    {
        self.check_exposed(HookKind::Reducer);
        reducer(&self.cursor, Rc::new(reduce), initial, None)
    }

    pub fn use_reducer_with<St, A, R, F>(
        &self,
        reduce: R,
        initial: St,
        on_update: F,
    ) -> Reducer<St, A>
    where
        St: 'static,
        A: 'static,
        R: Fn(&Rc<St>, A) -> Rc<St> + 'static,
        F: Fn(&Rc<St>) + 'static,
    {
        self.check_exposed(HookKind::Reducer);
        reducer(&self.cursor, Rc::new(reduce), initial, Some(Rc::new(on_update)))
    }

    /// Run `body` when `deps` changed since the last run. Returns whether
    /// it ran.
    pub fn use_effect<F>(&self, body: F, deps: impl Into<Option<Deps>>) -> bool
    where
        F: FnOnce(&[Dep]) -> Option<Teardown>,
    {
        self.check_exposed(HookKind::Effect);
        effect(&self.cursor, body, deps.into())
    }

    pub fn use_memo<T, F>(&self, compute: F, deps: impl Into<Option<Deps>>) -> T
    where
        T: Clone + 'static,
        F: FnOnce(&[Dep]) -> T,
    {
        self.check_exposed(HookKind::Memo);
        memo(&self.cursor, compute, deps.into())
    }

    pub fn use_context<T: Clone + 'static>(
        &self,
        key: impl Into<ContextKey>,
        initial: T,
    ) -> Context<T> {
        self.check_exposed(HookKind::Context);
        context(&self.cursor, self.cursor.runtime(), key.into(), initial)
    }

    /// Run a custom hook against this set.
    pub fn use_hook<F, R>(&self, hook: &CustomHook<F>) -> R
    where
        F: Fn(&HookSet) -> R,
    {
        hook.call(self)
    }
}

/// A reusable hook composed from other hooks.
///
/// ```
/// use hookbox::{new_hook, Runtime};
///
/// let use_render_count = new_hook(|hooks| {
///     let count = hooks.use_ref(0);
///     count.set(count.get() + 1);
///     count.get()
/// });
///
/// let factory = Runtime::new().factory(Some("counter"));
/// assert_eq!(factory.acquire().use_hook(&use_render_count), 1);
/// assert_eq!(factory.acquire().use_hook(&use_render_count), 2);
/// ```
#[derive(Clone)]
pub struct CustomHook<F> {
    f: F,
}

impl<F> CustomHook<F> {
    pub fn call<R>(&self, hooks: &HookSet) -> R
    where
        F: Fn(&HookSet) -> R,
    {
        (self.f)(hooks)
    }
}

/// Wrap `f` as a custom hook.
pub fn new_hook<F, R>(f: F) -> CustomHook<F>
where
    F: Fn(&HookSet) -> R,
{
    CustomHook { f }
}

/// Re-acquires the same key on every call: one [`HookFactory::acquire`] is
/// one render.
#[derive(Clone)]
pub struct HookFactory {
    runtime: Runtime,
    key: HookKey,
    config: Rc<HookConfig>,
}

impl HookFactory {
    pub(crate) fn new(runtime: Runtime, key: HookKey, config: Rc<HookConfig>) -> Self {
        Self {
            runtime,
            key,
            config,
        }
    }

    pub fn key(&self) -> &HookKey {
        &self.key
    }

    pub fn acquire(&self) -> HookSet {
        self.runtime.hooks_with(self.key.clone(), Rc::clone(&self.config))
    }
}

/// Start a render for `key` on the current runtime.
pub fn use_hooks(key: impl Into<HookKey>) -> HookSet {
    Runtime::current().hooks(key)
}

/// Start a render for `key` on the current runtime with a custom name table.
pub fn use_hooks_with(key: impl Into<HookKey>, config: Rc<HookConfig>) -> HookSet {
    Runtime::current().hooks_with(key, config)
}
