//! Runtime support for hooks.
//!
//! A [`Runtime`] owns the slot store and the context store. Every thread
//! has a default runtime; scoped runtimes can be pushed on top of it for
//! isolation, mostly in tests.

mod cursor;

pub use cursor::CursorHandle;

use crate::config::HookConfig;
use crate::hooks::{EffectSlot, HookFactory, HookSet};
use crate::key::{new_hook_key, HookKey};
use crate::store::{ContextStore, SlotStore};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) struct RuntimeInner {
    pub(crate) slots: RefCell<SlotStore>,
    pub(crate) contexts: RefCell<ContextStore>,
    default_config: Rc<HookConfig>,
}

/// Hook runtime: slot storage per identity key plus shared contexts.
///
/// `Runtime` is a cheap handle; clones refer to the same stores. It is
/// single-threaded and no store borrow is held while user callbacks run,
/// so callbacks may call back into the runtime.
///
/// # Examples
///
/// Using the thread's default runtime:
///
/// ```
/// use hookbox::use_hooks;
///
/// let hooks = use_hooks("counter");
/// let count = hooks.use_state(0);
/// assert_eq!(count.get(), 0);
/// ```
///
/// Using a scoped runtime for isolation:
///
/// ```
/// use hookbox::{use_hooks, Runtime};
///
/// Runtime::scope(|| {
///     let hooks = use_hooks("counter");
///     hooks.use_state(0).set(3);
/// });
/// // The scoped runtime and all its state is dropped here
/// assert_eq!(use_hooks("counter").use_state(0).get(), 0);
/// ```
#[derive(Clone)]
pub struct Runtime {
    pub(crate) inner: Rc<RuntimeInner>,
}

thread_local! {
    static RUNTIME_STACK: RefCell<Vec<Runtime>> = const { RefCell::new(Vec::new()) };
    static GLOBAL_RUNTIME: Runtime = Runtime::new();
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Create a new, empty runtime.
    pub fn new() -> Self {
        Runtime {
            inner: Rc::new(RuntimeInner {
                slots: RefCell::new(SlotStore::new()),
                contexts: RefCell::new(ContextStore::new()),
                default_config: Rc::new(HookConfig::default()),
            }),
        }
    }

    /// Run a function with a fresh isolated runtime.
    ///
    /// The runtime and all its state is dropped when the function returns,
    /// unless a handle to it escapes.
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_runtime(Self::new(), f)
    }

    /// The default runtime of the current thread.
    pub fn global() -> Self {
        GLOBAL_RUNTIME.with(Runtime::clone)
    }

    /// The innermost scoped runtime, or the thread's default runtime.
    pub fn current() -> Self {
        RUNTIME_STACK.with(|stack| stack.borrow().last().cloned().unwrap_or_else(Self::global))
    }

    /// Run a function with `runtime` as the current runtime.
    pub fn with_runtime<F, R>(runtime: Runtime, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().push(runtime);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Start a render for `key`: a cursor positioned before its first slot.
    pub fn acquire(&self, key: impl Into<HookKey>) -> CursorHandle {
        let key = key.into();
        tracing::trace!(key = %key, "acquiring hooks");
        self.inner.slots.borrow_mut().ensure(&key);
        CursorHandle::new(self.clone(), key)
    }

    /// Start a render for `key` with every hook exposed.
    pub fn hooks(&self, key: impl Into<HookKey>) -> HookSet {
        let config = Rc::clone(&self.inner.default_config);
        HookSet::new(self.acquire(key), config)
    }

    /// Start a render for `key` with a custom hook name table.
    pub fn hooks_with(&self, key: impl Into<HookKey>, config: Rc<HookConfig>) -> HookSet {
        HookSet::new(self.acquire(key), config)
    }

    /// A factory over a freshly generated key; every `acquire` is a render.
    pub fn factory(&self, prefix: Option<&str>) -> HookFactory {
        let config = Rc::clone(&self.inner.default_config);
        HookFactory::new(self.clone(), new_hook_key(prefix), config)
    }

    /// Like [`Runtime::factory`], with a custom hook name table.
    pub fn factory_with(&self, prefix: Option<&str>, config: Rc<HookConfig>) -> HookFactory {
        HookFactory::new(self.clone(), new_hook_key(prefix), config)
    }

    /// Release every slot of `key`.
    ///
    /// Effects still holding a teardown have it run, in slot order, after
    /// the entry has been removed. Returns the number of slots released.
    /// The runtime never retires keys on its own.
    pub fn retire(&self, key: impl Into<HookKey>) -> usize {
        let key = key.into();
        let Some(slots) = self.inner.slots.borrow_mut().remove(&key) else {
            return 0;
        };

        let released = slots.len();
        let mut torn_down = 0;
        for slot in slots {
            if let Ok(effect) = slot.downcast::<EffectSlot>() {
                if effect.run_teardown() {
                    torn_down += 1;
                }
            }
        }
        tracing::debug!(key = %key, released, torn_down, "retired hook key");
        released
    }

    /// Drop every slot and context without running teardowns.
    ///
    /// Useful for resetting between tests.
    pub fn clear(&self) {
        self.inner.slots.borrow_mut().clear();
        self.inner.contexts.borrow_mut().clear();
    }

    /// Number of slots written for `key`.
    pub fn slot_count(&self, key: impl Into<HookKey>) -> usize {
        self.inner.slots.borrow().len(&key.into())
    }

    /// Number of keys that have been acquired and not retired.
    pub fn key_count(&self) -> usize {
        self.inner.slots.borrow().key_count()
    }

    pub(crate) fn downgrade(&self) -> Weak<RuntimeInner> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(inner: &Weak<RuntimeInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Runtime { inner })
    }

    /// Whether two handles refer to the same runtime.
    pub fn ptr_eq(a: &Runtime, b: &Runtime) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("keys", &self.key_count())
            .finish_non_exhaustive()
    }
}
