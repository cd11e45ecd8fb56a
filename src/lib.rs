//! # Hookbox
//!
//! A hooks runtime that is not tied to any view framework.
//!
//! A rendering function is called again and again for the same logical
//! unit, identified by a [`HookKey`]. On every call it asks the runtime for
//! a [`HookSet`] and calls the same hooks in the same order; each hook call
//! resolves to the slot at its position, so state survives between calls.
//!
//! ## Hooks
//!
//! - `use_state` - local state; `set` calls the update callback
//! - `use_ref` - a mutable cell that never notifies
//! - `use_reducer` - state driven by dispatched actions
//! - `use_effect` - side effects gated on a dependency list, with teardown
//! - `use_memo` - cached computation gated on a dependency list
//! - `use_context` - state shared between keys, with subscribers
//!
//! ## Runtime
//!
//! A [`Runtime`] owns the slot store and the context store. Each thread
//! has a default runtime; [`Runtime::scope`] runs code against a fresh one.
//! The runtime never decides when to render: mutators call the callbacks
//! the caller supplied, synchronously, and the caller re-renders.
//!
//! ```
//! use hookbox::{deps, Runtime};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let runtime = Runtime::new();
//! let renders = Rc::new(Cell::new(0));
//!
//! let render = |runtime: &Runtime| {
//!     renders.set(renders.get() + 1);
//!     let hooks = runtime.hooks("counter");
//!     let count = hooks.use_state(0);
//!     let label = hooks.use_memo(|deps| format!("count is {:?}", deps[0]), deps![count.get()]);
//!     (count, label)
//! };
//!
//! let (count, label) = render(&runtime);
//! assert_eq!(label, "count is 0");
//!
//! count.set(2);
//! let (_, label) = render(&runtime);
//! assert_eq!(label, "count is 2");
//! assert_eq!(renders.get(), 2);
//! ```

pub mod config;
pub mod deps;
pub mod error;
pub mod hooks;
pub mod key;
pub mod runtime;
pub mod store;

// Re-export main types for convenience
pub use config::{HookConfig, HookKind};
pub use deps::{shallow_equal, Dep, Deps};
pub use error::{HookError, Result};
pub use hooks::{
    new_hook, teardown, use_hooks, use_hooks_with, ChildProps, Context, ContextSubscriber,
    CustomHook, HookFactory, HookSet, Reducer, Ref, State, Subscription, Teardown,
};
pub use key::{new_hook_key, HookKey};
pub use runtime::{CursorHandle, Runtime};
pub use store::ContextKey;
