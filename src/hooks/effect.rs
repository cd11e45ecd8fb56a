use super::{claim_slot, SlotAccess};
use crate::config::HookKind;
use crate::deps::{shallow_equal, Dep, Deps};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Cleanup returned by an effect body, run before the effect runs again.
pub type Teardown = Box<dyn FnOnce()>;

/// Box a cleanup closure for returning from an effect body.
pub fn teardown(f: impl FnOnce() + 'static) -> Option<Teardown> {
    Some(Box::new(f))
}

#[derive(Default)]
pub(crate) struct EffectSlot {
    last_deps: RefCell<Option<Deps>>,
    tear_down: RefCell<Option<Teardown>>,
    runs: Cell<u64>,
}

impl EffectSlot {
    /// Run and clear the stored teardown. Returns whether there was one.
    pub(crate) fn run_teardown(&self) -> bool {
        let tear_down = self.tear_down.borrow_mut().take();
        match tear_down {
            Some(tear_down) => {
                tear_down();
                true
            }
            None => false,
        }
    }
}

/// The effect hook.
///
/// Runs `body` unless the slot's previous dependencies are present and
/// shallow-equal to `deps`. Before a re-run the previous teardown is
/// called. `body` receives the dependency values; with `deps` absent it
/// receives an empty slice and runs on every call.
///
/// A body may re-render its own key and so run this effect again before
/// it returns. The nested run is the latest one: its teardown is kept, and
/// the teardown returned by the outer body is run right away.
///
/// Returns whether `body` ran.
pub fn effect<F, S>(slots: &S, body: F, deps: Option<Deps>) -> bool
where
    F: FnOnce(&[Dep]) -> Option<Teardown>,
    S: SlotAccess + ?Sized,
{
    let slot = match claim_slot::<EffectSlot, _>(slots, HookKind::Effect) {
        Some(slot) => {
            if shallow_equal(slot.last_deps.borrow().as_deref(), deps.as_deref()) {
                return false;
            }
            slot
        }
        None => {
            let slot = Rc::new(EffectSlot::default());
            slots.write_slot(slot.clone());
            slot
        }
    };

    slot.run_teardown();
    *slot.last_deps.borrow_mut() = deps.clone();
    let run = slot.runs.get() + 1;
    slot.runs.set(run);

    let tear_down = body(deps.as_deref().unwrap_or_default());
    if slot.runs.get() == run {
        *slot.tear_down.borrow_mut() = tear_down;
    } else if let Some(stale) = tear_down {
        stale();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::teardown;
    use crate::{deps, Deps, Runtime, State};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn skips_when_dependencies_are_unchanged() {
        let factory = Runtime::new().factory(Some("effect"));
        let runs = Rc::new(Cell::new(0));
        let tear_downs = Rc::new(Cell::new(0));

        let effect = || {
            let runs = Rc::clone(&runs);
            let tear_downs = Rc::clone(&tear_downs);
            move |_: &[crate::Dep]| {
                runs.set(runs.get() + 1);
                teardown(move || tear_downs.set(tear_downs.get() + 1))
            }
        };

        assert!(factory.acquire().use_effect(effect(), deps![1]));
        assert_eq!((runs.get(), tear_downs.get()), (1, 0));

        assert!(!factory.acquire().use_effect(effect(), deps![1]));
        assert_eq!((runs.get(), tear_downs.get()), (1, 0));

        assert!(factory.acquire().use_effect(effect(), deps![1, 2]));
        assert_eq!((runs.get(), tear_downs.get()), (2, 1));

        assert!(!factory.acquire().use_effect(effect(), deps![1, 2]));
        assert_eq!((runs.get(), tear_downs.get()), (2, 1));
    }

    #[test]
    fn teardown_runs_before_the_next_body() {
        let factory = Runtime::new().factory(Some("effect"));
        let log = Rc::new(RefCell::new(Vec::new()));

        for value in [1, 2] {
            let log = Rc::clone(&log);
            factory.acquire().use_effect(
                move |deps| {
                    log.borrow_mut().push(format!("run {:?}", deps[0]));
                    teardown(move || log.borrow_mut().push(format!("cleanup {value}")))
                },
                deps![value],
            );
        }

        assert_eq!(*log.borrow(), vec!["run 1", "cleanup 1", "run 2"]);
    }

    #[test]
    fn body_rerendering_its_own_key_keeps_the_latest_teardown() {
        fn render(runtime: &Runtime, log: &Rc<RefCell<Vec<String>>>) -> State<i32> {
            let hooks = runtime.hooks("reentrant");
            let count = hooks.use_state_with(0, {
                let runtime = runtime.clone();
                let log = Rc::clone(log);
                move |_: &i32| {
                    render(&runtime, &log);
                }
            });

            let current = count.get();
            hooks.use_effect(
                |_| {
                    log.borrow_mut().push(format!("run {current}"));
                    if current == 0 {
                        count.set(1);
                    }
                    let log = Rc::clone(log);
                    teardown(move || log.borrow_mut().push(format!("cleanup {current}")))
                },
                deps![current],
            );
            count
        }

        let runtime = Runtime::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let count = render(&runtime, &log);
        assert_eq!(*log.borrow(), vec!["run 0", "run 1", "cleanup 0"]);

        count.set(2);
        assert_eq!(
            *log.borrow(),
            vec!["run 0", "run 1", "cleanup 0", "cleanup 1", "run 2"]
        );

        runtime.retire("reentrant");
        assert_eq!(log.borrow().last().map(String::as_str), Some("cleanup 2"));
    }

    #[test]
    fn body_receives_the_dependency_values() {
        let factory = Runtime::new().factory(Some("effect"));
        let seen = Rc::new(RefCell::new(Vec::new()));

        factory.acquire().use_effect(
            {
                let seen = Rc::clone(&seen);
                move |deps| {
                    seen.borrow_mut().extend(deps.iter().cloned());
                    None
                }
            },
            deps!["user", 7],
        );

        assert_eq!(*seen.borrow(), deps!["user", 7].to_vec());
    }

    #[test]
    fn absent_dependencies_run_every_time() {
        let factory = Runtime::new().factory(Some("effect"));
        let runs = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let runs = Rc::clone(&runs);
            factory.acquire().use_effect(
                move |deps| {
                    assert!(deps.is_empty());
                    runs.set(runs.get() + 1);
                    None
                },
                None::<Deps>,
            );
        }

        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn empty_dependencies_run_once() {
        let factory = Runtime::new().factory(Some("effect"));
        let runs = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let runs = Rc::clone(&runs);
            factory.acquire().use_effect(
                move |_| {
                    runs.set(runs.get() + 1);
                    None
                },
                deps![],
            );
        }

        assert_eq!(runs.get(), 1);
    }
}
