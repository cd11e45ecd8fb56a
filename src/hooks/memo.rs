use super::{claim_slot, SlotAccess};
use crate::config::HookKind;
use crate::deps::{shallow_equal, Dep, Deps};
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) struct MemoSlot<T> {
    last_deps: RefCell<Option<Deps>>,
    last_result: RefCell<T>,
}

/// The memo hook.
///
/// Returns the cached result while `deps` stay shallow-equal to the
/// previous call's dependencies; otherwise calls `compute` with the
/// dependency values and caches its result. Wrap the result in an `Rc` to
/// share one allocation across renders.
pub fn memo<T, F, S>(slots: &S, compute: F, deps: Option<Deps>) -> T
where
    T: Clone + 'static,
    F: FnOnce(&[Dep]) -> T,
    S: SlotAccess + ?Sized,
{
    match claim_slot::<MemoSlot<T>, _>(slots, HookKind::Memo) {
        Some(slot) => {
            if shallow_equal(slot.last_deps.borrow().as_deref(), deps.as_deref()) {
                return slot.last_result.borrow().clone();
            }
            let result = compute(deps.as_deref().unwrap_or_default());
            *slot.last_deps.borrow_mut() = deps;
            *slot.last_result.borrow_mut() = result.clone();
            result
        }
        None => {
            let result = compute(deps.as_deref().unwrap_or_default());
            slots.write_slot(Rc::new(MemoSlot {
                last_deps: RefCell::new(deps),
                last_result: RefCell::new(result.clone()),
            }));
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{deps, Dep, Deps, Runtime, State};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn increment(deps: &[Dep]) -> Rc<i64> {
        match deps.first() {
            Some(Dep::Int(n)) => Rc::new(n + 1),
            _ => Rc::new(0),
        }
    }

    #[test]
    fn skips_when_dependencies_are_unchanged() {
        let factory = Runtime::new().factory(Some("memo"));
        let calls = Rc::new(Cell::new(0));
        let counted = || {
            let calls = Rc::clone(&calls);
            move |deps: &[Dep]| {
                calls.set(calls.get() + 1);
                increment(deps)
            }
        };

        let first = factory.acquire().use_memo(counted(), deps![1]);
        assert_eq!(*first, 2);
        assert_eq!(calls.get(), 1);

        let same = factory.acquire().use_memo(counted(), deps![1]);
        assert_eq!(calls.get(), 1);
        assert!(Rc::ptr_eq(&first, &same));

        let second = factory.acquire().use_memo(counted(), deps![*first + 1]);
        assert_eq!(*second, 4);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn absent_dependencies_always_recompute() {
        let factory = Runtime::new().factory(Some("memo"));
        let calls = Rc::new(Cell::new(0));

        for _ in 0..2 {
            let calls = Rc::clone(&calls);
            factory.acquire().use_memo(
                move |_| {
                    calls.set(calls.get() + 1);
                },
                None::<Deps>,
            );
        }

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn shared_values_are_compared_by_identity() {
        let factory = Runtime::new().factory(Some("memo"));
        let rows = Rc::new(vec![3, 1, 2]);
        let calls = Rc::new(Cell::new(0));

        let sorted = |rows: &Rc<Vec<i32>>| {
            let source = Rc::clone(rows);
            let calls = Rc::clone(&calls);
            factory.acquire().use_memo(
                move |_| {
                    calls.set(calls.get() + 1);
                    let mut sorted = (*source).clone();
                    sorted.sort();
                    sorted
                },
                deps![rows],
            )
        };

        assert_eq!(sorted(&rows), vec![1, 2, 3]);
        assert_eq!(sorted(&rows), vec![1, 2, 3]);
        assert_eq!(calls.get(), 1);

        let same_contents = Rc::new(vec![3, 1, 2]);
        sorted(&same_contents);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn compute_rerendering_its_own_key_stays_consistent() {
        fn render(runtime: &Runtime, seen: &Rc<RefCell<Vec<i32>>>) -> State<i32> {
            let hooks = runtime.hooks("memo_reentrant");
            let count = hooks.use_state_with(0, {
                let runtime = runtime.clone();
                let seen = Rc::clone(seen);
                move |_: &i32| {
                    render(&runtime, &seen);
                }
            });

            let current = count.get();
            let value = hooks.use_memo(
                |_| {
                    if current == 0 {
                        count.set(1);
                    }
                    current * 10
                },
                deps![current],
            );
            seen.borrow_mut().push(value);
            count
        }

        let runtime = Runtime::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let count = render(&runtime, &seen);
        assert_eq!(count.get(), 1);
        // The nested render finishes first
        assert_eq!(*seen.borrow(), vec![10, 0]);

        render(&runtime, &seen);
        render(&runtime, &seen);
        assert_eq!(*seen.borrow(), vec![10, 0, 10, 10]);
        assert_eq!(runtime.slot_count("memo_reentrant"), 2);
    }
}
