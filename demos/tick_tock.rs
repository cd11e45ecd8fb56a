//! Two shared contexts driving three subscribed children.
//!
//! The "app" unit owns a `tick` and a `tock` context. Two Tick children and
//! one Tock child follow them through `child_props()`; every broadcast
//! re-renders only the children subscribed to that context.
//!
//! Run with `RUST_LOG=hookbox=debug` to see the runtime's own logging.

use hookbox::{
    deps, new_hook, new_hook_key, ChildProps, CustomHook, HookKey, HookSet, Runtime, Subscription,
};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing_subscriber::EnvFilter;

type RenderFn = fn(&Runtime, &HookKey, i32, &dyn Fn());

fn render_counter() -> CustomHook<impl Fn(&HookSet) -> usize> {
    new_hook(|hooks: &HookSet| {
        let count = hooks.use_ref(0_usize);
        count.set(count.get() + 1);
        count.get()
    })
}

fn counter_message(render_count: usize, prepend: &str) -> String {
    format!("{prepend}I've been called {render_count} times.")
}

type Render = Rc<Box<dyn Fn()>>;

/// A child unit following one context value.
///
/// Holds the latest broadcast value and re-renders its component whenever
/// the context changes.
struct Subscribed {
    key: HookKey,
    value: Rc<Cell<i32>>,
    render: Render,
    subscription: Subscription,
}

impl Subscribed {
    fn mount(runtime: &Runtime, label: &str, props: ChildProps<i32>, component: RenderFn) -> Self {
        let key = new_hook_key(Some(label));
        let value = Rc::new(Cell::new(props.initial_value.unwrap_or_default()));

        // Components may ask for a re-render from inside their own render.
        let render: Render = Rc::new_cyclic(|this: &Weak<Box<dyn Fn()>>| {
            let runtime = runtime.clone();
            let key = key.clone();
            let value = Rc::clone(&value);
            let this = this.clone();
            Box::new(move || {
                let update = || {
                    if let Some(render) = this.upgrade() {
                        render();
                    }
                };
                component(&runtime, &key, value.get(), &update);
            }) as Box<dyn Fn()>
        });

        let subscription = props.subscriber.subscribe({
            let value = Rc::clone(&value);
            let render = Rc::downgrade(&render);
            move |next: &i32| {
                value.set(*next);
                if let Some(render) = render.upgrade() {
                    render();
                }
            }
        });

        render();
        Subscribed {
            key,
            value,
            render,
            subscription,
        }
    }

    fn unmount(self, runtime: &Runtime) -> usize {
        self.subscription.unsubscribe();
        runtime.retire(&self.key)
    }
}

fn tick(runtime: &Runtime, key: &HookKey, value: i32, update: &dyn Fn()) {
    let hooks = runtime.hooks(key);
    let renders = hooks.use_hook(&render_counter());
    let local = hooks.use_state(0);

    println!(
        "  [{key}] {}",
        counter_message(renders, &format!("Tick received value {value}. "))
    );
    println!("  [{key}] Hook \"use_state\" has value: {}.", local.get());

    // Clicking the child's own button: every third render bumps local state.
    if renders % 3 == 0 {
        local.set(local.get() + 1);
        update();
    }
}

fn tock(runtime: &Runtime, key: &HookKey, value: i32, _update: &dyn Fn()) {
    let hooks = runtime.hooks(key);
    let renders = hooks.use_hook(&render_counter());
    let memo_count = hooks.use_ref(0);
    let doubled = hooks.use_memo(
        |_| {
            memo_count.set(memo_count.get() + 1);
            value * 2
        },
        deps![value],
    );

    println!(
        "  [{key}] {}",
        counter_message(renders, &format!("Tock received value {value}. "))
    );
    println!(
        "  [{key}] Hook \"use_memo\" has value: {doubled}, which was calculated {} times so far.",
        memo_count.get()
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let runtime = Runtime::new();

    let app = runtime.hooks("app");
    let tick_ctx = app.use_context("tick", 0);
    let tock_ctx = app.use_context("tock", 0);
    let renders = app.use_hook(&render_counter());
    app.use_effect(
        |_| {
            println!("app mounted");
            None
        },
        deps![],
    );
    println!("[app] {}", counter_message(renders, ""));

    println!("\nMounting children");
    let children = [
        Subscribed::mount(&runtime, "tick", tick_ctx.child_props(), tick),
        Subscribed::mount(&runtime, "tick", tick_ctx.child_props(), tick),
        Subscribed::mount(&runtime, "tock", tock_ctx.child_props(), tock),
    ];

    for step in 1..=6 {
        println!("\nStep {step}");
        if step % 2 == 1 {
            let next = tock_ctx.get().unwrap_or_default() + 1;
            tock_ctx.set(next);
        } else {
            let next = tick_ctx.get().unwrap_or_default() + 1;
            tick_ctx.set(next);
        }
    }

    println!("\nFinal values");
    for child in &children {
        println!("  [{}] last value {}", child.key, child.value.get());
    }

    let [first, second, tocker] = children;
    println!("\nRe-rendering {} by hand", first.key);
    (first.render)();

    println!("\nUnmounting {}", first.key);
    let first_key = first.key.clone();
    println!("  released {} slots", first.unmount(&runtime));
    tick_ctx.set(tick_ctx.get().unwrap_or_default() + 1);
    println!("  {first_key} no longer follows tick");

    second.unmount(&runtime);
    tocker.unmount(&runtime);
    println!("\nkeys left: {}", runtime.key_count());
}
