//! Counter application combining state, reducer, memo and effect hooks

use hookbox::{deps, teardown, HookSet, Runtime};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct CounterState {
    count: i32,
    history: Vec<i32>,
}

#[derive(Debug)]
enum Action {
    Increment(i32),
    Decrement(i32),
    Reset,
}

fn reduce(state: &Rc<CounterState>, action: Action) -> Rc<CounterState> {
    let count = match action {
        Action::Increment(step) => state.count + step,
        Action::Decrement(step) => state.count - step,
        Action::Reset if state.count == 0 => return Rc::clone(state),
        Action::Reset => 0,
    };
    let mut history = state.history.clone();
    history.push(count);
    Rc::new(CounterState { count, history })
}

struct View {
    step: hookbox::State<i32>,
    counter: hookbox::Reducer<CounterState, Action>,
}

fn render(hooks: &HookSet) -> View {
    let step = hooks.use_state(1);
    let counter = hooks.use_reducer_with(
        reduce,
        CounterState {
            count: 0,
            history: vec![0],
        },
        |state: &Rc<CounterState>| println!("   [State] Count: {}", state.count),
    );

    let current = counter.get();
    let parity = hooks.use_memo(
        |_| if current.count % 2 == 0 { "even" } else { "odd" },
        deps![current.count],
    );
    let sign = hooks.use_memo(|_| current.count.signum(), deps![current.count]);

    hooks.use_effect(
        |deps| {
            println!("   [Effect] step is now {:?}", deps[0]);
            teardown(|| println!("   [Effect] step changing"))
        },
        deps![step.get()],
    );

    println!(
        "   Count: {} | Step: {} | {} | Sign: {}",
        current.count,
        step.get(),
        parity,
        sign
    );

    View { step, counter }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counter Application ===\n");

    let runtime = Runtime::new();
    let factory = runtime.factory(Some("counter"));

    println!("1. Initial render");
    let view = render(&factory.acquire());

    println!("\n2. Incrementing...");
    for _ in 0..3 {
        view.counter.dispatch(Action::Increment(view.step.get()));
        render(&factory.acquire());
    }

    println!("\n3. Changing step size to 5");
    view.step.set(5);
    render(&factory.acquire());

    println!("\n4. Decrementing...");
    for _ in 0..3 {
        view.counter.dispatch(Action::Decrement(view.step.get()));
        render(&factory.acquire());
    }

    println!("\n5. History: {:?}", view.counter.get().history);

    println!("\n6. Resetting twice (the second reset changes nothing)");
    for _ in 0..2 {
        if view.counter.dispatch(Action::Reset) {
            render(&factory.acquire());
        }
    }

    println!("\n7. Final history: {:?}", view.counter.get().history);

    println!("\n8. Unmounting");
    runtime.retire(factory.key());

    println!("\nCounter application complete!");
}
