/*!
First-wins fan-in over one-shot done signals.

A [`Signal`] is a write-once broadcast: it starts open, closes at most once
when its [`Trigger`] is fired, and every observer sees the close. [`merge_or`]
derives one signal from many that closes as soon as any input does.

# Design requirements:
- Writers and readers are different types. The utility only ever holds readers
  of its inputs, so it can never close them.
- No payloads, no re-arming, no counting: the only thing a signal says is "done".
- Timeouts and cancellation are just more inputs. Pass [`Signal::after`] or a
  signal you trigger yourself.

# Basic usage

```rust
use signal_merge::*;
use tokio::time::{Duration, Instant};

# #[tokio::main(flavor = "current_thread", start_paused = true)]
# async fn main() {
let start = Instant::now();
merge_or!(
    Signal::after(Duration::from_secs(2 * 60 * 60)),
    Signal::after(Duration::from_secs(5 * 60)),
    Signal::after(Duration::from_secs(1)),
)
.wait()
.await;
println!("done after {:?}", start.elapsed());
# }
```

# Edge cases

```rust
use signal_merge::*;

// nothing to wait for: already closed
assert!(merge_or(Vec::<Signal>::new()).is_closed());

// a single input is handed back as-is
let trigger = Trigger::new();
let merged = merge_or([trigger.signal()]);
assert_eq!(merged.id(), trigger.signal().id());
```
*/

mod error;
mod merge;
mod signal;
mod task;
mod wait;

pub use error::*;
pub use merge::*;
pub use signal::*;
pub use wait::*;

/// Variadic form of [`merge_or`]: `merge_or!(a, b, c)`.
/// With no arguments it yields an already-closed signal.
#[macro_export]
macro_rules! merge_or {
    () => {
        $crate::Signal::closed()
    };
    ($($signal:expr),+ $(,)?) => {
        $crate::merge_or([$($signal),+])
    };
}
