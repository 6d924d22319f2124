use tracing::{debug, trace};

use crate::{
    error::Error,
    signal::{Signal, Trigger},
    task,
};

/// Inputs raced directly by one fan-in task. A task races these plus, when
/// more inputs follow, the output of the task handling the remainder, plus the
/// output of the task it feeds into.
const FAN_IN: usize = 3;

/// Combine `signals` into one signal that closes as soon as any input closes.
///
/// - no inputs: returns an already-closed signal
/// - one input: returns that very signal (same [`Signal::id`]), no task is spawned
/// - two or more: spawns fan-in tasks onto the current runtime and returns
///   their combined output
///
/// Input signals are only observed, never closed. If none of them ever
/// closes, the output stays open and its fan-in tasks stay parked. To bound
/// the wait, pass a [`Signal::after`] as one more input. Once the output
/// closes, every fan-in task behind it exits.
///
/// # Panics
/// With two or more inputs, panics when called outside a tokio runtime, as
/// `tokio::spawn` does. See [`try_merge_or`] for the checked form.
pub fn merge_or<I>(signals: I) -> Signal
where I: IntoIterator<Item = Signal> {
    let signals: Vec<Signal> = signals.into_iter().collect();
    if signals.len() < 2 {
        trace!("merge_or passthrough for {} signal(s)", signals.len());
        return signals.into_iter().next().unwrap_or_else(Signal::closed);
    }
    fan_in(signals)
}

/// Like [`merge_or`], but reports a missing runtime instead of panicking.
/// Zero or one input never needs a runtime and always succeeds.
pub fn try_merge_or<I>(signals: I) -> Result<Signal, Error>
where I: IntoIterator<Item = Signal> {
    let signals: Vec<Signal> = signals.into_iter().collect();
    if signals.len() >= 2 {
        task::ensure_runtime()?;
    }
    Ok(merge_or(signals))
}

// Frames are consecutive chunks of FAN_IN inputs. Every frame races its direct
// inputs, the output of the frame after it, and the output of the frame before
// it, so a resolved parent releases the rest of the chain.
fn fan_in(signals: Vec<Signal>) -> Signal {
    let mut frames: Vec<Vec<Signal>> = signals.chunks(FAN_IN).map(<[Signal]>::to_vec).collect();
    // a lone trailing input is raced directly by the frame before it
    let tail = if frames.last().is_some_and(|last| last.len() == 1) { frames.pop().and_then(|mut last| last.pop()) } else { None };

    let triggers: Vec<Trigger> = frames.iter().map(|_| Trigger::new()).collect();
    let outputs: Vec<Signal> = triggers.iter().map(Trigger::signal).collect();
    let root = match outputs.first() {
        Some(root) => root.clone(),
        None => return tail.unwrap_or_else(Signal::closed),
    };

    for (depth, (direct, trigger)) in frames.into_iter().zip(triggers).enumerate() {
        let rest = outputs.get(depth + 1).cloned().or_else(|| tail.clone());
        let parent = depth.checked_sub(1).and_then(|up| outputs.get(up)).cloned();
        spawn_frame(direct, rest, parent, trigger);
    }

    root
}

fn spawn_frame(direct: Vec<Signal>, rest: Option<Signal>, parent: Option<Signal>, trigger: Trigger) {
    let mut direct = direct.into_iter();
    let (a, b, c) = (direct.next(), direct.next(), direct.next());
    let id = trigger.id();
    let width = [&a, &b, &c, &rest].iter().filter(|slot| slot.is_some()).count();
    debug!(output = %id, width, chained = parent.is_some(), "spawning fan-in task");

    task::spawn(async move {
        tokio::select! {
            _ = wait_slot(a.as_ref()) => {}
            _ = wait_slot(b.as_ref()) => {}
            _ = wait_slot(c.as_ref()) => {}
            _ = wait_slot(rest.as_ref()) => {}
            _ = wait_slot(parent.as_ref()) => {
                trace!(output = %id, "fan-in released by parent");
            }
        }
        trace!(output = %id, "fan-in resolved");
        trigger.close();
    });
}

async fn wait_slot(slot: Option<&Signal>) {
    match slot {
        Some(signal) => signal.wait().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn never(n: usize) -> Vec<Signal> { (0..n).map(|_| Signal::never()).collect() }

    #[test]
    fn test_trivial_cases_need_no_runtime() {
        assert!(merge_or(Vec::<Signal>::new()).is_closed());

        let single = Signal::never();
        assert!(Signal::ptr_eq(&merge_or([single.clone()]), &single));

        assert!(try_merge_or(Vec::<Signal>::new()).is_ok());
        assert!(try_merge_or([single]).is_ok());
    }

    #[test]
    fn test_try_merge_or_without_runtime() {
        assert_eq!(try_merge_or(never(2)).unwrap_err(), Error::NoRuntime);
        assert_eq!(try_merge_or(never(7)).unwrap_err(), Error::NoRuntime);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_frames_do_not_close_early() {
        // counts where the deepest frame has no remainder to race against
        for n in [3, 6, 9, 12] {
            let merged = merge_or(never(n));
            tokio::time::sleep(Duration::from_secs(60)).await;
            assert!(!merged.is_closed(), "{n} never-closing inputs closed the output");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_position_can_win() {
        for n in 2..=14 {
            for winner in 0..n {
                let triggers: Vec<Trigger> = (0..n).map(|_| Trigger::new()).collect();
                let merged = merge_or(triggers.iter().map(Trigger::signal));

                tokio::time::sleep(Duration::from_millis(1)).await;
                assert!(!merged.is_closed());

                triggers[winner].close();
                tokio::time::timeout(Duration::from_secs(1), merged.wait())
                    .await
                    .unwrap_or_else(|_| panic!("input {winner} of {n} did not close the output"));
            }
        }
    }

    #[tokio::test]
    async fn test_try_merge_or_inside_runtime() {
        let trigger = Trigger::new();
        let merged = try_merge_or([trigger.signal(), Signal::never()]).unwrap();
        trigger.close();
        merged.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolved_fan_in_releases_its_tasks() {
        let metrics = tokio::runtime::Handle::current().metrics();
        for n in [5, 7, 50] {
            let before = metrics.num_alive_tasks();
            let winner = Trigger::new();
            let mut inputs = vec![winner.signal()];
            inputs.extend(never(n - 1));
            let merged = merge_or(inputs);

            tokio::time::sleep(Duration::from_millis(1)).await;
            assert!(metrics.num_alive_tasks() > before + 1, "{n} inputs spawned a single task");

            winner.close();
            merged.wait().await;
            tokio::time::sleep(Duration::from_secs(60)).await;
            assert_eq!(metrics.num_alive_tasks(), before, "fan-in tasks for {n} inputs still parked after the output closed");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deep_winner_releases_whole_chain() {
        let metrics = tokio::runtime::Handle::current().metrics();
        let before = metrics.num_alive_tasks();
        let triggers: Vec<Trigger> = (0..20).map(|_| Trigger::new()).collect();
        let merged = merge_or(triggers.iter().map(Trigger::signal));
        tokio::time::sleep(Duration::from_millis(1)).await;

        // a winner in the middle frame must also release the frames after it
        triggers[10].close();
        merged.wait().await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(metrics.num_alive_tasks(), before);
    }
}
