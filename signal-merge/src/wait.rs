use futures::future::select_all;

use crate::signal::Signal;

/// Wait in the current task until any of `signals` closes.
///
/// Unlike [`crate::merge_or`] this spawns nothing and needs no runtime: every
/// input is registered with a single dynamic-arity select. The result is not a
/// [`Signal`], so it cannot be handed on to other observers. No inputs
/// completes immediately.
pub async fn wait_any<I>(signals: I)
where I: IntoIterator<Item = Signal> {
    let signals: Vec<Signal> = signals.into_iter().collect();
    if signals.is_empty() {
        return;
    }
    select_all(signals.iter().map(|signal| Box::pin(signal.wait()))).await;
}
