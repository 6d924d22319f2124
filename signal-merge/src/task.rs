use std::future::Future;

use crate::error::Error;

#[cfg(not(target_arch = "wasm32"))]
/// Spawn a fan-in task onto the ambient tokio runtime
pub fn spawn<F>(future: F)
where F: Future<Output = ()> + Send + 'static {
    tokio::spawn(future);
}

#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F)
where F: Future<Output = ()> + Send + 'static {
    wasm_bindgen_futures::spawn_local(future);
}

/// Check that [`spawn`] can be called from here without panicking
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_runtime() -> Result<(), Error> {
    tokio::runtime::Handle::try_current().map(|_| ()).map_err(|_| Error::NoRuntime)
}

#[cfg(target_arch = "wasm32")]
pub fn ensure_runtime() -> Result<(), Error> { Ok(()) }
