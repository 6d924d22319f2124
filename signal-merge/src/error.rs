use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no async runtime available to spawn the fan-in task")]
    NoRuntime,
}
