//! Launch executor: expands variables, hands targets to the shell and
//! reports the outcome to the front end.

mod executor;
mod host;

pub use crate::platform::{LaunchFailure, LaunchRequest};
pub use executor::LaunchExecutor;
pub use host::LaunchHost;
