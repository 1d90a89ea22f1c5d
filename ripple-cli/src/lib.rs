//! Support library for the ripple CLI binary.
//!
//! Exposes the command and logging modules so doctests and integration tests
//! can drive a simulation without forking a subprocess.

pub mod cli;
pub mod logging;
