//! # shhttp Runner
//!
//! Runs a single [`Executable`](shhttp_protocols::Executable) to completion
//! and captures its output as an [`ExecResult`](shhttp_protocols::ExecResult).
//!
//! There is no timeout and no cancellation: a call returns only once the
//! child process has terminated.

mod runner;

pub use runner::{CommandRunner, ProcessRunner};
