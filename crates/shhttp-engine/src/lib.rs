//! # shhttp Engine
//!
//! Drives persisted jobs through the process runner.
//!
//! - [`JobExecutor`] runs one job's executions in order, checkpointing
//!   after every step.
//! - [`Dispatcher`] accepts submissions either immediately (one task per
//!   job) or through a single serial queue worker.
//! - [`Reviver`] reconciles jobs left non-terminal by a previous run.
//! - [`Cleaner`] periodically prunes records that are not in progress.
//! - [`JobService`] bundles the above behind the operations the HTTP layer
//!   calls.

mod cleaner;
mod dispatcher;
mod executor;
mod reviver;
mod service;

#[cfg(test)]
mod testing;

pub use cleaner::Cleaner;
pub use dispatcher::Dispatcher;
pub use executor::JobExecutor;
pub use reviver::{RevivalReport, Reviver};
pub use service::{JobService, Namespace};
