//! # shhttp Protocols
//!
//! Data model shared by every shhttp crate.
//!
//! - [`Executable`] - a single command specification
//! - [`ExecResult`] - the captured outcome of running one executable
//! - [`Job`] - an ordered list of executions plus its lifecycle [`Status`]
//! - [`JobError`] - the error taxonomy used by stores, the engine and the API
//!
//! Records serialize with PascalCase field names (`Id`, `Executions`,
//! `ExitCode`, ...). The same JSON is used on disk and over HTTP.

pub mod error;
pub mod types;

pub use error::{JobError, Result};
pub use types::*;
