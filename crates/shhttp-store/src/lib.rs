//! # shhttp Store
//!
//! Keyed persistence for job records. The same [`JobStore`] interface backs
//! both the live-job namespace and the saved-template namespace; each is a
//! separate instance rooted at its own location.

mod file;
mod id;
mod store;

pub use file::FileJobStore;
pub use id::{assign_id, generate_id};
pub use store::{JobStore, MemoryJobStore};
