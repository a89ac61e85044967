//! # shhttp API
//!
//! HTTP front end for the job engine.
//!
//! ```text
//! POST   /v1/exec            run one command and wait for it
//! POST   /v1/jobs            submit a job (?queued=true for the serial queue)
//! GET    /v1/jobs            list job ids
//! GET    /v1/jobs/{id}       fetch a job
//! DELETE /v1/jobs/{id}       delete a job record
//! GET    /v1/saved           list template ids
//! PUT    /v1/saved           store a template
//! GET    /v1/saved/{id}      fetch a template
//! POST   /v1/saved/{id}      run a template (optional {"Env": {...}} body)
//! DELETE /v1/saved/{id}      delete a template
//! GET    /health             liveness
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::ApiServer;
pub use state::AppState;
