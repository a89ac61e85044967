//! Record identifiers.

use chrono::Utc;
use uuid::Uuid;

use shhttp_protocols::{validate_id, Job, Result};

/// Generate a fresh identifier: `<unix-nanos>-<uuid-v4>`.
///
/// The timestamp prefix makes ids roughly sortable by creation time; the
/// random suffix makes collisions impractical without a shared counter.
pub fn generate_id() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}", nanos, Uuid::new_v4())
}

/// Ensure `job` carries an identifier, keeping a caller-supplied one.
///
/// Caller ids are used verbatim once they pass [`validate_id`].
pub fn assign_id(job: &mut Job) -> Result<String> {
    match job.id.as_deref() {
        Some(id) if !id.is_empty() => {
            validate_id(id)?;
            Ok(id.to_string())
        }
        _ => {
            let id = generate_id();
            job.id = Some(id.clone());
            Ok(id)
        }
    }
}
