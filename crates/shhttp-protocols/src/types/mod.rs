//! Core record types.

mod executable;
mod id;
mod job;
mod status;

pub use executable::{ExecResult, Executable};
pub use id::validate_id;
pub use job::Job;
pub use status::Status;

/// Deserialize an explicit `null` as the type's default.
///
/// Go encoders write nil slices and maps as `null`; use with
/// `#[serde(default, deserialize_with = "null_as_default")]`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Current wall-clock time in seconds since the Unix epoch.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
