//! File-backed job store: one JSON document per record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use shhttp_protocols::{validate_id, Job, JobError, Result};

use crate::id::assign_id;
use crate::store::{require_id, JobStore};

/// Stores each record as `<root>/<id>`.
///
/// Writes go to a hidden temporary file that is renamed over the record, so
/// readers never observe a half-written document. Hidden entries are not
/// records and are ignored by [`JobStore::list_ids`].
#[derive(Debug, Clone)]
pub struct FileJobStore {
    root: PathBuf,
}

impl FileJobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// This is the only place the directory is created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            JobError::Store(format!(
                "Failed to create store directory {}: {}",
                root.display(),
                e
            ))
        })?;

        debug!("FileJobStore opened at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `id`. Unsafe ids can never name a record.
    fn record_path(&self, id: &str) -> Result<PathBuf> {
        validate_id(id).map_err(|_| JobError::NotFound(id.to_string()))?;
        Ok(self.root.join(id))
    }

    async fn write_record(&self, id: &str, job: &Job) -> Result<()> {
        let path = self.root.join(id);
        let content = serde_json::to_string_pretty(job)
            .map_err(|e| JobError::Store(format!("Failed to serialize job {}: {}", id, e)))?;

        let tmp_path = self.root.join(format!(".{}.{}.tmp", id, Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&tmp_path, content).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(JobError::Store(format!(
                "Failed to write {}: {}",
                tmp_path.display(),
                e
            )));
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(JobError::Store(format!(
                "Failed to rename {} to {}: {}",
                tmp_path.display(),
                path.display(),
                e
            )));
        }

        debug!(job_id = %id, "Wrote record to {:?}", path);
        Ok(())
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn save_new_job(&self, job: &mut Job) -> Result<String> {
        let id = assign_id(job)?;
        self.write_record(&id, job).await?;
        Ok(id)
    }

    async fn update_job(&self, job: &Job) -> Result<()> {
        let id = require_id(job)?;
        let path = self.record_path(id)?;

        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| JobError::Store(format!("Failed to stat {}: {}", path.display(), e)))?;
        if !exists {
            return Err(JobError::NotFound(id.to_string()));
        }

        self.write_record(id, job).await
    }

    async fn get_job(&self, id: &str) -> Result<Job> {
        let path = self.record_path(id)?;

        let content = fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => JobError::NotFound(id.to_string()),
            _ => JobError::Store(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        serde_json::from_str(&content)
            .map_err(|e| JobError::Store(format!("Failed to decode record {}: {}", id, e)))
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.root).await.map_err(|e| {
            JobError::Store(format!("Failed to read {}: {}", self.root.display(), e))
        })?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| JobError::Store(format!("Failed to read directory entry: {}", e)))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            match entry.file_type().await {
                Ok(kind) if kind.is_file() => ids.push(name),
                _ => {}
            }
        }

        Ok(ids)
    }

    async fn delete_job(&self, id: &str) -> Result<()> {
        let path = self.record_path(id)?;

        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => JobError::NotFound(id.to_string()),
            _ => JobError::Store(format!("Failed to delete {}: {}", path.display(), e)),
        })?;

        debug!(job_id = %id, "Deleted record");
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
