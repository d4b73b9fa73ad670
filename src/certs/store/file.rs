//! Filesystem-backed record store.
//!
//! Records live at `{root}/{namespace}/{name}.yaml` in the same YAML layout used
//! for dry-run output. Writes go to a temporary file first so readers never see
//! partial content.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, warn};

use super::RecordStore;
use crate::certs::error::StoreError;
use crate::certs::record::{Record, RecordIdentifier};
use crate::certs::render::{parse_rendered_record, render_record, RenderError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FileRecordStore {
    root: PathBuf,
}

impl FileRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document backing `identifier`.
    pub fn record_path(&self, identifier: &RecordIdentifier) -> Result<PathBuf, StoreError> {
        validate_component(&identifier.namespace)?;
        validate_component(&identifier.name)?;

        Ok(self.root.join(&identifier.namespace).join(format!("{}.yaml", identifier.name)))
    }

    async fn write_temp(&self, record: &Record) -> Result<(PathBuf, PathBuf), StoreError> {
        let path = self.record_path(&record.identifier)?;
        let contents = render_record(record).map_err(|source| StoreError::Encode {
            identifier: record.identifier.clone(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension(format!(
            "yaml.tmp-{}-{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, contents).await?;

        Ok((tmp, path))
    }
}

fn validate_component(component: &str) -> Result<(), StoreError> {
    if component.is_empty()
        || component == "."
        || component == ".."
        || component.contains(['/', '\\'])
    {
        return Err(StoreError::backend(format!(
            "'{}' cannot be used as a record path component",
            component
        )));
    }
    Ok(())
}

/// Best-effort cleanup; the outcome of the surrounding operation does not depend on it.
async fn remove_temp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp).await {
        warn!(path = %tmp.display(), error = %e, "Failed to remove temporary record file");
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn get(&self, identifier: &RecordIdentifier) -> Result<Record, StoreError> {
        let path = self.record_path(identifier)?;

        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::not_found(identifier))
            }
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), "Read record file");

        let corrupt =
            |source: RenderError| StoreError::Corrupt { identifier: identifier.clone(), source };
        let record = parse_rendered_record(&contents).map_err(corrupt)?;

        // A file moved or edited by hand must not serve another record's material.
        if record.identifier != *identifier {
            return Err(corrupt(RenderError::UnexpectedIdentifier {
                expected: identifier.clone(),
                found: record.identifier,
            }));
        }
        Ok(record)
    }

    async fn create(&self, record: &Record) -> Result<(), StoreError> {
        let (tmp, path) = self.write_temp(record).await?;

        // hard_link refuses to replace an existing file, which makes the create atomic.
        let linked = fs::hard_link(&tmp, &path).await;
        remove_temp(&tmp).await;

        match linked {
            Ok(()) => {
                info!(path = %path.display(), "Created record file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::already_exists(&record.identifier))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, record: &Record) -> Result<(), StoreError> {
        let path = self.record_path(&record.identifier)?;
        if !fs::try_exists(&path).await? {
            return Err(StoreError::not_found(&record.identifier));
        }

        let (tmp, path) = self.write_temp(record).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            remove_temp(&tmp).await;
            return Err(e.into());
        }

        info!(path = %path.display(), "Updated record file");
        Ok(())
    }
}
