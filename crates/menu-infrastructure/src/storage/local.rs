//! Local filesystem storage rooted at the configured media directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};
use uuid::Uuid;

use menu_core::error::DomainError;
use menu_core::ports::FileStorage;

pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn storage_error(context: &str, e: std::io::Error) -> DomainError {
    error!("Storage error {}: {}", context, e);
    DomainError::StorageError(e.to_string())
}

/// `name.ext` becomes `name_<suffix>.ext`.
fn with_suffix(file_name: &str, suffix: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", file_name, suffix),
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, dir: &str, file_name: &str, contents: &[u8]) -> Result<String, DomainError> {
        let target_dir = self.root.join(dir);
        fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| storage_error("creating attachment directory", e))?;

        let mut name = file_name.to_string();
        let mut file = loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(target_dir.join(&name))
                .await
            {
                Ok(file) => break file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    let suffix = Uuid::new_v4().simple().to_string();
                    name = with_suffix(file_name, &suffix[..7]);
                }
                Err(e) => return Err(storage_error("creating attachment file", e)),
            }
        };

        file.write_all(contents)
            .await
            .map_err(|e| storage_error("writing attachment", e))?;
        file.flush()
            .await
            .map_err(|e| storage_error("flushing attachment", e))?;

        let relative = format!("{}/{}", dir.trim_end_matches('/'), name);
        debug!("Stored {} ({} bytes)", relative, contents.len());
        Ok(relative)
    }

    async fn remove(&self, path: &str) -> Result<(), DomainError> {
        match fs::remove_file(self.root.join(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("removing attachment", e)),
        }
    }
}
