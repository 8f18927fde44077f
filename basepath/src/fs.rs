use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use crate::config::BasepathConfig;
use crate::errors::{FsError, Result};
use crate::path::Basepath;

/// File access confined to a root directory through the lexical [`Basepath`] guard.
#[derive(Clone, Debug)]
pub struct SandboxedFs {
    root: PathBuf,
    guard: Basepath,
    max_file_size: u64,
}

impl SandboxedFs {
    pub fn new(root: impl AsRef<Path>, config: &BasepathConfig) -> Result<Self> {
        let root = root.as_ref();
        if root.is_relative() {
            return Err(FsError::InvalidOperation(
                "sandbox root must be absolute".to_string(),
            ));
        }
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            guard: Basepath::new(config.separators),
            max_file_size: config.max_file_size,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        Ok(self.guard.concat(&self.root, relative)?)
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn read(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative)?;
        let size = fs::metadata(&path)?.len();
        self.check_size(size)?;
        Ok(fs::read(path)?)
    }

    #[instrument(skip(self, bytes), fields(root = %self.root.display(), size = bytes.as_ref().len()))]
    pub fn write(&self, relative: &str, bytes: impl AsRef<[u8]>) -> Result<()> {
        let path = self.resolve(relative)?;
        let data = bytes.as_ref();
        self.check_size(data.len() as u64)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn mkdir(&self, relative: &str) -> Result<()> {
        fs::create_dir_all(self.resolve(relative)?)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, relative: &str) -> Result<()> {
        let path = self.resolve(relative)?;
        if self.guard.depth(relative) == Some(0) {
            return Err(FsError::InvalidOperation(format!(
                "refusing to delete sandbox root via '{relative}'"
            )));
        }
        if path.is_dir() {
            fs::remove_dir_all(path)?;
        } else if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn list(&self, relative: &str) -> Result<Vec<FileEntry>> {
        let mut entries = fs::read_dir(self.resolve(relative)?)?
            .map(|entry| -> Result<FileEntry> {
                let entry = entry?;
                let metadata = entry.metadata()?;
                let name = entry.file_name().into_string().map_err(|raw| {
                    FsError::InvalidOperation(format!("non-utf8 file name {raw:?}"))
                })?;
                Ok(FileEntry {
                    name,
                    is_dir: metadata.is_dir(),
                    size: metadata.len(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_file_size {
            return Err(FsError::FileTooLarge(size));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}
