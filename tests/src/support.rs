use std::path::Path;

use anyhow::Result;
use basepath::{BasepathConfig, SandboxedFs, Separators};
use tempfile::{tempdir, TempDir};

pub fn temp_workspace() -> Result<TempDir> {
    Ok(tempdir()?)
}

pub fn sandboxed_fs(root: &Path, max_file_size: u64) -> Result<SandboxedFs> {
    let config = BasepathConfig {
        separators: Separators::native(),
        max_file_size,
    };
    Ok(SandboxedFs::new(root, &config)?)
}
