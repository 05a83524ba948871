/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::io;
use std::path::{Path, PathBuf};

/// A file that lives as long as the value: the content is written on
/// create and the file is removed when the value drops, so an early error
/// return in the caller still cleans it up.
pub(crate) struct ScopedTempFile {
    path: PathBuf,
}

impl ScopedTempFile {
    pub(crate) async fn create(dir: &Path, content: &[u8]) -> io::Result<Self> {
        let name = format!("imgwd-{:016x}.tmp", fastrand::u64(..));
        let path = dir.join(name);
        tokio::fs::write(&path, content).await?;
        Ok(ScopedTempFile { path })
    }

    #[inline]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedTempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
