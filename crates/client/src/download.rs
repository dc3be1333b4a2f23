use std::path::{Path, PathBuf};

use twin_core::artifact::DownloadFile;

/// Writes downloads into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the file and return its full path. An existing file with the
    /// same name is overwritten.
    pub async fn save(&self, file: &DownloadFile) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&file.filename);
        tokio::fs::write(&path, &file.bytes).await?;
        tracing::info!(path = %path.display(), bytes = file.bytes.len(), "Model saved");
        Ok(path)
    }
}
