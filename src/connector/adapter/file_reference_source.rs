use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ReferenceSource;
use crate::domain::DomainError;

/// Reads the reference document from a UTF-8 text file on disk.
pub struct FileReferenceSource {
    path: PathBuf,
}

impl FileReferenceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReferenceSource for FileReferenceSource {
    async fn load(&self) -> Result<String, DomainError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::resource_unavailable(format!(
                "cannot read {}: {}",
                self.path.display(),
                e
            ))
        })?;
        debug!("Read {} bytes from {}", content.len(), self.path.display());
        Ok(content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn loads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Chapter 1\nChapter 2\n").unwrap();

        let source = FileReferenceSource::new(file.path());
        let content = source.load().await.unwrap();

        assert_eq!(content, "Chapter 1\nChapter 2\n");
    }

    #[tokio::test]
    async fn missing_file_is_resource_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileReferenceSource::new(dir.path().join("missing.txt"));

        let err = source.load().await.unwrap_err();
        assert!(matches!(err, DomainError::ResourceUnavailable(_)));
        assert!(err.to_string().contains("missing.txt"));
    }
}
