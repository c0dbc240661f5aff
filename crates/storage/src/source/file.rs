use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{QuestionSource, SourceError};

/// Question bank stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { name, path }
    }

    /// Source for `file_name` inside `dir`, named after the file.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            name: file_name.to_string(),
            path: dir.as_ref().join(file_name),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = FileSource::in_dir(std::env::temp_dir(), "quiz-does-not-exist-4821.json");
        assert_eq!(source.name(), "quiz-does-not-exist-4821.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[tokio::test]
    async fn reads_file_contents() {
        let path = std::env::temp_dir().join(format!("quiz-file-source-{}.json", std::process::id()));
        tokio::fs::write(&path, "[]").await.unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().await.unwrap(), "[]");

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
