//! Resolution of `file` and `image` entry references into prompt text.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use tokio::io::AsyncReadExt;

use podium_config::ContentConfig;
use podium_core::enums::EntryKind;

use crate::error::ContentError;

/// Turns an entry's stored reference into text the scoring engine can read.
pub trait ContentStore: Send + Sync {
    fn resolve(
        &self,
        kind: EntryKind,
        reference: &str,
    ) -> impl Future<Output = Result<String, ContentError>> + Send;
}

/// Content store backed by a directory on the local filesystem.
///
/// Text files are read up to `max_bytes` (lossy UTF-8). Images are not
/// decoded; they resolve to a one-line description of the file.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
    max_bytes: u64,
}

impl FsContentStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    #[must_use]
    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(config.root_path(), config.max_file_bytes)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `reference` onto the root, refusing anything that could escape it.
    fn locate(&self, reference: &str) -> Result<PathBuf, ContentError> {
        let relative = Path::new(reference.trim());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if relative.as_os_str().is_empty() || escapes {
            return Err(ContentError::Rejected(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }

    async fn read_text(&self, path: &Path, reference: &str) -> Result<String, ContentError> {
        let file = open(path, reference).await?;
        let size = file.metadata().await?.len();

        let mut buf = Vec::new();
        file.take(self.max_bytes).read_to_end(&mut buf).await?;
        let mut text = String::from_utf8_lossy(&buf).into_owned();
        if size > self.max_bytes {
            tracing::debug!(reference, size, limit = self.max_bytes, "file truncated");
            text.push_str("\n[truncated]");
        }
        Ok(text)
    }

    async fn describe_image(&self, path: &Path, reference: &str) -> Result<String, ContentError> {
        let file = open(path, reference).await?;
        let size = file.metadata().await?.len();
        let name = path
            .file_name()
            .map_or_else(|| reference.to_string(), |n| n.to_string_lossy().into_owned());
        Ok(format!("[image '{name}', {size} bytes]"))
    }
}

async fn open(path: &Path, reference: &str) -> Result<tokio::fs::File, ContentError> {
    match tokio::fs::File::open(path).await {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ContentError::NotFound(reference.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

impl ContentStore for FsContentStore {
    async fn resolve(&self, kind: EntryKind, reference: &str) -> Result<String, ContentError> {
        let path = self.locate(reference)?;
        match kind {
            EntryKind::Image => self.describe_image(&path, reference).await,
            EntryKind::File => self.read_text(&path, reference).await,
            // Inline kinds never reach the store, but resolving them is harmless.
            EntryKind::Text | EntryKind::Link => Ok(reference.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn store_with(files: &[(&str, &str)], max_bytes: u64) -> (tempfile::TempDir, FsContentStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, body).unwrap();
        }
        let store = FsContentStore::new(dir.path(), max_bytes);
        (dir, store)
    }

    #[tokio::test]
    async fn reads_text_file() {
        let (_dir, store) = store_with(&[("team/pitch.md", "# Pitch\nWe fix queues.")], 1024);
        let text = store.resolve(EntryKind::File, "team/pitch.md").await.unwrap();
        assert_eq!(text, "# Pitch\nWe fix queues.");
    }

    #[tokio::test]
    async fn truncates_large_files() {
        let (_dir, store) = store_with(&[("big.txt", "abcdefghij")], 4);
        let text = store.resolve(EntryKind::File, "big.txt").await.unwrap();
        assert_eq!(text, "abcd\n[truncated]");
    }

    #[tokio::test]
    async fn describes_images() {
        let (_dir, store) = store_with(&[("shot.png", "0123456789abcdef")], 1024);
        let text = store.resolve(EntryKind::Image, "shot.png").await.unwrap();
        assert_eq!(text, "[image 'shot.png', 16 bytes]");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_dir, store) = store_with(&[], 1024);
        let err = store.resolve(EntryKind::File, "nope.txt").await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[rstest]
    #[case("../secret.txt")]
    #[case("/etc/passwd")]
    #[case("a/../../b")]
    #[case("   ")]
    #[tokio::test]
    async fn rejects_escaping_references(#[case] reference: &str) {
        let (_dir, store) = store_with(&[], 1024);
        let err = store.resolve(EntryKind::File, reference).await.unwrap_err();
        assert!(matches!(err, ContentError::Rejected(_)), "{reference}: {err}");
    }
}
