// Download adapter - Saves artifacts into a directory without overwriting

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::domain::model::{Artifact, SavedArtifact};
use crate::ports::SavePort;
use crate::utils::path::{is_plain_file_name, numbered_file_name};

/// Saves into a download directory. An existing `clip.gif` is never
/// replaced; the new file becomes `clip (1).gif`, `clip (2).gif`, ...
pub struct FsDownloadAdapter {
    dir: PathBuf,
}

impl FsDownloadAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Write `bytes` to the freshly created `path`; on failure the partial file
/// is removed so nothing truncated is left behind
async fn write_or_remove<W>(path: &Path, mut file: W, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            warn!("Could not remove partial download {}: {}", path.display(), remove_err);
        }
        return Err(e);
    }
    Ok(())
}

#[async_trait]
impl SavePort for FsDownloadAdapter {
    async fn save(&self, artifact: &Artifact) -> std::io::Result<SavedArtifact> {
        if !is_plain_file_name(&artifact.file_name) {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("not a plain file name: {}", artifact.file_name),
            ));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let mut n = 0;
        let (path, file) = loop {
            let file_name = numbered_file_name(&artifact.file_name, n);
            let path = self.dir.join(&file_name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e),
            }
        };

        write_or_remove(&path, file, &artifact.bytes).await?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| artifact.file_name.clone());

        info!(
            "Saved {} ({}, {} bytes)",
            path.display(),
            artifact.mime,
            artifact.bytes.len()
        );

        Ok(SavedArtifact {
            path,
            file_name,
            mime: artifact.mime.to_string(),
            size: artifact.bytes.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::TempDir;

    /// Writer that accepts a few bytes and then reports a full disk
    struct FullDisk {
        accepted: usize,
    }

    impl AsyncWrite for FullDisk {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            if self.accepted >= 4 {
                return Poll::Ready(Err(std::io::Error::new(
                    ErrorKind::Other,
                    "no space left on device",
                )));
            }
            let n = buf.len().min(4 - self.accepted);
            self.accepted += n;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.gif");
        std::fs::write(&path, b"GIF8").unwrap();

        let err = write_or_remove(&path, FullDisk { accepted: 0 }, b"GIF89a-complete")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "no space left on device");
        assert!(!path.exists());
    }

    fn artifact(name: &str, bytes: &[u8]) -> Artifact {
        Artifact {
            bytes: bytes.to_vec(),
            file_name: name.to_string(),
            mime: "image/gif",
        }
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = TempDir::new().unwrap();
        let saver = FsDownloadAdapter::new(dir.path());
        let saved = saver.save(&artifact("clip.gif", b"GIF89a")).await.unwrap();

        assert_eq!(saved.file_name, "clip.gif");
        assert_eq!(saved.mime, "image/gif");
        assert_eq!(saved.size, 6);
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"GIF89a");
    }

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let saver = FsDownloadAdapter::new(dir.path());
        saver.save(&artifact("clip.gif", b"first")).await.unwrap();
        let second = saver.save(&artifact("clip.gif", b"second")).await.unwrap();

        assert_eq!(second.file_name, "clip (1).gif");
        assert_eq!(std::fs::read(dir.path().join("clip.gif")).unwrap(), b"first");
        assert_eq!(std::fs::read(&second.path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("downloads").join("today");
        let saver = FsDownloadAdapter::new(&nested);
        let saved = saver.save(&artifact("a.mp3", b"ID3")).await.unwrap();
        assert!(saved.path.starts_with(&nested));
    }

    #[tokio::test]
    async fn test_save_rejects_paths() {
        let dir = TempDir::new().unwrap();
        let saver = FsDownloadAdapter::new(dir.path());
        let err = saver.save(&artifact("../escape.gif", b"x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
