use super::models::FileSystem;
use anyhow::{Context, Result};
use bytes::Bytes;
use picbed_models::ImageRecord;
use picbed_utils::normalize_path;
use std::path::{Path, PathBuf};
use tokio::fs;

impl FileSystem {
    /// Reads a local image into a pending record named after the file.
    pub async fn read_image<P: AsRef<Path>>(path: P) -> Result<ImageRecord> {
        let path = path.as_ref();
        let abs_path = Self::get_absolute_path(path)?;

        let file_name = abs_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid image path: {}", abs_path.display()))?
            .to_string();
        let extension = abs_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let data = fs::read(&abs_path)
            .await
            .with_context(|| format!("Failed to read image {}", normalize_path(&abs_path)))?;

        tracing::debug!("    Read: {} ({} bytes)", normalize_path(&abs_path), data.len());

        Ok(ImageRecord::from_bytes(file_name, extension, Bytes::from(data)))
    }

    /// Reads several images, preserving the given order.
    pub async fn read_images<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ImageRecord>> {
        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            records.push(Self::read_image(path).await?);
        }
        Ok(records)
    }

    fn get_absolute_path(path: &Path) -> Result<PathBuf> {
        let abs_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(abs_path)
    }

    pub fn get_absolute_path_string(path: &str) -> Result<String> {
        let path_buf = PathBuf::from(path);
        let abs = Self::get_absolute_path(&path_buf)?;
        Ok(abs.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_image_into_pending_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let record = FileSystem::read_image(&path).await.unwrap();

        assert_eq!(record.file_name, "shot.png");
        assert_eq!(record.extension, ".png");
        assert_eq!(record.payload_bytes().unwrap().unwrap().as_ref(), b"\x89PNG");
        assert!(!record.is_published());
    }

    #[tokio::test]
    async fn keeps_batch_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("b.jpg");
        let second = dir.path().join("a.gif");
        tokio::fs::write(&first, b"1").await.unwrap();
        tokio::fs::write(&second, b"2").await.unwrap();

        let records = FileSystem::read_images(&[first, second]).await.unwrap();

        let names: Vec<_> = records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, ["b.jpg", "a.gif"]);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileSystem::read_image(dir.path().join("nope.png")).await.is_err());
    }
}
