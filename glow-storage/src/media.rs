//! Uploaded image files on the local filesystem.
use glow_error::{storage::StorageError, StorageResult};
use glow_models::{constants::MEDIA_FILE_NAME_LEN, settings::Storage};
use glow_utils::slug::random_token;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File part received from a multipart request
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    /// Client supplied file name
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase extension taken from the file name, falling back to the
    /// content type subtype.
    pub fn extension(&self) -> Option<String> {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        from_name
            .or_else(|| {
                self.content_type
                    .as_deref()
                    .and_then(|ct| ct.split_once('/'))
                    .map(|(_, sub)| sub.split(['+', ';']).next().unwrap_or(sub).to_string())
            })
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
    }
}

/// Stores uploaded files under `<root>/<namespace>/` and hands back their
/// public URL `<url_prefix>/<namespace>/<file>`.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
    max_bytes: usize,
}

impl MediaStore {
    pub fn new(settings: &Storage) -> Self {
        Self {
            root: settings.public_root_path(),
            url_prefix: settings.url_prefix.trim_end_matches('/').to_string(),
            max_bytes: settings.max_upload_bytes,
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    #[inline]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Writes `file` under `namespace` with a random name and returns its URL.
    pub async fn store(&self, namespace: &str, file: &UploadedFile) -> StorageResult<String> {
        let dir = self.root.join(namespace);
        tokio::fs::create_dir_all(&dir).await?;

        let mut name = random_token(MEDIA_FILE_NAME_LEN);
        if let Some(ext) = file.extension() {
            name.push('.');
            name.push_str(&ext);
        }
        tokio::fs::write(dir.join(&name), &file.bytes).await?;
        debug!(namespace, file = %name, size = file.len(), "Media stored");

        Ok(format!("{}/{}/{}", self.url_prefix, namespace, name))
    }

    /// Removes a file previously returned by [`MediaStore::store`]. URLs that
    /// do not point into this store are ignored.
    pub async fn remove(&self, url: &str) -> StorageResult<()> {
        let Some(path) = self.resolve(url) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Media(e)),
        }
    }

    /// Best-effort removal used when the record referencing `url` was not written.
    pub async fn discard(&self, url: &str) {
        if let Err(e) = self.remove(url).await {
            warn!(url, error = %e, "Failed to discard stored media");
        }
    }

    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(&self.url_prefix)?.strip_prefix('/')?;
        let mut parts = relative.split('/');
        let (namespace, file) = (parts.next()?, parts.next()?);
        let safe = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') && s != ".."
        };
        if parts.next().is_some() || !safe(namespace) || !safe(file) || namespace.contains('.') {
            return None;
        }
        Some(self.root.join(namespace).join(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(root: &Path) -> MediaStore {
        MediaStore {
            root: root.to_path_buf(),
            url_prefix: "/storage".into(),
            max_bytes: 1024,
        }
    }

    fn png() -> UploadedFile {
        UploadedFile {
            file_name: Some("Photo.PNG".into()),
            content_type: Some("image/png".into()),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(png().extension().as_deref(), Some("png"));

        let file = UploadedFile {
            file_name: None,
            content_type: Some("image/svg+xml".into()),
            bytes: vec![],
        };
        assert_eq!(file.extension().as_deref(), Some("svg"));
        assert!(file.is_image());

        let file = UploadedFile {
            file_name: Some("notes".into()),
            content_type: Some("text/plain".into()),
            bytes: vec![],
        };
        assert_eq!(file.extension().as_deref(), Some("plain"));
        assert!(!file.is_image());
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let media = store(dir.path());

        let url = media.store("products", &png()).await.unwrap();
        let name = url.strip_prefix("/storage/products/").unwrap();
        assert_eq!(name.len(), MEDIA_FILE_NAME_LEN + ".png".len());

        let path = dir.path().join("products").join(name);
        assert_eq!(std::fs::read(&path).unwrap(), png().bytes);

        media.remove(&url).await.unwrap();
        assert!(!path.exists());
        // Removing twice is fine
        media.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_ignores_foreign_urls() {
        let dir = tempfile::tempdir().unwrap();
        let media = store(dir.path());
        let outside = dir.path().join("keep.txt");
        std::fs::write(&outside, b"keep").unwrap();

        media.remove("https://images.unsplash.com/photo-1").await.unwrap();
        media.remove("/storage/../keep.txt").await.unwrap();
        media.remove("/storage/products/../../keep.txt").await.unwrap();
        assert!(outside.exists());
    }
}
