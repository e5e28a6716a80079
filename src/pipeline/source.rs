//! Where menu photos come from, and the scoped temp storage they land in.
//!
//! A [`StagedImage`] owns a private temp directory. Dropping it removes the
//! directory, so every exit path of a recognition run cleans up after itself.

use std::path::{Component, Path, PathBuf};

use reqwest::Url;
use tempfile::TempDir;

use super::RecognitionError;

/// Storage an image can be fetched from by bucket + object name.
pub trait ImageSource: Send + Sync {
    /// Write the object `bucket/name` to `dest`.
    fn fetch_to(&self, bucket: &str, name: &str, dest: &Path) -> Result<(), RecognitionError>;

    fn name(&self) -> &'static str;
}

/// An image copied into its own temp directory.
#[derive(Debug)]
pub struct StagedImage {
    path: PathBuf,
    // Dropped last; removes the directory and the image in it.
    dir: TempDir,
}

impl StagedImage {
    pub fn stage(
        source: &dyn ImageSource,
        bucket: &str,
        name: &str,
    ) -> Result<Self, RecognitionError> {
        validate_object_name(name)?;
        let file_name = Path::new(name)
            .file_name()
            .ok_or_else(|| RecognitionError::Source(format!("Object name has no file part: {name}")))?;

        let dir = tempfile::Builder::new().prefix("menu-image-").tempdir()?;
        let path = dir.path().join(file_name);
        source.fetch_to(bucket, name, &path)?;

        tracing::debug!(
            source = source.name(),
            bucket,
            object = name,
            path = %path.display(),
            "Image staged"
        );

        Ok(Self { path, dir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self) -> Result<Vec<u8>, RecognitionError> {
        let bytes = std::fs::read(self.path())?;
        tracing::debug!(
            dir = %self.dir().display(),
            bytes = bytes.len(),
            "Staged image read"
        );
        Ok(bytes)
    }
}

fn validate_object_name(name: &str) -> Result<(), RecognitionError> {
    if name.is_empty() {
        return Err(RecognitionError::Source("Empty object name".into()));
    }
    let escapes = Path::new(name)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(RecognitionError::Source(format!(
            "Object name must be a relative path without '..': {name}"
        )));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════
// Local directory
// ═══════════════════════════════════════════════════════════

/// Buckets are subdirectories of `root`.
pub struct LocalFileSource {
    root: PathBuf,
}

impl LocalFileSource {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl ImageSource for LocalFileSource {
    fn fetch_to(&self, bucket: &str, name: &str, dest: &Path) -> Result<(), RecognitionError> {
        validate_object_name(bucket)?;
        validate_object_name(name)?;
        let src = self.root.join(bucket).join(name);
        std::fs::copy(&src, dest).map_err(|e| {
            RecognitionError::Source(format!("Cannot copy {}: {e}", src.display()))
        })?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

// ═══════════════════════════════════════════════════════════
// HTTP object storage
// ═══════════════════════════════════════════════════════════

/// Downloads `{base_url}/{bucket}/{name}`, e.g. a public storage endpoint.
pub struct HttpImageSource {
    base_url: Url,
}

impl HttpImageSource {
    pub fn new(base_url: &str) -> Result<Self, RecognitionError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RecognitionError::Source(format!("Invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RecognitionError::Source(format!(
                "Base URL cannot hold a path: {base_url}"
            )));
        }
        Ok(Self { base_url })
    }

    pub fn object_url(&self, bucket: &str, name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(bucket).extend(name.split('/'));
        }
        url
    }
}

impl ImageSource for HttpImageSource {
    fn fetch_to(&self, bucket: &str, name: &str, dest: &Path) -> Result<(), RecognitionError> {
        let url = self.object_url(bucket, name);

        // Blocking client: this runs on the caller's worker thread, never on the async executor.
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| RecognitionError::Source(format!("HTTP client: {e}")))?;

        let response = client
            .get(url.clone())
            .send()
            .map_err(|e| RecognitionError::Source(format!("GET {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(RecognitionError::Source(format!(
                "GET {url}: HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| RecognitionError::Source(format!("GET {url}: {e}")))?;
        std::fs::write(dest, &bytes)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
