use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

pub const DEFAULT_API_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_OUTPUT: &str = "metadata.json";
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Name suffixes of the files picked up by the walker.
pub const VIDEO_SUFFIXES: [&str; 5] = ["mp4", "mkv", "avi", "wmv", "mov"];

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub library_root: PathBuf,
    pub output_path: PathBuf,
    pub api_key: String,
    pub api_url: String,
    pub timeout: Duration,
    pub thumbnail_size: u32,
    pub extensions: Vec<String>,
}

pub struct ConfigBuilder {
    library_root: Option<PathBuf>,
    output_path: PathBuf,
    api_key: Option<String>,
    api_url: String,
    timeout: Duration,
    thumbnail_size: u32,
    extensions: Vec<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            library_root: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            extensions: VIDEO_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn library_root<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.library_root = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn output_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        // an empty key from the environment counts as missing
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = size;
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<ScanConfig> {
        let library_root = self
            .library_root
            .ok_or_else(|| anyhow::anyhow!("Library directory is required"))?;

        let api_key = self
            .api_key
            .ok_or_else(|| anyhow::anyhow!("Catalog API key is required"))?;

        if self.thumbnail_size == 0 {
            return Err(anyhow::anyhow!("Thumbnail size must be greater than zero"));
        }

        if self.extensions.is_empty() {
            return Err(anyhow::anyhow!("At least one video suffix is required"));
        }

        Ok(ScanConfig {
            library_root,
            output_path: self.output_path,
            api_key,
            api_url: self.api_url,
            timeout: self.timeout,
            thumbnail_size: self.thumbnail_size,
            extensions: self.extensions,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
