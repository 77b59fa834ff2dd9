//! Loading OpenAPI documents from disk or over HTTP
//!
//! Remote documents go through [`SpecCache`], a directory of response bodies
//! keyed by a hash of the URL. A fresh entry is served without touching the
//! network; when a refresh fails, a stale entry is served instead.

use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, span, warn, Level};

use crate::config::SourceConfig;
use crate::core::{SchemaError, SchemaResult};

const CACHE_EXTENSION: &str = "json";

/// Where a specification document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    File(PathBuf),
    Url(String),
}

impl SpecSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, SpecSource::Url(_))
    }

    /// Load and parse the document, going through `cache` for URLs
    pub fn load(&self, cache: &SpecCache) -> SchemaResult<Value> {
        let load_span = span!(Level::INFO, "load_spec", source = %self);
        let _enter = load_span.enter();

        match self {
            SpecSource::File(path) => load_file(path),
            SpecSource::Url(url) => {
                let body = cache.fetch(url)?;
                parse_document(&body, DocumentSyntax::from_path(url))
            }
        }
    }
}

impl FromStr for SpecSource {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::document_parse("empty specification source"));
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(SpecSource::Url(trimmed.to_string()))
        } else {
            Ok(SpecSource::File(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecSource::File(path) => write!(f, "{}", path.display()),
            SpecSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Surface syntax of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSyntax {
    Json,
    Yaml,
}

impl DocumentSyntax {
    /// Guess from a file name or URL suffix, defaulting to JSON
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        let lower = lower.split(['?', '#']).next().unwrap_or_default();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            DocumentSyntax::Yaml
        } else {
            DocumentSyntax::Json
        }
    }
}

/// Parse document text into a JSON value
pub fn parse_document(text: &str, syntax: DocumentSyntax) -> SchemaResult<Value> {
    match syntax {
        DocumentSyntax::Json => serde_json::from_str(text)
            .map_err(|e| SchemaError::document_parse(format!("invalid JSON: {}", e))),
        DocumentSyntax::Yaml => serde_yaml::from_str(text)
            .map_err(|e| SchemaError::document_parse(format!("invalid YAML: {}", e))),
    }
}

/// Read and parse a local document
pub fn load_file(path: &Path) -> SchemaResult<Value> {
    let text = fs::read_to_string(path)?;
    debug!(bytes = text.len(), "Read specification file");
    parse_document(&text, DocumentSyntax::from_path(&path.to_string_lossy()))
}

/// On-disk cache of fetched documents
#[derive(Debug, Clone)]
pub struct SpecCache {
    dir: PathBuf,
    ttl: Duration,
    timeout: Duration,
}

impl SpecCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            timeout: Duration::from_secs(crate::config::DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(&config.cache_dir, config.cache_ttl).with_timeout(config.http_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file for a URL
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir
            .join(format!("{:016x}.{}", url_hash(url), CACHE_EXTENSION))
    }

    /// Return the body for `url`, from cache when fresh
    pub fn fetch(&self, url: &str) -> SchemaResult<String> {
        let path = self.path_for(url);
        let cached_age = age_of(&path);

        if let Some(age) = cached_age {
            if age < self.ttl {
                debug!(path = %path.display(), age_secs = age.as_secs(), "Cache hit");
                return Ok(fs::read_to_string(&path)?);
            }
            debug!(path = %path.display(), age_secs = age.as_secs(), "Cache entry is stale");
        } else {
            debug!(path = %path.display(), "Cache miss");
        }

        match self.download(url) {
            Ok(body) => {
                fs::create_dir_all(&self.dir)?;
                fs::write(&path, &body)?;
                info!(bytes = body.len(), "Fetched specification");
                Ok(body)
            }
            Err(err) if cached_age.is_some() => {
                warn!(error = %err, "Fetch failed; serving stale cache entry");
                Ok(fs::read_to_string(&path)?)
            }
            Err(err) => Err(err),
        }
    }

    /// Remove every cached document, returning how many were deleted
    pub fn clear(&self) -> SchemaResult<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(CACHE_EXTENSION) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        info!(removed, "Cleared specification cache");
        Ok(removed)
    }

    fn download(&self, url: &str) -> SchemaResult<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| SchemaError::fetch(url, e.to_string()))?;

        client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| SchemaError::fetch(url, e.to_string()))
    }
}

fn age_of(path: &Path) -> Option<Duration> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    )
}

/// FNV-1a; stable across releases, unlike `DefaultHasher`
fn url_hash(url: &str) -> u64 {
    url.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
