//! Image download with an external-open fallback

use crate::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

const USER_AGENT: &str = concat!("Galleria/", env!("CARGO_PKG_VERSION"));
const DEFAULT_EXTENSION: &str = "jpg";

/// Source of image bytes
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// Fetches http(s) URLs with reqwest and everything else from the filesystem
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Init(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            tracing::debug!("GET {}", url);
            let response = self.client.get(url).send().await?.error_for_status()?;
            let bytes = response.bytes().await?;
            return Ok(bytes.to_vec());
        }

        let path = url.strip_prefix("file://").unwrap_or(url);
        Ok(tokio::fs::read(path).await?)
    }
}

/// Hands a URL to whatever the desktop uses to open links
pub trait ExternalOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), AppError>;
}

pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), AppError> {
        open::that(url).map_err(|e| {
            tracing::warn!("open {} failed: {}", url, e);
            AppError::Open(url.to_string())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub file_name: String,
}

impl DownloadRequest {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            url: url.to_string(),
            file_name: file_name_for(title, url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// Fetch failed; the URL was opened externally instead
    FallbackOpened(String),
    Failed(String),
}

/// Title slug plus the URL's extension, e.g. "Old Bridge" -> "old_bridge.jpg"
pub fn file_name_for(title: &str, url: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            stem.extend(c.to_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "image" } else { stem };

    let ext = url_extension(url).unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}.{}", stem, ext)
}

/// Extension of the last path segment. Only the path counts, so a bare
/// host like `https://example.com` has none.
fn url_extension(url: &str) -> Option<String> {
    let path = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative or bare paths
        Err(_) => url.split(['?', '#']).next()?.to_string(),
    };
    let last = path.rsplit('/').next()?;
    let (_, ext) = last.rsplit_once('.')?;
    let valid = !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_string())
}

/// Fetch `request.url` into `dir`. On any fetch or write failure the URL is
/// handed to `opener` so the user can still save it from there.
pub async fn download(
    fetcher: &dyn Fetcher,
    opener: &dyn ExternalOpener,
    request: &DownloadRequest,
    dir: &Path,
) -> DownloadOutcome {
    match save(fetcher, request, dir).await {
        Ok(path) => {
            tracing::info!("Downloaded {} to {}", request.url, path.display());
            DownloadOutcome::Saved(path)
        }
        Err(e) => {
            tracing::warn!("Download of {} failed: {}", request.url, e);
            match opener.open(&request.url) {
                Ok(()) => DownloadOutcome::FallbackOpened(request.url.clone()),
                Err(open_err) => DownloadOutcome::Failed(open_err.to_string()),
            }
        }
    }
}

async fn save(fetcher: &dyn Fetcher, request: &DownloadRequest, dir: &Path) -> Result<PathBuf, AppError> {
    let bytes = fetcher.fetch(&request.url).await?;
    tokio::fs::create_dir_all(dir).await?;

    let path = unique_path(dir, &request.file_name).await?;
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
}

/// `name`, or `stem-N.ext` if that already exists
async fn unique_path(dir: &Path, name: &str) -> Result<PathBuf, AppError> {
    let candidate = dir.join(name);
    if !tokio::fs::try_exists(&candidate).await? {
        return Ok(candidate);
    }

    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, DEFAULT_EXTENSION));
    let mut n = 1;
    loop {
        let candidate = dir.join(format!("{}-{}.{}", stem, n, ext));
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticFetcher(Option<Vec<u8>>);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
            self.0.clone().ok_or_else(|| AppError::Network(format!("refused {}", url)))
        }
    }

    struct CountingOpener {
        calls: AtomicUsize,
        works: bool,
    }

    impl CountingOpener {
        fn new(works: bool) -> Self {
            Self { calls: AtomicUsize::new(0), works }
        }
    }

    impl ExternalOpener for CountingOpener {
        fn open(&self, url: &str) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.works {
                Ok(())
            } else {
                Err(AppError::Open(url.to_string()))
            }
        }
    }

    const URL: &str = "https://picsum.photos/id/22/1200/800";

    #[test]
    fn test_file_name_for() {
        assert_eq!(file_name_for("Old Bridge", URL), "old_bridge.jpg");
        assert_eq!(file_name_for("  Rush-Hour, Tokyo! ", "https://x/y/photo.PNG?w=2"), "rush_hour_tokyo.PNG");
        assert_eq!(file_name_for("???", "https://x/a.b/c"), "image.jpg");
    }

    #[test]
    fn test_file_name_ignores_host() {
        assert_eq!(file_name_for("Old Bridge", "https://example.com"), "old_bridge.jpg");
        assert_eq!(file_name_for("Old Bridge", "https://example.com/"), "old_bridge.jpg");
        assert_eq!(file_name_for("Old Bridge", "https://cdn.example.com?x=1.png"), "old_bridge.jpg");
        assert_eq!(file_name_for("Old Bridge", "https://example.com/img/bridge.webp"), "old_bridge.webp");
        assert_eq!(file_name_for("Old Bridge", "photos/bridge.gif"), "old_bridge.gif");
    }

    #[tokio::test]
    async fn test_download_saves_file() {
        let dir = tempfile::tempdir().unwrap();
        let opener = CountingOpener::new(true);
        let request = DownloadRequest::new("Old Bridge", URL);

        let outcome = download(&StaticFetcher(Some(b"jpeg".to_vec())), &opener, &request, dir.path()).await;
        let expected = dir.path().join("old_bridge.jpg");
        assert_eq!(outcome, DownloadOutcome::Saved(expected.clone()));
        assert_eq!(std::fs::read(&expected).unwrap(), b"jpeg");
        assert_eq!(opener.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let opener = CountingOpener::new(true);
        let request = DownloadRequest::new("Old Bridge", URL);
        let fetcher = StaticFetcher(Some(vec![1, 2, 3]));

        download(&fetcher, &opener, &request, dir.path()).await;
        let second = download(&fetcher, &opener, &request, dir.path()).await;
        assert_eq!(second, DownloadOutcome::Saved(dir.path().join("old_bridge-1.jpg")));
    }

    #[tokio::test]
    async fn test_fetch_failure_opens_externally() {
        let dir = tempfile::tempdir().unwrap();
        let opener = CountingOpener::new(true);
        let request = DownloadRequest::new("Old Bridge", URL);

        let outcome = download(&StaticFetcher(None), &opener, &request, dir.path()).await;
        assert_eq!(outcome, DownloadOutcome::FallbackOpened(URL.to_string()));
        assert_eq!(opener.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_paths_fail() {
        let dir = tempfile::tempdir().unwrap();
        let opener = CountingOpener::new(false);
        let request = DownloadRequest::new("Old Bridge", URL);

        let outcome = download(&StaticFetcher(None), &opener, &request, dir.path()).await;
        assert!(matches!(outcome, DownloadOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_http_fetcher_reads_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.png");
        std::fs::write(&path, b"png").unwrap();

        let fetcher = HttpFetcher::new().unwrap();
        let url = format!("file://{}", path.display());
        assert_eq!(fetcher.fetch(&url).await.unwrap(), b"png");
        assert!(fetcher.fetch("/definitely/not/here.png").await.is_err());
    }
}
