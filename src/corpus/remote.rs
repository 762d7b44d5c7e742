//! Remote corpus retrieval through a share link.
//!
//! Authentication and transport live behind [`RemoteFetcher`]; this module
//! only resolves the file identifier from the link and parses whatever text
//! the fetcher hands back. Malformed lines in remote content are skipped.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::corpus::record::{Dataset, ParsePolicy, parse_jsonl};
use crate::corpus::source::CorpusSource;
use crate::error::{ParleyError, Result};

static FILE_PATH_LINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"drive\.google\.com/file/d/([^/?#]+)").ok());

static OPEN_LINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"drive\.google\.com/open\?id=([^&#]+)").ok());

/// Extract the file identifier from a share link.
///
/// Two link shapes are recognised:
/// `https://drive.google.com/file/d/<id>/view` and
/// `https://drive.google.com/open?id=<id>&...`.
///
/// # Examples
///
/// ```
/// use parley::corpus::extract_file_id;
///
/// assert_eq!(
///     extract_file_id("https://drive.google.com/file/d/abc123/view?usp=sharing"),
///     Some("abc123".to_string())
/// );
/// assert_eq!(extract_file_id("https://example.com/data.jsonl"), None);
/// ```
pub fn extract_file_id(url: &str) -> Option<String> {
    [&*FILE_PATH_LINK, &*OPEN_LINK]
        .into_iter()
        .flatten()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Fetches the raw text of a remote file.
///
/// Any failure (authentication, transport, missing file) is reported as
/// `None`; callers treat that as "no data available".
pub trait RemoteFetcher: Send + Sync {
    /// Fetch the content of the file identified by `file_id`.
    fn fetch(&self, file_id: &str) -> Option<String>;
}

/// A fetcher with no transport configured. Every fetch yields `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFetcher;

impl RemoteFetcher for NullFetcher {
    fn fetch(&self, file_id: &str) -> Option<String> {
        log::warn!("No remote transport configured; cannot fetch file {file_id}");
        None
    }
}

/// A corpus behind a share link.
#[derive(Clone)]
pub struct RemoteSource {
    url: String,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl RemoteSource {
    /// Create a remote source for `url` using `fetcher` for transport.
    pub fn new<S: Into<String>>(url: S, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        RemoteSource {
            url: url.into(),
            fetcher,
        }
    }

    /// The share link.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSource")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl CorpusSource for RemoteSource {
    fn load(&self) -> Result<Dataset> {
        let file_id = extract_file_id(&self.url).ok_or_else(|| {
            ParleyError::source_unavailable(format!("unrecognised share link: {}", self.url))
        })?;

        let content = self
            .fetcher
            .fetch(&file_id)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                ParleyError::source_unavailable(format!("no content fetched for file {file_id}"))
            })?;

        let dataset = parse_jsonl(&content, ParsePolicy::Lenient)?;
        log::info!("Loaded {} entries from remote file {}", dataset.len(), file_id);
        Ok(dataset)
    }

    fn describe(&self) -> String {
        format!("remote:{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    /// Serves canned content and remembers which ids were requested.
    struct CannedFetcher {
        content: Option<String>,
        requested: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        fn new(content: Option<&str>) -> Self {
            CannedFetcher {
                content: content.map(str::to_string),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl RemoteFetcher for CannedFetcher {
        fn fetch(&self, file_id: &str) -> Option<String> {
            self.requested.lock().push(file_id.to_string());
            self.content.clone()
        }
    }

    #[test]
    fn test_extract_file_id() {
        assert_eq!(
            extract_file_id("https://drive.google.com/file/d/1AbC_d-9/view?usp=sharing"),
            Some("1AbC_d-9".to_string())
        );
        assert_eq!(
            extract_file_id("https://drive.google.com/open?id=XYZ&authuser=0"),
            Some("XYZ".to_string())
        );
        assert_eq!(extract_file_id("https://drive.google.com/drive/folders/abc"), None);
        assert_eq!(extract_file_id("https://drive.google.com/file/d/"), None);
    }

    #[test]
    fn test_remote_source_skips_malformed_lines() {
        let content = concat!(
            r#"{"instruction": "Get order details", "input": "Order ID: 1", "output": "one"}"#,
            "\n{broken\n",
            r#"{"instruction": "Get order details", "input": "Order ID: 2", "output": "two"}"#,
            "\n"
        );
        let fetcher = Arc::new(CannedFetcher::new(Some(content)));
        let source = RemoteSource::new("https://drive.google.com/file/d/F1/view", fetcher.clone());

        let dataset = source.load().unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[1].output, "two");
        assert_eq!(*fetcher.requested.lock(), vec!["F1".to_string()]);
    }

    #[test]
    fn test_remote_source_unavailable_cases() {
        let bad_link = RemoteSource::new(
            "https://example.com/corpus.jsonl",
            Arc::new(CannedFetcher::new(Some("{}"))),
        );
        assert!(matches!(
            bad_link.load().unwrap_err(),
            ParleyError::SourceUnavailable(_)
        ));

        let no_content = RemoteSource::new(
            "https://drive.google.com/open?id=F2",
            Arc::new(CannedFetcher::new(None)),
        );
        assert!(matches!(
            no_content.load().unwrap_err(),
            ParleyError::SourceUnavailable(_)
        ));

        let blank = RemoteSource::new(
            "https://drive.google.com/open?id=F3",
            Arc::new(CannedFetcher::new(Some("  \n"))),
        );
        assert!(matches!(
            blank.load().unwrap_err(),
            ParleyError::SourceUnavailable(_)
        ));

        let unconfigured =
            RemoteSource::new("https://drive.google.com/open?id=F4", Arc::new(NullFetcher));
        assert!(unconfigured.load().is_err());
    }
}
