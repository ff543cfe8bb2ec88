//! Resolves a user-supplied address to document text.
//!
//! An absolute `http`/`https` URL is fetched with a blocking GET; anything
//! else is read as a local file. A blank address is an empty document.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("tagmend/", env!("CARGO_PKG_VERSION"));

/// Source loading error.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {message}")]
    Fetch { url: Url, message: String },

    #[error("HTTP error from {url}: {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Empty,
    Url(Url),
    File(PathBuf),
}

impl Location {
    pub fn resolve(address: &str) -> Self {
        let address = address.trim();
        if address.is_empty() {
            return Location::Empty;
        }
        match Url::parse(address) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Location::Url(url),
            _ => Location::File(PathBuf::from(address)),
        }
    }
}

/// Load the text at `address`.
pub fn load(address: &str) -> Result<String, SourceError> {
    match Location::resolve(address) {
        Location::Empty => Ok(String::new()),
        Location::Url(url) => {
            log::info!("fetching {url}");
            fetch(url)
        }
        Location::File(path) => {
            log::info!("reading {}", path.display());
            std::fs::read_to_string(&path).map_err(|source| SourceError::Read { path, source })
        }
    }
}

fn fetch(url: Url) -> Result<String, SourceError> {
    let fetch_error = |url: &Url, e: reqwest::Error| SourceError::Fetch {
        url: url.clone(),
        message: e.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| fetch_error(&url, e))?;

    let response = client
        .get(url.clone())
        .send()
        .map_err(|e| fetch_error(&url, e))?;

    if !response.status().is_success() {
        return Err(SourceError::Status {
            status: response.status(),
            url,
        });
    }

    response.text().map_err(|e| fetch_error(&url, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_blank() {
        assert_eq!(Location::resolve(""), Location::Empty);
        assert_eq!(Location::resolve("   "), Location::Empty);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            Location::resolve("https://example.com/index.html"),
            Location::Url(Url::parse("https://example.com/index.html").unwrap())
        );
        assert!(matches!(
            Location::resolve(" http://localhost:8080 "),
            Location::Url(_)
        ));
    }

    #[test]
    fn test_resolve_file() {
        assert_eq!(
            Location::resolve("tests/test1.html"),
            Location::File(PathBuf::from("tests/test1.html"))
        );
        // Only http(s) is fetched; other schemes are treated as paths.
        assert_eq!(
            Location::resolve("ftp://example.com/a.html"),
            Location::File(PathBuf::from("ftp://example.com/a.html"))
        );
    }

    #[test]
    fn test_load_blank() {
        assert_eq!(load("").unwrap(), "");
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("tagmend-source-{}.html", std::process::id()));
        std::fs::write(&path, "<p>hi</p>").unwrap();
        let text = load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, "<p>hi</p>");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("/definitely/not/here.html").unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
        assert!(err.to_string().starts_with("Error reading /definitely/not/here.html"));
    }
}
