// ABOUTME: Error types for the scrape engine including ErrorCode enum and ScrapeError struct.
// ABOUTME: Also provides ConfigError for registry/request validation failures.

use std::fmt;

use thiserror::Error;

/// Error codes representing different categories of per-source failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    HttpStatus(u16),
    Timeout,
    Ssrf,
    Extract,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidUrl => write!(f, "invalid URL"),
            ErrorCode::Fetch => write!(f, "fetch error"),
            ErrorCode::HttpStatus(code) => write!(f, "HTTP status {}", code),
            ErrorCode::Timeout => write!(f, "timeout"),
            ErrorCode::Ssrf => write!(f, "SSRF blocked"),
            ErrorCode::Extract => write!(f, "extraction error"),
        }
    }
}

/// A per-source failure during fetch or extraction.
///
/// These errors are recorded on the source's outcome and never abort
/// sibling sources within the same aggregation pass.
#[derive(Debug, thiserror::Error)]
pub struct ScrapeError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "newsdesk: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScrapeError {
    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Fetch,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an HttpStatus error for a non-2xx response.
    pub fn http_status(status: u16, url: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::HttpStatus(status),
            url: url.into(),
            op: op.into(),
            source: None,
        }
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Timeout,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an SSRF error.
    pub fn ssrf(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Ssrf,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Extract error.
    pub fn extract(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Extract,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is an HttpStatus error.
    pub fn is_http_status(&self) -> bool {
        matches!(self.code, ErrorCode::HttpStatus(_))
    }

    /// Returns true if this is an SSRF error.
    pub fn is_ssrf(&self) -> bool {
        self.code == ErrorCode::Ssrf
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is an Extract error.
    pub fn is_extract(&self) -> bool {
        self.code == ErrorCode::Extract
    }
}

/// Configuration-level failures.
///
/// Unlike [`ScrapeError`], these are fatal to the request (or to startup
/// when detected at registry build time).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two sources were registered under the same identifier.
    #[error("duplicate source id: {0}")]
    DuplicateSource(String),

    /// A source definition is structurally invalid.
    #[error("invalid source {id}: {reason}")]
    InvalidSource { id: String, reason: String },

    /// The registry contains no sources.
    #[error("source registry is empty")]
    EmptyRegistry,

    /// The aggregate request parameters are out of range.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A sources document could not be parsed.
    #[error("failed to parse sources: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Creates an InvalidSource error with a custom reason.
    pub fn invalid_source(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidSource {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Parse error from an underlying serde error.
    pub fn parse(err: impl fmt::Display) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_and_code() {
        let err = ScrapeError::timeout("https://example.com/news", "Fetch", None);
        let msg = err.to_string();
        assert!(msg.contains("Fetch"));
        assert!(msg.contains("https://example.com/news"));
        assert!(msg.contains("timeout"));
    }

    #[test]
    fn display_includes_source_error() {
        let err = ScrapeError::fetch(
            "https://example.com",
            "Fetch",
            Some(anyhow::anyhow!("connection refused")),
        );
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn http_status_code_is_preserved() {
        let err = ScrapeError::http_status(503, "https://example.com", "Fetch");
        assert!(err.is_http_status());
        assert_eq!(err.code, ErrorCode::HttpStatus(503));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn predicates_match_codes() {
        assert!(ScrapeError::timeout("u", "op", None).is_timeout());
        assert!(ScrapeError::fetch("u", "op", None).is_fetch());
        assert!(ScrapeError::ssrf("u", "op", None).is_ssrf());
        assert!(ScrapeError::extract("u", "op", None).is_extract());
        assert!(ScrapeError::invalid_url("u", "op", None).is_invalid_url());
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::DuplicateSource("devto".into()).to_string(),
            "duplicate source id: devto"
        );
        assert!(ConfigError::EmptyRegistry.to_string().contains("empty"));
        assert!(ConfigError::invalid_source("x", "missing url")
            .to_string()
            .contains("missing url"));
    }
}
