// ABOUTME: Resource handling module for fetching listing pages over HTTP.
// ABOUTME: Handles URL validation, SSRF guarding, content-length limits, and charset decoding.

use std::collections::HashMap;
use std::net::IpAddr;

use bytes::Bytes;
use ipnet::{Ipv4Net, Ipv6Net};
use url::Url;

use crate::error::ScrapeError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Options for fetching a resource.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
    /// Return the body of non-2xx responses instead of erroring.
    pub parse_non_200: bool,
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using charset hints from the content-type header.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check if an IP address is in a private/reserved range.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => {
            // RFC1918 private ranges plus loopback and link-local
            let private_10: Ipv4Net = "10.0.0.0/8".parse().unwrap();
            let private_172: Ipv4Net = "172.16.0.0/12".parse().unwrap();
            let private_192: Ipv4Net = "192.168.0.0/16".parse().unwrap();
            let loopback: Ipv4Net = "127.0.0.0/8".parse().unwrap();
            let link_local: Ipv4Net = "169.254.0.0/16".parse().unwrap();

            private_10.contains(ip)
                || private_172.contains(ip)
                || private_192.contains(ip)
                || loopback.contains(ip)
                || link_local.contains(ip)
        }
        IpAddr::V6(ip) => {
            if ip.is_loopback() {
                return true;
            }
            let unique_local: Ipv6Net = "fc00::/7".parse().unwrap();
            let link_local: Ipv6Net = "fe80::/10".parse().unwrap();

            unique_local.contains(ip) || link_local.contains(ip)
        }
    }
}

/// Verify that a URL's host does not resolve to a private network.
///
/// Applied to the request target and again to the final URL after
/// redirects, so a redirect cannot smuggle a request into the LAN.
async fn ensure_public_host(target: &Url, original: &str) -> Result<(), ScrapeError> {
    let Some(host) = target.host_str() else {
        return Ok(());
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(ScrapeError::ssrf(
                original,
                "Fetch",
                Some(anyhow::anyhow!("private IP addresses are not allowed")),
            ));
        }
        return Ok(());
    }

    let port = target
        .port()
        .unwrap_or(if target.scheme() == "https" { 443 } else { 80 });
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        ScrapeError::fetch(
            original,
            "Fetch",
            Some(anyhow::anyhow!("DNS lookup failed: {}", e)),
        )
    })?;
    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(ScrapeError::ssrf(
                original,
                "Fetch",
                Some(anyhow::anyhow!("private IP addresses are not allowed")),
            ));
        }
    }
    Ok(())
}

/// Decode body bytes to a String using the declared or detected charset.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Fetch a resource from the given URL.
///
/// The caller's `client` carries the per-request timeout; timeouts map to
/// [`crate::ErrorCode::Timeout`], transport failures to `Fetch`, non-2xx
/// statuses to `HttpStatus` unless `opts.parse_non_200` is set.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ScrapeError> {
    if url.is_empty() {
        return Err(ScrapeError::invalid_url(url, "Fetch", None));
    }

    let parsed_url = Url::parse(url).map_err(|e| {
        ScrapeError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScrapeError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        ensure_public_host(&parsed_url, url).await?;
    }

    let mut request = client.get(url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ScrapeError::timeout(url, "Fetch", Some(anyhow::anyhow!("request timed out")))
        } else {
            ScrapeError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
        }
    })?;

    if !opts.allow_private_networks {
        let final_url = response.url().clone();
        ensure_public_host(&final_url, url).await?;
    }

    let status = response.status().as_u16();
    if !response.status().is_success() && !opts.parse_non_200 {
        return Err(ScrapeError::http_status(status, url, "Fetch"));
    }

    let content_length = response.content_length().or_else(|| {
        response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    });
    if let Some(len) = content_length {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ScrapeError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large: {} bytes", len)),
            ));
        }
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let final_url = response.url().to_string();

    let body = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ScrapeError::timeout(url, "Fetch", Some(anyhow::anyhow!("body read timed out")))
        } else {
            ScrapeError::fetch(url, "Fetch", Some(anyhow::anyhow!("body read failed: {}", e)))
        }
    })?;
    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large: {} bytes", body.len())),
        ));
    }

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
