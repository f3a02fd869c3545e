// src/fetch.rs
// =============================================================================
// This module fetches the page that is being analyzed.
//
// Steps:
// 1. Normalize the user input (add http:// when no scheme was given)
// 2. Parse it into a Url (this becomes the base for relative links)
// 3. GET the page with a bounded timeout
// 4. Insist on 200 OK and return the body as text
//
// Every step has its own error variant so the front end can pick the
// right status code (400 for bad input, 502 for network trouble, the
// upstream status for non-200 answers).
// =============================================================================

use crate::error::{AnalyzeError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested, used to resolve relative links
    pub base_url: Url,
    /// The full response body
    pub body: String,
}

// Turns user input into a URL we can fetch
//
// Examples:
//   "example.com"          -> http://example.com/
//   " https://example.com" -> https://example.com/
//   "http://"              -> Err(InvalidUrl)
pub fn normalize_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| AnalyzeError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none() {
        return Err(AnalyzeError::InvalidUrl {
            input: input.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    Ok(url)
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// Builds the client used for the page fetch
//
// The timeout covers the whole request including the body download.
pub fn page_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(client)
}

// Fetches a web page and returns its HTML content
//
// Only 200 OK counts as success; any other status is handed back to the
// caller untouched. Nothing is retried.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    info!("Fetching {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| AnalyzeError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    debug!("{} answered {}", url, status);

    if status != StatusCode::OK {
        return Err(AnalyzeError::UpstreamStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| AnalyzeError::ReadBody {
            url: url.to_string(),
            source,
        })?;

    Ok(FetchedPage {
        base_url: url.clone(),
        body,
    })
}
