// src/analyzer/probe.rs
// =============================================================================
// This module checks whether a link answers.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Uses its own short timeout and a fixed user agent
// - Follows a bounded number of redirects; when the budget runs out the
//   last redirect response is the answer, not an error
// - Any failure at all (timeout, DNS, TLS, 4xx, 5xx) means "unreachable"
//
// The probe is behind a trait so the link classifier can be tested
// without a network.
// =============================================================================

use crate::config::ProbeConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

/// Outcome of probing one link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// Answered with a status in [200, 400)
    Reachable,
    /// Anything else, including no answer at all
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Reachability::Reachable)
    }
}

/// Something that can tell whether a URL answers
///
/// Implementations must never fail: every problem collapses to
/// `Reachability::Unreachable`.
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn probe(&self, url: &Url) -> Reachability;
}

/// Probes links with real HEAD requests
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let max_requests = config.max_requests;

        // previous() holds every URL requested so far in the chain,
        // including the one that just answered with a redirect
        let redirects = Policy::custom(move |attempt| {
            if attempt.previous().len() >= max_requests {
                attempt.stop()
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirects)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn probe(&self, url: &Url) -> Reachability {
        // mailto:, ftp:, data: and friends cannot be HEAD-requested
        if !matches!(url.scheme(), "http" | "https") {
            debug!("Not probing {} (scheme {})", url, url.scheme());
            return Reachability::Unreachable;
        }

        match self.client.head(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                debug!("Probe {} -> HTTP {}", url, status.as_u16());
                classify_status(status)
            }
            Err(e) => {
                debug!("Probe {} failed: {} ({})", url, failure_reason(&e), e);
                Reachability::Unreachable
            }
        }
    }
}

// 2xx and 3xx count as reachable, everything else does not
fn classify_status(status: StatusCode) -> Reachability {
    if status.is_success() || status.is_redirection() {
        Reachability::Reachable
    } else {
        Reachability::Unreachable
    }
}

// Short description of why a probe failed, for the logs
fn failure_reason(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "request timed out"
    } else if error.is_redirect() {
        "redirect error"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_builder() || error.is_request() {
        "malformed request"
    } else {
        "request failed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PROBE_USER_AGENT;
    use std::time::Duration;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn prober() -> HttpProber {
        HttpProber::new(&ProbeConfig::default()).unwrap()
    }

    fn url(server: &MockServer, route: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::OK), Reachability::Reachable);
        assert_eq!(classify_status(StatusCode::NO_CONTENT), Reachability::Reachable);
        assert_eq!(classify_status(StatusCode::MOVED_PERMANENTLY), Reachability::Reachable);
        assert_eq!(classify_status(StatusCode::NOT_FOUND), Reachability::Unreachable);
        assert_eq!(classify_status(StatusCode::INTERNAL_SERVER_ERROR), Reachability::Unreachable);
        assert_eq!(classify_status(StatusCode::CONTINUE), Reachability::Unreachable);
    }

    #[tokio::test]
    async fn test_ok_link_sends_head_with_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .and(header("user-agent", PROBE_USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = prober().probe(&url(&mock_server, "/ok")).await;
        assert_eq!(outcome, Reachability::Reachable);
    }

    #[tokio::test]
    async fn test_not_found_is_unreachable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let outcome = prober().probe(&url(&mock_server, "/gone")).await;
        assert_eq!(outcome, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn test_redirect_to_ok_is_reachable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
            .mount(&mock_server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = prober().probe(&url(&mock_server, "/old")).await;
        assert_eq!(outcome, Reachability::Reachable);
    }

    #[tokio::test]
    async fn test_redirect_to_missing_is_unreachable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/missing"))
            .mount(&mock_server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let outcome = prober().probe(&url(&mock_server, "/old")).await;
        assert_eq!(outcome, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn test_exhausted_redirect_budget_uses_last_response() {
        let mock_server = MockServer::start().await;

        // /r0 -> /r1 -> ... -> /r5, where /r5 would be a 404
        for i in 0..5 {
            Mock::given(method("HEAD"))
                .and(path(format!("/r{}", i)))
                .respond_with(
                    ResponseTemplate::new(301).insert_header("Location", format!("/r{}", i + 1)),
                )
                .expect(1)
                .mount(&mock_server)
                .await;
        }
        Mock::given(method("HEAD"))
            .and(path("/r5"))
            .respond_with(ResponseTemplate::new(404))
            .expect(0)
            .mount(&mock_server)
            .await;

        // Five requests are made; the fifth 301 is the outcome
        let outcome = prober().probe(&url(&mock_server, "/r0")).await;
        assert_eq!(outcome, Reachability::Reachable);
    }

    #[tokio::test]
    async fn test_slow_link_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let config = ProbeConfig {
            timeout: Duration::from_millis(200),
            ..ProbeConfig::default()
        };
        let prober = HttpProber::new(&config).unwrap();

        let outcome = prober.probe(&url(&mock_server, "/slow")).await;
        assert_eq!(outcome, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn test_non_http_scheme_is_unreachable() {
        let mailto = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(prober().probe(&mailto).await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        let dead = Url::parse("http://127.0.0.1:1/").unwrap();
        assert_eq!(prober().probe(&dead).await, Reachability::Unreachable);
    }
}
