// src/analyzer/links.rs
// =============================================================================
// This module finds the links on a page, sorts them into internal and
// external, and counts how many of each do not answer.
//
// It runs in two phases:
// 1. collect_links (synchronous): walk every <a href>, resolve the href
//    against the page URL, skip the ones that are not real links, drop
//    duplicates and classify each unique URL by hostname.
// 2. tally_links (async): probe every unique URL, a bounded number at a
//    time, and fold the outcomes into one LinkTally.
//
// Probes never touch shared counters. Each probe returns its own outcome
// and the tally is built in one place after the probes finish (or the
// deadline passes, in which case unfinished probes count as unreachable).
// =============================================================================

use crate::analyzer::document::Document;
use crate::analyzer::probe::{LinkProber, Reachability};
use crate::error::Result;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Whether a link stays on the analyzed host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkScope {
    Internal,
    External,
}

/// One unique link found on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// The href as written (trimmed)
    pub href: String,
    /// The href resolved against the page URL
    pub url: Url,
    pub scope: LinkScope,
    /// Filled in by tally_links; None until probed
    pub reachability: Option<Reachability>,
}

/// Link counts for a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTally {
    pub internal: usize,
    pub external: usize,
    pub inaccessible_internal: usize,
    pub inaccessible_external: usize,
}

impl LinkTally {
    // Adds one link. A link that was never probed counts as inaccessible.
    fn record(&mut self, link: &CandidateLink) {
        let reachable = link
            .reachability
            .map(|outcome| outcome.is_reachable())
            .unwrap_or(false);

        match link.scope {
            LinkScope::Internal => {
                self.internal += 1;
                if !reachable {
                    self.inaccessible_internal += 1;
                }
            }
            LinkScope::External => {
                self.external += 1;
                if !reachable {
                    self.inaccessible_external += 1;
                }
            }
        }
    }

    pub fn from_links(links: &[CandidateLink]) -> Self {
        let mut tally = LinkTally::default();
        for link in links {
            tally.record(link);
        }
        tally
    }
}

// Extracts every unique link from the page, in document order
//
// Skipped:
// - empty hrefs
// - fragment-only hrefs ("#top")
// - script pseudo-URLs ("javascript:void(0)")
// - hrefs that do not resolve to a URL
//
// Example:
//   base = "http://example.com/x"
//   <a href="/about">, <a href="/about">, <a href="https://rust-lang.org">
//   -> [http://example.com/about (internal), https://rust-lang.org/ (external)]
pub fn collect_links(document: &Document, base_url: &Url) -> Result<Vec<CandidateLink>> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.find("a[href]")? {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        if !is_followable(href) {
            continue;
        }

        let Some(url) = resolve_url(base_url, href) else {
            debug!("Skipping unparseable href {:?}", href);
            continue;
        };

        // First occurrence wins; later duplicates add nothing
        if !seen.insert(url.to_string()) {
            continue;
        }

        links.push(CandidateLink {
            href: href.to_string(),
            scope: classify(base_url, &url),
            url,
            reachability: None,
        });
    }

    Ok(links)
}

// Whether an href points somewhere worth counting
fn is_followable(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let is_script = href
        .get(..11)
        .map(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
        .unwrap_or(false);

    !is_script
}

// Resolves a possibly-relative href to an absolute URL
//
// Url::join handles both cases: an absolute href replaces the base,
// a relative one is resolved against it.
fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    base.join(href).ok()
}

// Same hostname (exact string match) means internal.
// www.example.com and example.com are different hosts.
fn classify(base: &Url, url: &Url) -> LinkScope {
    if url.host_str() == base.host_str() {
        LinkScope::Internal
    } else {
        LinkScope::External
    }
}

// Probes every link and counts the results
//
// At most `concurrency` probes run at once. Whatever has not finished
// when `deadline` passes is abandoned and counted as inaccessible.
pub async fn tally_links<P>(
    prober: &P,
    mut links: Vec<CandidateLink>,
    concurrency: usize,
    deadline: Duration,
) -> (LinkTally, Vec<CandidateLink>)
where
    P: LinkProber + ?Sized,
{
    let mut outcomes: Vec<Option<Reachability>> = vec![None; links.len()];

    {
        let probes = links.iter().enumerate().map(|(index, link)| async move {
            (index, prober.probe(&link.url).await)
        });

        // .buffer_unordered(N) runs up to N probes at once and yields
        // results as they complete
        let mut results = stream::iter(probes).buffer_unordered(concurrency.max(1));
        let expires_at = tokio::time::Instant::now() + deadline;

        loop {
            match tokio::time::timeout_at(expires_at, results.next()).await {
                Ok(Some((index, outcome))) => outcomes[index] = Some(outcome),
                Ok(None) => break,
                Err(_) => {
                    let pending = outcomes.iter().filter(|o| o.is_none()).count();
                    warn!(
                        "Link checks exceeded {:?}; {} probe(s) abandoned",
                        deadline, pending
                    );
                    break;
                }
            }
        }
    }

    for (link, outcome) in links.iter_mut().zip(outcomes) {
        link.reachability = Some(outcome.unwrap_or(Reachability::Unreachable));
    }

    (LinkTally::from_links(&links), links)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why collect first and probe later?
//    - The parsed HTML tree is not Send, so it cannot be held across .await
//    - collect_links finishes with the tree before any network call starts
//
// 2. What is timeout_at?
//    - Wraps a future and gives up once a fixed Instant is reached
//    - Here it wraps results.next(), so the whole loop shares one deadline
//
// 3. What happens to abandoned probes?
//    - Dropping `results` drops the in-flight futures, which cancels them
//    - Their slots in `outcomes` are still None and become Unreachable
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // Answers from a fixed list of dead URLs and records every probe
    struct FakeProber {
        dead: Vec<&'static str>,
        probed: Mutex<Vec<String>>,
    }

    impl FakeProber {
        fn new(dead: Vec<&'static str>) -> Self {
            Self {
                dead,
                probed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LinkProber for FakeProber {
        async fn probe(&self, url: &Url) -> Reachability {
            self.probed.lock().unwrap().push(url.to_string());
            if self.dead.iter().any(|dead| *dead == url.as_str()) {
                Reachability::Unreachable
            } else {
                Reachability::Reachable
            }
        }
    }

    // Never answers within any reasonable deadline
    struct StuckProber {
        started: AtomicUsize,
    }

    #[async_trait]
    impl LinkProber for StuckProber {
        async fn probe(&self, _url: &Url) -> Reachability {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(60)).await;
            Reachability::Reachable
        }
    }

    fn base() -> Url {
        Url::parse("http://example.com/x").unwrap()
    }

    #[test]
    fn test_relative_link_is_internal() {
        let doc = Document::parse(r#"<a href="/about">About</a>"#);
        let links = collect_links(&doc, &base()).unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url.as_str(), "http://example.com/about");
        assert_eq!(links[0].scope, LinkScope::Internal);
    }

    #[test]
    fn test_other_host_is_external() {
        let doc = Document::parse(
            r#"<a href="https://rust-lang.org">Rust</a>
               <a href="http://www.example.com/">WWW</a>"#,
        );
        let links = collect_links(&doc, &base()).unwrap();

        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.scope == LinkScope::External));
    }

    #[test]
    fn test_skips_non_links() {
        let doc = Document::parse(
            r##"<a href="">Empty</a>
               <a href="   ">Blank</a>
               <a href="#top">Top</a>
               <a href="javascript:void(0)">Script</a>
               <a href="JavaScript:alert(1)">Script</a>
               <a href="http://[::1">Broken</a>
               <a>No href</a>"##,
        );
        let links = collect_links(&doc, &base()).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_duplicates_are_counted_once() {
        let doc = Document::parse(
            r#"<a href="/about">About</a>
               <a href=" /about ">About again</a>
               <a href="http://example.com/about">Absolute</a>
               <a href="/contact">Contact</a>"#,
        );
        let links = collect_links(&doc, &base()).unwrap();

        let urls: Vec<_> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["http://example.com/about", "http://example.com/contact"]);
        assert_eq!(links[0].href, "/about");
    }

    #[tokio::test]
    async fn test_tally_counts_dead_links_by_scope() {
        let doc = Document::parse(
            r#"<a href="/ok">ok</a>
               <a href="/dead">dead</a>
               <a href="/dead">dead again</a>
               <a href="https://other.org/">other</a>
               <a href="https://gone.org/">gone</a>
               <a href="mailto:someone@example.com">mail</a>"#,
        );
        let links = collect_links(&doc, &base()).unwrap();
        let prober = FakeProber::new(vec![
            "http://example.com/dead",
            "https://gone.org/",
            "mailto:someone@example.com",
        ]);

        let (tally, links) = tally_links(&prober, links, 4, Duration::from_secs(5)).await;

        assert_eq!(
            tally,
            LinkTally {
                internal: 2,
                external: 3,
                inaccessible_internal: 1,
                inaccessible_external: 2,
            }
        );
        assert!(links.iter().all(|l| l.reachability.is_some()));

        // Every unique URL probed exactly once
        let mut probed = prober.probed.lock().unwrap().clone();
        probed.sort();
        let before = probed.len();
        probed.dedup();
        assert_eq!(before, probed.len());
        assert_eq!(probed.len(), 5);
    }

    #[tokio::test]
    async fn test_tally_is_independent_of_concurrency() {
        let doc = Document::parse(
            r#"<a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>
               <a href="https://x.org/">x</a><a href="https://y.org/">y</a>"#,
        );
        let dead = vec!["http://example.com/b", "https://y.org/"];

        let serial = {
            let links = collect_links(&doc, &base()).unwrap();
            tally_links(&FakeProber::new(dead.clone()), links, 1, Duration::from_secs(5)).await.0
        };
        let parallel = {
            let links = collect_links(&doc, &base()).unwrap();
            tally_links(&FakeProber::new(dead), links, 50, Duration::from_secs(5)).await.0
        };

        assert_eq!(serial, parallel);
        assert!(serial.inaccessible_internal <= serial.internal);
        assert!(serial.inaccessible_external <= serial.external);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_abandons_slow_probes() {
        let doc = Document::parse(r#"<a href="/a">a</a><a href="https://x.org/">x</a>"#);
        let links = collect_links(&doc, &base()).unwrap();
        let prober = StuckProber {
            started: AtomicUsize::new(0),
        };

        let (tally, _) = tally_links(&prober, links, 10, Duration::from_secs(1)).await;

        assert_eq!(prober.started.load(Ordering::SeqCst), 2);
        assert_eq!(
            tally,
            LinkTally {
                internal: 1,
                external: 1,
                inaccessible_internal: 1,
                inaccessible_external: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_page_has_no_links() {
        let doc = Document::parse("<p>nothing here</p>");
        let links = collect_links(&doc, &base()).unwrap();
        let (tally, _) = tally_links(&FakeProber::new(vec![]), links, 4, Duration::from_secs(1)).await;
        assert_eq!(tally, LinkTally::default());
    }
}
