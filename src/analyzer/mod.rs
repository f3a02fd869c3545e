// src/analyzer/mod.rs
// =============================================================================
// This module contains the page analysis engine.
//
// Submodules:
// - version: Reads the HTML version from the doctype
// - document: Wraps the parsed HTML tree
// - links: Finds, classifies and counts links
// - probe: Checks whether a link answers
// - login: Looks for login forms
// - result: The final report
//
// This file (mod.rs) ties them together. An analysis runs like this:
//   URL -> fetch -> raw HTML
//       -> doctype check on the raw text
//       -> parse -> title, headings, links, login form
//       -> probe links concurrently -> AnalysisResult
// =============================================================================

pub mod document;
pub mod links;
pub mod login;
pub mod probe;
pub mod result;
pub mod version;

pub use links::{CandidateLink, LinkScope, LinkTally};
pub use probe::{HttpProber, LinkProber, Reachability};
pub use result::AnalysisResult;
pub use version::{detect_html_version, HtmlVersion};

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::fetch;
use document::Document;
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::info;
use url::Url;

// What we learn from the parsed tree before any link is probed
struct MarkupFindings {
    title: String,
    headings: BTreeMap<String, usize>,
    links: Vec<CandidateLink>,
    has_login_form: bool,
}

// Runs every query that needs the parsed document
//
// The document is dropped before returning, so nothing tied to the
// (non-Send) HTML tree is held across the probing awaits.
fn inspect_markup(body: &str, base_url: &Url) -> Result<MarkupFindings> {
    let document = Document::parse(body);

    Ok(MarkupFindings {
        title: document.title()?,
        headings: document.heading_counts()?,
        links: links::collect_links(&document, base_url)?,
        has_login_form: login::has_login_form(&document)?,
    })
}

/// Analyzes pages
///
/// Holds the HTTP clients so repeated analyses share connection pools.
/// Each call to [`Analyzer::analyze`] is otherwise independent.
pub struct Analyzer<P = HttpProber> {
    config: AnalyzerConfig,
    page_client: Client,
    prober: P,
}

impl Analyzer<HttpProber> {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let prober = HttpProber::new(&config.probe)?;
        Self::with_prober(config, prober)
    }
}

impl<P: LinkProber> Analyzer<P> {
    /// Uses a custom link prober instead of real HEAD requests
    pub fn with_prober(config: AnalyzerConfig, prober: P) -> Result<Self> {
        let page_client = fetch::page_client(config.fetch_timeout)?;
        Ok(Self {
            config,
            page_client,
            prober,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Fetches the page at `input` and characterizes it
    ///
    /// `input` may omit the scheme, in which case http:// is assumed.
    pub async fn analyze(&self, input: &str) -> Result<AnalysisResult> {
        let url = fetch::normalize_url(input)?;
        let page = fetch::fetch_page(&self.page_client, &url).await?;

        let html_version = detect_html_version(&page.body);
        let findings = inspect_markup(&page.body, &page.base_url)?;

        info!(
            "{}: {} unique link(s) to check, login form: {}",
            page.base_url,
            findings.links.len(),
            findings.has_login_form
        );

        let (tally, _) = links::tally_links(
            &self.prober,
            findings.links,
            self.config.probe_concurrency,
            self.config.link_phase_deadline,
        )
        .await;

        info!(
            "{}: {} internal ({} inaccessible), {} external ({} inaccessible)",
            page.base_url,
            tally.internal,
            tally.inaccessible_internal,
            tally.external,
            tally.inaccessible_external
        );

        Ok(AnalysisResult::new(
            html_version,
            findings.title,
            findings.headings,
            tally,
            findings.has_login_form,
        ))
    }
}

/// Analyzes one page with the default settings
pub async fn analyze_url(input: &str) -> Result<AnalysisResult> {
    Analyzer::new(AnalyzerConfig::default())?.analyze(input).await
}
