// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The CLI takes one URL and a handful of tuning flags. Every tuning flag
// can also come from an environment variable (PAGE_INSPECTOR_*), which is
// handy when the tool runs inside CI.
// =============================================================================

use clap::Parser;
use page_inspector::AnalyzerConfig;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "page-inspector",
    version,
    about = "Fetch a web page and report its HTML version, headings, links and login forms",
    long_about = "page-inspector fetches a single page and characterizes it: declared HTML version, \
                  title, heading counts, internal/external links (and how many are unreachable), \
                  and whether it contains a login form."
)]
pub struct Cli {
    /// Page to analyze (http:// is assumed when no scheme is given)
    ///
    /// Example: page-inspector example.com
    pub url: String,

    /// Output the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log debug output (per-link probe results) to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Seconds allowed for fetching the page itself
    #[arg(long, env = "PAGE_INSPECTOR_FETCH_TIMEOUT", default_value_t = 10)]
    pub fetch_timeout: u64,

    /// Seconds allowed for each link probe
    #[arg(long, env = "PAGE_INSPECTOR_PROBE_TIMEOUT", default_value_t = 3)]
    pub probe_timeout: u64,

    /// Maximum number of links probed at the same time
    #[arg(long, env = "PAGE_INSPECTOR_PROBE_CONCURRENCY", default_value_t = 50)]
    pub probe_concurrency: usize,

    /// Seconds allowed for checking all links; unfinished checks count as unreachable
    #[arg(long, env = "PAGE_INSPECTOR_LINK_DEADLINE", default_value_t = 30)]
    pub link_deadline: u64,
}

impl Cli {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig::default()
            .with_fetch_timeout(Duration::from_secs(self.fetch_timeout))
            .with_probe_timeout(Duration::from_secs(self.probe_timeout))
            .with_probe_concurrency(self.probe_concurrency)
            .with_link_phase_deadline(Duration::from_secs(self.link_deadline))
    }
}
