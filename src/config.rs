// src/config.rs
// =============================================================================
// Tunable knobs for one analysis.
//
// The defaults are what the CLI uses when no flags are given:
// - 10 second budget for fetching the page itself
// - 3 second budget for each link probe
// - at most 5 requests per probe (the first one plus 4 redirects)
// - at most 50 probes in flight at once
// - 30 seconds for the whole link-checking phase
// =============================================================================

use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_PROBE_MAX_REQUESTS: usize = 5;
pub const DEFAULT_PROBE_CONCURRENCY: usize = 50;
pub const DEFAULT_LINK_PHASE_DEADLINE: Duration = Duration::from_secs(30);

/// User agent sent with every link probe.
pub const PROBE_USER_AGENT: &str = concat!("page-inspector/", env!("CARGO_PKG_VERSION"));

/// Settings for the reachability prober.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub timeout: Duration,
    /// Requests allowed per probe, counting the first one.
    /// When the chain would need more, the last redirect response is the outcome.
    pub max_requests: usize,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            max_requests: DEFAULT_PROBE_MAX_REQUESTS,
            user_agent: PROBE_USER_AGENT.to_string(),
        }
    }
}

/// Settings for a whole analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub fetch_timeout: Duration,
    pub probe: ProbeConfig,
    pub probe_concurrency: usize,
    pub link_phase_deadline: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            probe: ProbeConfig::default(),
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
            link_phase_deadline: DEFAULT_LINK_PHASE_DEADLINE,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe.timeout = timeout;
        self
    }

    pub fn with_probe_max_requests(mut self, max_requests: usize) -> Self {
        self.probe.max_requests = max_requests;
        self
    }

    /// Zero is bumped to one so the probe pool always makes progress.
    pub fn with_probe_concurrency(mut self, concurrency: usize) -> Self {
        self.probe_concurrency = concurrency.max(1);
        self
    }

    pub fn with_link_phase_deadline(mut self, deadline: Duration) -> Self {
        self.link_phase_deadline = deadline;
        self
    }
}
