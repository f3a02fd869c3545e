// src/lib.rs
// =============================================================================
// page-inspector: given a URL, characterize the page.
//
// The report covers:
// - the declared HTML version
// - the page title
// - how many headings there are at each level
// - internal and external links, and how many of each are unreachable
// - whether the page has a login form
//
// Entry points:
// - analyze_url(): one-shot analysis with default settings
// - Analyzer: reusable, configurable analyzer
// =============================================================================

pub mod analyzer;
pub mod config;
pub mod error;
pub mod fetch;

pub use analyzer::{analyze_url, AnalysisResult, Analyzer, HtmlVersion};
pub use config::AnalyzerConfig;
pub use error::{AnalyzeError, Result};
