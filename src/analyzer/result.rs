// src/analyzer/result.rs
// =============================================================================
// The report produced by one analysis.
//
// Built once at the end of an analysis and never changed afterwards.
// Serializes to JSON for the --json output.
// =============================================================================

use crate::analyzer::links::LinkTally;
use crate::analyzer::version::HtmlVersion;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub html_version: HtmlVersion,
    /// Trimmed <title> text, possibly empty
    pub title: String,
    /// "H1".."H6" -> number of headings at that level
    pub headings: BTreeMap<String, usize>,
    pub internal_links: usize,
    pub external_links: usize,
    pub inaccessible_internal_links: usize,
    pub inaccessible_external_links: usize,
    pub has_login_form: bool,
}

impl AnalysisResult {
    pub fn new(
        html_version: HtmlVersion,
        title: String,
        headings: BTreeMap<String, usize>,
        links: LinkTally,
        has_login_form: bool,
    ) -> Self {
        Self {
            html_version,
            title,
            headings,
            internal_links: links.internal,
            external_links: links.external,
            inaccessible_internal_links: links.inaccessible_internal,
            inaccessible_external_links: links.inaccessible_external,
            has_login_form,
        }
    }

    pub fn total_links(&self) -> usize {
        self.internal_links + self.external_links
    }

    pub fn total_headings(&self) -> usize {
        self.headings.values().sum()
    }
}
