// src/analyzer/version.rs
// =============================================================================
// This module works out which HTML version a page declares.
//
// It only looks at the raw text, never at the parsed tree: the doctype is
// found with a regex and then classified by an ordered list of rules.
// The first rule that matches wins, so more specific rules (HTML 4.01
// Transitional) sit above the broader ones they overlap with (HTML 4.01).
//
// A page without a doctype is "Unknown". A doctype we cannot make sense
// of is "Unknown/Custom". Nothing in here can fail.
// =============================================================================

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

// Everything between "<!DOCTYPE" and the next ">", across lines
static DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<!DOCTYPE\s*([^>]*)>").expect("doctype regex is valid"));

/// The HTML version label reported for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HtmlVersion {
    #[serde(rename = "HTML5")]
    Html5,
    #[serde(rename = "HTML 4.01 Strict")]
    Html401Strict,
    #[serde(rename = "HTML 4.01 Transitional")]
    Html401Transitional,
    #[serde(rename = "HTML 4.01 Frameset")]
    Html401Frameset,
    #[serde(rename = "HTML 4.0")]
    Html40,
    #[serde(rename = "HTML 3.2")]
    Html32,
    #[serde(rename = "HTML 2.0")]
    Html20,
    #[serde(rename = "XHTML 1.0 Strict")]
    Xhtml10Strict,
    #[serde(rename = "XHTML 1.0 Transitional")]
    Xhtml10Transitional,
    #[serde(rename = "XHTML 1.0 Frameset")]
    Xhtml10Frameset,
    #[serde(rename = "XHTML 1.1")]
    Xhtml11,
    #[serde(rename = "XHTML (unknown version)")]
    XhtmlUnknown,
    #[serde(rename = "Legacy HTML")]
    LegacyHtml,
    #[serde(rename = "Unknown/Custom")]
    Custom,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl HtmlVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HtmlVersion::Html5 => "HTML5",
            HtmlVersion::Html401Strict => "HTML 4.01 Strict",
            HtmlVersion::Html401Transitional => "HTML 4.01 Transitional",
            HtmlVersion::Html401Frameset => "HTML 4.01 Frameset",
            HtmlVersion::Html40 => "HTML 4.0",
            HtmlVersion::Html32 => "HTML 3.2",
            HtmlVersion::Html20 => "HTML 2.0",
            HtmlVersion::Xhtml10Strict => "XHTML 1.0 Strict",
            HtmlVersion::Xhtml10Transitional => "XHTML 1.0 Transitional",
            HtmlVersion::Xhtml10Frameset => "XHTML 1.0 Frameset",
            HtmlVersion::Xhtml11 => "XHTML 1.1",
            HtmlVersion::XhtmlUnknown => "XHTML (unknown version)",
            HtmlVersion::LegacyHtml => "Legacy HTML",
            HtmlVersion::Custom => "Unknown/Custom",
            HtmlVersion::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// One test applied to a doctype
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// The whole declaration equals this text
    Exactly(&'static str),
    /// The DTD name (the part after "-//W3C//DTD ") starts with this text
    DtdStartsWith(&'static str),
    /// The declaration contains this text anywhere
    Contains(&'static str),
}

// Evaluated top to bottom; order matters
const RULES: &[(Rule, HtmlVersion)] = &[
    (Rule::Exactly("html"), HtmlVersion::Html5),
    (Rule::Exactly("html system \"about:legacy-compat\""), HtmlVersion::Html5),
    (Rule::DtdStartsWith("html 4.01 transitional"), HtmlVersion::Html401Transitional),
    (Rule::DtdStartsWith("html 4.01 frameset"), HtmlVersion::Html401Frameset),
    (Rule::DtdStartsWith("html 4.01"), HtmlVersion::Html401Strict),
    (Rule::DtdStartsWith("html 4.0"), HtmlVersion::Html40),
    (Rule::DtdStartsWith("html 3.2"), HtmlVersion::Html32),
    (Rule::DtdStartsWith("html 2.0"), HtmlVersion::Html20),
    (Rule::DtdStartsWith("xhtml 1.0 strict"), HtmlVersion::Xhtml10Strict),
    (Rule::DtdStartsWith("xhtml 1.0 transitional"), HtmlVersion::Xhtml10Transitional),
    (Rule::DtdStartsWith("xhtml 1.0 frameset"), HtmlVersion::Xhtml10Frameset),
    (Rule::DtdStartsWith("xhtml 1.1"), HtmlVersion::Xhtml11),
    (Rule::Contains("xhtml"), HtmlVersion::XhtmlUnknown),
    (Rule::Contains("html"), HtmlVersion::LegacyHtml),
];

// A doctype declaration, lower-cased with whitespace collapsed
struct Doctype {
    content: String,
    dtd_name: Option<String>,
}

impl Doctype {
    fn new(raw: &str) -> Self {
        let content = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
            .replace('\'', "\"");

        // "-//W3C//DTD HTML 4.01//EN" -> "html 4.01//en"
        let dtd_name = content
            .find("//dtd ")
            .map(|start| content[start + "//dtd ".len()..].to_string());

        Self { content, dtd_name }
    }

    fn matches(&self, rule: Rule) -> bool {
        match rule {
            Rule::Exactly(text) => self.content == text,
            Rule::DtdStartsWith(prefix) => self
                .dtd_name
                .as_deref()
                .unwrap_or(&self.content)
                .starts_with(prefix),
            Rule::Contains(text) => self.content.contains(text),
        }
    }

    fn classify(&self) -> HtmlVersion {
        RULES
            .iter()
            .find(|(rule, _)| self.matches(*rule))
            .map(|(_, version)| *version)
            .unwrap_or(HtmlVersion::Custom)
    }
}

/// Detects the HTML version declared by the page's doctype
pub fn detect_html_version(markup: &str) -> HtmlVersion {
    match DOCTYPE_RE.captures(markup).and_then(|caps| caps.get(1)) {
        Some(declaration) => Doctype::new(declaration.as_str()).classify(),
        None => HtmlVersion::Unknown,
    }
}
