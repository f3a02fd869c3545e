// src/analyzer/document.rs
// =============================================================================
// A thin layer over the `scraper` crate.
//
// scraper parses HTML into a DOM and lets us query it with CSS selectors.
// This module adds the few queries the analyzer needs on top of that:
// - the page title
// - how many headings of each level there are
// - a "find the first element that satisfies X" search
//
// Selectors are compiled with `?` instead of unwrap(), so a bad selector
// becomes an AnalyzeError::Parse rather than a panic.
// =============================================================================

use crate::error::{AnalyzeError, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

/// Heading levels we count, in report order
pub const HEADING_LEVELS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

// Compiles a CSS selector
pub fn css(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| AnalyzeError::Parse(format!("invalid selector '{}': {:?}", selector, e)))
}

// All text inside an element, concatenated
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// A parsed HTML page
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Every element matching `selector`, in document order
    pub fn find(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = css(selector)?;
        Ok(self.html.select(&selector).collect())
    }

    /// The first element matching `selector` for which `predicate` holds
    ///
    /// Stops walking the document as soon as a match is found.
    pub fn find_first<F>(&self, selector: &str, mut predicate: F) -> Result<Option<ElementRef<'_>>>
    where
        F: FnMut(&ElementRef<'_>) -> Result<bool>,
    {
        let selector = css(selector)?;
        for element in self.html.select(&selector) {
            if predicate(&element)? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// Text of the first <title>, trimmed; empty when there is none
    pub fn title(&self) -> Result<String> {
        let selector = css("title")?;
        Ok(self
            .html
            .select(&selector)
            .next()
            .map(|title| element_text(&title).trim().to_string())
            .unwrap_or_default())
    }

    /// Count of each heading level, keyed "H1".."H6"
    ///
    /// All six keys are always present.
    pub fn heading_counts(&self) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for level in HEADING_LEVELS {
            let selector = css(level)?;
            counts.insert(level.to_uppercase(), self.html.select(&selector).count());
        }
        Ok(counts)
    }
}
