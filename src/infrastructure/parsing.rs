//! HTML parsing for listing and profile pages
//!
//! Parsers compile their selectors once from [`ParsingConfig`] and are then
//! shared read-only. Every field lookup is best-effort: a missing element
//! yields `None`, never an error.

pub mod config;
pub mod error;
pub mod listing_parser;
pub mod profile_parser;

pub use config::{ListingSelectors, ParsingConfig, ProfileSelectors};
pub use error::{ParsingError, ParsingResult};
pub use listing_parser::{ListingCard, ListingPage, ListingPageParser};
pub use profile_parser::ProfilePageParser;

use scraper::{ElementRef, Html, Selector};

/// Parser that needs per-page context, such as the URL relative links
/// resolve against
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse an already-built document
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;
}

/// Compile one configured selector
pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// All descendant text concatenated, then trimmed
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Each text node trimmed, then concatenated
pub(crate) fn stripped_text(element: &ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// First match of `selector` under `element`
pub(crate) fn select_first<'a>(element: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Non-empty attribute value of the first match of `selector`
pub(crate) fn select_attr(element: &ElementRef<'_>, selector: &Selector, attribute: &str) -> Option<String> {
    select_first(element, selector)
        .and_then(|e| e.value().attr(attribute))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
