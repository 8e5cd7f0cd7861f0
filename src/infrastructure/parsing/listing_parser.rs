//! Listing page parser
//!
//! Extracts animal cards and the "next page" link from one listing page.
//! Card fields are looked up independently; the presence check happens in
//! [`ListingCard::into_record`].

#![allow(clippy::uninlined_format_args)]

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use super::{
    ContextualParser, ListingSelectors, ParsingError, ParsingResult, compile_selector, select_attr,
    select_first, stripped_text,
};
use crate::domain::ListingRecord;

/// Best-effort extraction of one card; any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCard {
    pub pet_id: Option<String>,
    pub link: Option<String>,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<String>,
    pub photo_url: Option<String>,
}

impl ListingCard {
    /// Presence check: every field must be present and non-empty
    pub fn into_record(self) -> ParsingResult<ListingRecord> {
        fn required(value: Option<String>, field: &'static str) -> ParsingResult<String> {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ParsingError::required_field_missing(field))
        }

        Ok(ListingRecord {
            pet_id: required(self.pet_id, "pet_id")?,
            link: required(self.link, "link")?,
            name: required(self.name, "name")?,
            sex: required(self.sex, "sex")?,
            age: required(self.age, "age")?,
            photo_url: required(self.photo_url, "photo_url")?,
        })
    }
}

impl fmt::Display for ListingCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(value: Option<&String>) -> &str {
            value.map_or("None", String::as_str)
        }
        write!(
            f,
            "pet_id={}, link={}, name={}, sex={}, age={}, photo_url={}",
            show(self.pet_id.as_ref()),
            show(self.link.as_ref()),
            show(self.name.as_ref()),
            show(self.sex.as_ref()),
            show(self.age.as_ref()),
            show(self.photo_url.as_ref()),
        )
    }
}

/// Everything extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Cards in page order
    pub cards: Vec<ListingCard>,

    /// Absolute URL of the next page, if an enabled next link exists
    pub next_page: Option<String>,
}

/// Split "sex, age" on the first comma. Without a comma the whole text is
/// the sex and the age is empty.
pub fn split_sex_age(text: &str) -> (String, String) {
    match text.split_once(',') {
        Some((sex, age)) => (sex.trim().to_string(), age.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

/// Resolve `href` against the page it was found on. Absolute hrefs are
/// returned unchanged.
pub fn resolve_href(href: &str, page_url: &Url) -> ParsingResult<String> {
    page_url
        .join(href)
        .map(String::from)
        .map_err(|e| ParsingError::UrlResolutionFailed {
            url: href.to_string(),
            reason: e.to_string(),
        })
}

/// Parser for listing pages
pub struct ListingPageParser {
    card: Selector,
    pet_id_button: Selector,
    pet_id_attribute: String,
    pet_id_pattern: Regex,
    link: Selector,
    name: Selector,
    sex_age: Selector,
    photo: Selector,
    photo_attribute: String,
    next_page: Selector,
}

impl ListingPageParser {
    /// Create a parser with the default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create a parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        let pet_id_pattern =
            Regex::new(&selectors.pet_id_pattern).map_err(|e| ParsingError::InvalidPattern {
                pattern: selectors.pet_id_pattern.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            card: compile_selector(&selectors.card)?,
            pet_id_button: compile_selector(&selectors.pet_id_button)?,
            pet_id_attribute: selectors.pet_id_attribute.clone(),
            pet_id_pattern,
            link: compile_selector(&selectors.link)?,
            name: compile_selector(&selectors.name)?,
            sex_age: compile_selector(&selectors.sex_age)?,
            photo: compile_selector(&selectors.photo)?,
            photo_attribute: selectors.photo_attribute.clone(),
            next_page: compile_selector(&selectors.next_page)?,
        })
    }

    /// Parse raw HTML fetched from `page_url`
    pub fn parse_page(&self, html: &str, page_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);
        self.parse_with_context(&document, page_url)
    }

    /// First digit run after the marker in the button's call string
    pub fn extract_pet_id(&self, call: &str) -> Option<String> {
        self.pet_id_pattern
            .captures(call)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn extract_card(&self, card: &ElementRef<'_>, page_url: &Url) -> ListingCard {
        let pet_id = select_first(card, &self.pet_id_button)
            .and_then(|button| button.value().attr(&self.pet_id_attribute))
            .and_then(|call| self.extract_pet_id(call));

        let link = select_attr(card, &self.link, "href").and_then(|href| {
            resolve_href(&href, page_url)
                .map_err(|e| debug!("Dropping card link: {}", e))
                .ok()
        });

        let name = select_first(card, &self.name)
            .map(|e| stripped_text(&e))
            .filter(|text| !text.is_empty());

        let (sex, age) = match select_first(card, &self.sex_age) {
            Some(p) => {
                let (sex, age) = split_sex_age(&stripped_text(&p));
                (Some(sex), Some(age))
            }
            None => (None, None),
        };

        let photo_url = select_attr(card, &self.photo, &self.photo_attribute);

        ListingCard {
            pet_id,
            link,
            name,
            sex: sex.filter(|s| !s.is_empty()),
            age: age.filter(|a| !a.is_empty()),
            photo_url,
        }
    }

    fn extract_next_page(&self, html: &Html, page_url: &Url) -> Option<String> {
        let root = html.root_element();
        let href = select_attr(&root, &self.next_page, "href")?;
        match resolve_href(&href, page_url) {
            Ok(next) => Some(next),
            Err(e) => {
                warn!("Ignoring unusable next page link: {}", e);
                None
            }
        }
    }
}

impl ContextualParser for ListingPageParser {
    type Output = ListingPage;
    type Context = Url;

    fn parse_with_context(&self, html: &Html, page_url: &Url) -> ListingPage {
        let cards: Vec<ListingCard> = html
            .select(&self.card)
            .map(|card| self.extract_card(&card, page_url))
            .collect();

        debug!("Found {} cards on {}", cards.len(), page_url);

        ListingPage {
            cards,
            next_page: self.extract_next_page(html, page_url),
        }
    }
}
