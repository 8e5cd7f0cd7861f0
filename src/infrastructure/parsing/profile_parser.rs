//! Profile page parser
//!
//! Pulls the detail fields out of an adoption profile page. A page without
//! the detail container yields `None`.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{
    ContextualParser, ParsingResult, ProfileSelectors, compile_selector, element_text, select_attr,
    select_first,
};
use crate::domain::ProfileDetail;

/// Split "age, gender" on the first comma into two optional parts
pub fn split_age_gender(text: &str) -> (Option<String>, Option<String>) {
    fn part(value: &str) -> Option<String> {
        Some(value.trim().to_string()).filter(|v| !v.is_empty())
    }

    match text.split_once(',') {
        Some((age, gender)) => (part(age), part(gender)),
        None => (part(text), None),
    }
}

/// Trim, then delete every line break character
pub fn normalize_history(raw: &str) -> String {
    raw.trim().chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

/// Parser for profile pages
pub struct ProfilePageParser {
    container: Selector,
    name: Selector,
    age_gender: Selector,
    slide: Selector,
    video_block: Selector,
    video_attribute: String,
    photo_image: Selector,
    photo_attribute: String,
    about_section: Selector,
    about_item: Selector,
    history_section: Selector,
    history_text: Selector,
}

impl ProfilePageParser {
    /// Create a parser with the default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ProfileSelectors::default())
    }

    /// Create a parser with custom selector configuration
    pub fn with_config(selectors: &ProfileSelectors) -> ParsingResult<Self> {
        Ok(Self {
            container: compile_selector(&selectors.container)?,
            name: compile_selector(&selectors.name)?,
            age_gender: compile_selector(&selectors.age_gender)?,
            slide: compile_selector(&selectors.slide)?,
            video_block: compile_selector(&selectors.video_block)?,
            video_attribute: selectors.video_attribute.clone(),
            photo_image: compile_selector(&selectors.photo_image)?,
            photo_attribute: selectors.photo_attribute.clone(),
            about_section: compile_selector(&selectors.about_section)?,
            about_item: compile_selector(&selectors.about_item)?,
            history_section: compile_selector(&selectors.history_section)?,
            history_text: compile_selector(&selectors.history_text)?,
        })
    }

    /// Extract the profile from raw HTML
    pub fn extract(&self, html: &str) -> Option<ProfileDetail> {
        let document = Html::parse_document(html);
        self.parse_with_context(&document, &())
    }

    /// Photos and videos in slide order. A slide with a video block is a
    /// video even when its link attribute is missing.
    fn extract_media(&self, profile: &ElementRef<'_>) -> (Vec<String>, Vec<String>) {
        let mut photos = Vec::new();
        let mut videos = Vec::new();

        for slide in profile.select(&self.slide) {
            if let Some(video) = select_first(&slide, &self.video_block) {
                if let Some(link) = video.value().attr(&self.video_attribute).filter(|l| !l.is_empty()) {
                    videos.push(link.to_string());
                }
            } else if let Some(url) = select_attr(&slide, &self.photo_image, &self.photo_attribute) {
                photos.push(url);
            }
        }

        (photos, videos)
    }

    fn extract_about(&self, profile: &ElementRef<'_>) -> Vec<String> {
        select_first(profile, &self.about_section)
            .map(|section| {
                section
                    .select(&self.about_item)
                    .map(|item| element_text(&item))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn extract_history(&self, profile: &ElementRef<'_>) -> Option<String> {
        let section = select_first(profile, &self.history_section)?;
        let paragraph = select_first(&section, &self.history_text)?;
        let raw: String = paragraph.text().collect::<Vec<_>>().join("\n");
        Some(normalize_history(&raw))
    }
}

impl ContextualParser for ProfilePageParser {
    type Output = Option<ProfileDetail>;
    type Context = ();

    fn parse_with_context(&self, html: &Html, _context: &()) -> Option<ProfileDetail> {
        let Some(profile) = html.select(&self.container).next() else {
            debug!("Detail container not found");
            return None;
        };

        let name = select_first(&profile, &self.name)
            .map(|e| element_text(&e))
            .filter(|n| !n.is_empty());

        let (age, gender) = select_first(&profile, &self.age_gender)
            .map(|e| split_age_gender(&element_text(&e)))
            .unwrap_or((None, None));

        let (photos, videos) = self.extract_media(&profile);

        Some(ProfileDetail {
            name,
            age,
            gender,
            photos,
            videos,
            about: self.extract_about(&profile),
            history: self.extract_history(&profile),
        })
    }
}
