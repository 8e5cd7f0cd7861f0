//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for listing and profile pages. Defaults match
//! the dogcat.com.ua markup.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Listing page selectors
    pub listing: ListingSelectors,

    /// Profile page selectors
    pub profile: ProfileSelectors,
}

/// CSS selectors for listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One element per animal card
    pub card: String,

    /// Button whose attribute embeds the pet id
    pub pet_id_button: String,

    /// Attribute of `pet_id_button` holding the call string
    pub pet_id_attribute: String,

    /// Regex with one capture group for the pet id
    pub pet_id_pattern: String,

    /// Profile link (`href`)
    pub link: String,

    pub name: String,

    /// "sex, age" text
    pub sex_age: String,

    /// Photo element (`data-src`)
    pub photo: String,

    /// Photo URL attribute
    pub photo_attribute: String,

    /// Enabled "next page" link (`href`)
    pub next_page: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            card: "div.animalCard".to_string(),
            pet_id_button: r#"button[onclick*="setPopupData"]"#.to_string(),
            pet_id_attribute: "onclick".to_string(),
            pet_id_pattern: r"setPopupData\((\d+)".to_string(),
            link: "a.animalCard__link".to_string(),
            name: "h5".to_string(),
            sex_age: "p".to_string(),
            photo: "img.animalCard__photo".to_string(),
            photo_attribute: "data-src".to_string(),
            next_page: "a.next:not(.disabled)".to_string(),
        }
    }
}

/// CSS selectors for profile pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSelectors {
    /// Detail container; its absence means the page has no profile
    pub container: String,
    pub name: String,

    /// "age, gender" text
    pub age_gender: String,

    /// Media carousel slides, in display order
    pub slide: String,

    /// Marks a slide as a video
    pub video_block: String,
    pub video_attribute: String,

    /// Image inside a photo slide
    pub photo_image: String,
    pub photo_attribute: String,

    pub about_section: String,

    /// Skill tags, relative to `about_section`
    pub about_item: String,

    pub history_section: String,

    /// History text, relative to `history_section`
    pub history_text: String,
}

impl Default for ProfileSelectors {
    fn default() -> Self {
        Self {
            container: "div.adoptionProfilePage".to_string(),
            name: ".profile-head h3".to_string(),
            age_gender: ".profile-head .body-secondary".to_string(),
            slide: ".swiper.slider-profile .swiper-slide".to_string(),
            video_block: ".videoBlock.img".to_string(),
            video_attribute: "data-link".to_string(),
            photo_image: ".img img".to_string(),
            photo_attribute: "data-src".to_string(),
            about_section: ".profile-skills".to_string(),
            about_item: ".items .item span".to_string(),
            history_section: "div.profile-history".to_string(),
            history_text: "p.body-secondary".to_string(),
        }
    }
}
