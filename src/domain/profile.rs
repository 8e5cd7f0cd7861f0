use serde::{Deserialize, Serialize};
use std::fmt;

/// A profile page to fetch, taken from one row of the listing CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTarget {
    pub pet_id: String,
    pub link: String,
}

impl ProfileTarget {
    pub fn new(pet_id: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            pet_id: pet_id.into(),
            link: link.into(),
        }
    }
}

impl fmt::Display for ProfileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (pet {})", self.link, self.pet_id)
    }
}

/// Fields extracted from a profile page's detail container.
///
/// Scalar fields are optional because every lookup is best-effort. The list
/// fields are empty rather than absent when the page has no matching items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetail {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub photos: Vec<String>,
    pub videos: Vec<String>,
    pub about: Vec<String>,
    pub history: Option<String>,
}

/// Output row of the profile fetcher, serialized as one JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub pet_id: String,
    pub link: String,
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub photos: Vec<String>,
    pub videos: Vec<String>,
    pub about: Vec<String>,
    pub history: Option<String>,
}

impl ProfileRecord {
    /// Combine the input row with the extracted detail
    pub fn from_detail(target: ProfileTarget, detail: ProfileDetail) -> Self {
        Self {
            pet_id: target.pet_id,
            link: target.link,
            name: detail.name,
            age: detail.age,
            gender: detail.gender,
            photos: detail.photos,
            videos: detail.videos,
            about: detail.about,
            history: detail.history,
        }
    }
}
