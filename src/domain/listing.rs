use serde::{Deserialize, Serialize};
use std::fmt;

/// One animal collected from a listing page.
///
/// Every field is non-empty; `link` is the deduplication key. Field order
/// matches the CSV column order `pet_id,link,name,sex,age,photo_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub pet_id: String,
    pub link: String,
    pub name: String,
    pub sex: String,
    pub age: String,
    pub photo_url: String,
}

impl fmt::Display for ListingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} ({})", self.name, self.pet_id, self.link)
    }
}
