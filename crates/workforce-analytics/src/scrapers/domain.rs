use serde::{Deserialize, Serialize};

/// Structured details pulled from one listing card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub location: String,
    pub department: String,
    pub description: String,
    pub requirements: String,
    pub posting_date: String,
    pub url: Option<String>,
}

impl JobListing {
    /// True when the card produced no text and no link.
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && [
                &self.title,
                &self.location,
                &self.department,
                &self.description,
                &self.requirements,
                &self.posting_date,
            ]
            .iter()
            .all(|field| field.is_empty())
    }
}
