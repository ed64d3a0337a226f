use scraper::Selector;
use serde::{Deserialize, Serialize};

/// CSS selectors describing where a careers page keeps its listing cards and
/// the fields inside each card. Defaults cover the common `job-listing`,
/// `job-card` and `job-posting` layouts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    pub listing: String,
    pub title: String,
    pub location: String,
    pub department: String,
    pub description: String,
    pub requirements: String,
    pub posting_date: String,
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            listing: "div.job-listing, div.job-card, div.job-posting".to_string(),
            title: "h2".to_string(),
            location: ".location".to_string(),
            department: ".department".to_string(),
            description: ".description".to_string(),
            requirements: ".requirements".to_string(),
            posting_date: ".date".to_string(),
            link: "a".to_string(),
        }
    }
}

impl ListingSelectors {
    pub fn compile(&self) -> Result<CompiledSelectors, SelectorError> {
        Ok(CompiledSelectors {
            listing: parse("listing", &self.listing)?,
            title: parse("title", &self.title)?,
            location: parse("location", &self.location)?,
            department: parse("department", &self.department)?,
            description: parse("description", &self.description)?,
            requirements: parse("requirements", &self.requirements)?,
            posting_date: parse("posting_date", &self.posting_date)?,
            link: parse("link", &self.link)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub(crate) listing: Selector,
    pub(crate) title: Selector,
    pub(crate) location: Selector,
    pub(crate) department: Selector,
    pub(crate) description: Selector,
    pub(crate) requirements: Selector,
    pub(crate) posting_date: Selector,
    pub(crate) link: Selector,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid `{field}` selector '{selector}': {reason}")]
pub struct SelectorError {
    pub field: &'static str,
    pub selector: String,
    pub reason: String,
}

fn parse(field: &'static str, selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|err| SelectorError {
        field,
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}
