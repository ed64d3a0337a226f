//! Job listing collection from public careers pages.
//!
//! A [`JobListingScraper`] pulls a board through a [`PageFetcher`], finds the
//! listing cards described by [`ListingSelectors`], and turns each card into a
//! [`JobListing`]. Scans are summarized in a [`ScanReport`].

pub mod domain;
pub mod export;
mod extract;
pub mod fetcher;
pub mod job_scanner;
pub mod normalizer;
pub mod report;
pub mod selectors;

pub use domain::JobListing;
pub use export::{write_csv, ExportError};
pub use fetcher::{FetchError, FetchMode, HttpPageFetcher, PageFetcher};
pub use job_scanner::{parse_listings, JobBoardScraper, JobListingScraper};
pub use normalizer::clean_text;
pub use report::{CountEntry, ScanReport, ScanSummary};
pub use selectors::{ListingSelectors, SelectorError};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
}
