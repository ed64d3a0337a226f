use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scraper::{ElementRef, Html};
use tracing::{debug, error, info};
use url::Url;

use super::domain::JobListing;
use super::extract;
use super::fetcher::{FetchMode, PageFetcher};
use super::report::ScanReport;
use super::selectors::{CompiledSelectors, ListingSelectors, SelectorError};
use super::ScanError;

/// Common surface for careers-page scrapers.
pub trait JobBoardScraper {
    fn base_url(&self) -> &str;

    /// Fetch the board and extract every listing on it.
    fn scan(&self) -> Result<ScanReport, ScanError>;

    fn find_job_elements<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>>;

    /// `None` when the card yields nothing worth keeping.
    fn extract_job_details(&self, element: ElementRef<'_>) -> Option<JobListing>;

    /// Listings from a fresh scan. Failures produce an empty list; `scan`
    /// already logged the cause.
    fn get_job_listings(&self) -> Vec<JobListing> {
        match self.scan() {
            Ok(report) => report.listings,
            Err(err) => {
                debug!(url = self.base_url(), error = %err, "returning no listings");
                Vec::new()
            }
        }
    }
}

/// Scraper for boards laid out as one card per listing.
#[derive(Debug)]
pub struct JobListingScraper {
    base_url: String,
    base: Option<Url>,
    fetcher: Arc<dyn PageFetcher>,
    selectors: CompiledSelectors,
    fetch_mode: FetchMode,
    positions_analyzed: AtomicUsize,
}

impl JobListingScraper {
    /// Uses the default card selectors and rendered fetches.
    pub fn new(
        base_url: impl Into<String>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, ScanError> {
        Self::with_selectors(base_url, fetcher, &ListingSelectors::default())
    }

    pub fn with_selectors(
        base_url: impl Into<String>,
        fetcher: Arc<dyn PageFetcher>,
        selectors: &ListingSelectors,
    ) -> Result<Self, ScanError> {
        let base_url = base_url.into();
        let base = Url::parse(base_url.trim()).ok();
        Ok(Self {
            base_url,
            base,
            fetcher,
            selectors: selectors.compile()?,
            fetch_mode: FetchMode::default(),
            positions_analyzed: AtomicUsize::new(0),
        })
    }

    pub fn with_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    /// Total listings kept across every scan and parse on this scraper.
    pub fn positions_analyzed(&self) -> usize {
        self.positions_analyzed.load(Ordering::Relaxed)
    }

    /// Runs extraction over HTML that is already in hand.
    pub fn parse_listings(&self, html: &str) -> Vec<JobListing> {
        let document = Html::parse_document(html);
        let elements = self.find_job_elements(&document);
        debug!(cards = elements.len(), "located listing cards");

        let mut listings = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(listing) = self.extract_job_details(element) {
                listings.push(listing);
                self.positions_analyzed.fetch_add(1, Ordering::Relaxed);
            }
        }

        listings
    }
}

/// One-off extraction from HTML already in hand, with no fetcher or counter.
pub fn parse_listings(
    html: &str,
    base_url: &str,
    selectors: &ListingSelectors,
) -> Result<Vec<JobListing>, SelectorError> {
    let compiled = selectors.compile()?;
    let base = Url::parse(base_url.trim()).ok();
    let document = Html::parse_document(html);

    Ok(extract::find_job_elements(&document, &compiled)
        .into_iter()
        .map(|element| extract::extract_job_details(element, &compiled, base.as_ref()))
        .filter(|listing| !listing.is_empty())
        .collect())
}

impl JobBoardScraper for JobListingScraper {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn scan(&self) -> Result<ScanReport, ScanError> {
        info!(url = %self.base_url, mode = ?self.fetch_mode, "starting job scan");

        let html = self
            .fetcher
            .fetch(&self.base_url, self.fetch_mode)
            .map_err(|err| {
                error!(url = %self.base_url, error = %err, "error fetching careers page");
                err
            })?;

        let listings = self.parse_listings(&html);
        info!(
            url = %self.base_url,
            found = listings.len(),
            positions_analyzed = self.positions_analyzed(),
            "job scan complete"
        );

        Ok(ScanReport::new(self.base_url.clone(), listings))
    }

    fn find_job_elements<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        extract::find_job_elements(document, &self.selectors)
    }

    fn extract_job_details(&self, element: ElementRef<'_>) -> Option<JobListing> {
        let listing = extract::extract_job_details(element, &self.selectors, self.base.as_ref());
        if listing.is_empty() {
            debug!("skipping listing card without content");
            None
        } else {
            Some(listing)
        }
    }
}
