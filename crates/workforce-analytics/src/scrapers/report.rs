use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::domain::JobListing;

const UNSPECIFIED: &str = "Unspecified";

/// Outcome of one pass over a careers page.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub source_url: String,
    pub scanned_at: DateTime<Utc>,
    pub listings: Vec<JobListing>,
    pub summary: ScanSummary,
}

impl ScanReport {
    pub fn new(source_url: impl Into<String>, listings: Vec<JobListing>) -> Self {
        let summary = ScanSummary::from_listings(&listings);
        Self {
            source_url: source_url.into(),
            scanned_at: Utc::now(),
            listings,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total_listings: usize,
    pub departments: Vec<CountEntry>,
    pub locations: Vec<CountEntry>,
    pub missing_title: usize,
    pub missing_url: usize,
}

impl ScanSummary {
    pub fn from_listings(listings: &[JobListing]) -> Self {
        Self {
            total_listings: listings.len(),
            departments: tally(listings.iter().map(|listing| listing.department.as_str())),
            locations: tally(listings.iter().map(|listing| listing.location.as_str())),
            missing_title: listings
                .iter()
                .filter(|listing| listing.title.is_empty())
                .count(),
            missing_url: listings
                .iter()
                .filter(|listing| listing.url.is_none())
                .count(),
        }
    }
}

/// Highest count first; ties ordered by label.
fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CountEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        let label = if label.is_empty() { UNSPECIFIED } else { label };
        *counts.entry(label).or_default() += 1;
    }

    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(label, count)| CountEntry {
            label: label.to_string(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, department: &str, location: &str, url: Option<&str>) -> JobListing {
        JobListing {
            title: title.to_string(),
            department: department.to_string(),
            location: location.to_string(),
            url: url.map(str::to_string),
            ..JobListing::default()
        }
    }

    #[test]
    fn summary_counts_departments_and_locations() {
        let listings = vec![
            listing("Engineer", "Engineering", "Remote", Some("/1")),
            listing("Designer", "Design", "Berlin", Some("/2")),
            listing("SRE", "Engineering", "Remote", None),
            listing("", "", "Remote", None),
        ];

        let summary = ScanSummary::from_listings(&listings);
        assert_eq!(summary.total_listings, 4);
        assert_eq!(
            summary.departments,
            vec![
                CountEntry {
                    label: "Engineering".to_string(),
                    count: 2
                },
                CountEntry {
                    label: "Design".to_string(),
                    count: 1
                },
                CountEntry {
                    label: "Unspecified".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(summary.locations[0].label, "Remote");
        assert_eq!(summary.locations[0].count, 3);
        assert_eq!(summary.missing_title, 1);
        assert_eq!(summary.missing_url, 2);
    }

    #[test]
    fn empty_scan_has_empty_summary() {
        let report = ScanReport::new("https://careers.example.com", Vec::new());
        assert_eq!(report.summary, ScanSummary::default());
    }
}
