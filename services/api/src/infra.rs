use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use workforce_analytics::error::AppError;
use workforce_analytics::scrapers::{FetchMode, JobListingScraper, ListingSelectors, PageFetcher};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) fetcher: Arc<dyn PageFetcher>,
    pub(crate) scrapers: ScraperRegistry,
}

type ScraperKey = (String, FetchMode, ListingSelectors);

/// One scraper per board, fetch mode and selector set, shared across
/// requests so `positions_analyzed` keeps accumulating.
#[derive(Default, Clone)]
pub(crate) struct ScraperRegistry {
    scrapers: Arc<Mutex<HashMap<ScraperKey, Arc<JobListingScraper>>>>,
}

impl ScraperRegistry {
    pub(crate) fn get_or_create(
        &self,
        url: &str,
        mode: FetchMode,
        selectors: &ListingSelectors,
        fetcher: &Arc<dyn PageFetcher>,
    ) -> Result<Arc<JobListingScraper>, AppError> {
        let key = (url.to_string(), mode, selectors.clone());
        let mut guard = self.scrapers.lock().expect("scraper registry mutex poisoned");
        if let Some(scraper) = guard.get(&key) {
            return Ok(scraper.clone());
        }

        let scraper = Arc::new(
            JobListingScraper::with_selectors(url, fetcher.clone(), selectors)?
                .with_fetch_mode(mode),
        );
        guard.insert(key, scraper.clone());
        Ok(scraper)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.scrapers
            .lock()
            .expect("scraper registry mutex poisoned")
            .len()
    }
}

/// Reads selector overrides from a JSON file; fields left out keep their
/// defaults.
pub(crate) fn load_selectors(path: Option<&Path>) -> Result<ListingSelectors, AppError> {
    let Some(path) = path else {
        return Ok(ListingSelectors::default());
    };

    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::Input(format!(
            "selectors file {} is not valid JSON: {err}",
            path.display()
        ))
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("temp file");
        file.write_all(contents.as_bytes()).expect("temp write");
        path
    }

    #[test]
    fn registry_reuses_scraper_per_board_mode_and_selectors() {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(test_support::CannedFetcher::default());
        let registry = ScraperRegistry::default();
        let defaults = ListingSelectors::default();

        let first = registry
            .get_or_create("https://a.example.com", FetchMode::Static, &defaults, &fetcher)
            .expect("scraper");
        let again = registry
            .get_or_create("https://a.example.com", FetchMode::Static, &defaults, &fetcher)
            .expect("scraper");
        assert!(Arc::ptr_eq(&first, &again));

        registry
            .get_or_create("https://a.example.com", FetchMode::Rendered, &defaults, &fetcher)
            .expect("scraper");
        let custom = ListingSelectors {
            listing: "article.role".to_string(),
            ..ListingSelectors::default()
        };
        registry
            .get_or_create("https://a.example.com", FetchMode::Static, &custom, &fetcher)
            .expect("scraper");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn registry_does_not_keep_scrapers_with_broken_selectors() {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(test_support::CannedFetcher::default());
        let registry = ScraperRegistry::default();
        let broken = ListingSelectors {
            title: "h2[".to_string(),
            ..ListingSelectors::default()
        };

        let err = registry
            .get_or_create("https://a.example.com", FetchMode::Static, &broken, &fetcher)
            .expect_err("invalid selector");
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn missing_path_uses_default_selectors() {
        let selectors = load_selectors(None).expect("defaults");
        assert_eq!(selectors, ListingSelectors::default());
    }

    #[test]
    fn selector_file_overrides_listed_fields() {
        let path = temp_file("selectors.json", r#"{ "listing": "article.role" }"#);
        let selectors = load_selectors(Some(path.as_path())).expect("selectors load");
        std::fs::remove_file(&path).ok();
        assert_eq!(selectors.listing, "article.role");
        assert_eq!(selectors.title, "h2");
    }

    #[test]
    fn malformed_selector_file_is_an_input_error() {
        let path = temp_file("broken-selectors.json", "{ listing: ");
        let err = load_selectors(Some(path.as_path())).expect_err("rejected");
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, AppError::Input(_)));
    }

    #[test]
    fn unreadable_selector_file_is_an_io_error() {
        let err = load_selectors(Some(Path::new("./no-such-selectors.json")))
            .expect_err("missing file");
        assert!(matches!(err, AppError::Io(_)));
    }
}
