use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::domain::JobListing;
use super::normalizer::clean_element_text;
use super::selectors::CompiledSelectors;

pub(crate) fn find_job_elements<'a>(
    document: &'a Html,
    selectors: &CompiledSelectors,
) -> Vec<ElementRef<'a>> {
    document.select(&selectors.listing).collect()
}

pub(crate) fn extract_job_details(
    element: ElementRef<'_>,
    selectors: &CompiledSelectors,
    base: Option<&Url>,
) -> JobListing {
    let field = |selector: &Selector| clean_element_text(element.select(selector).next());

    let url = element
        .select(&selectors.link)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| resolve_href(href, base));

    JobListing {
        title: field(&selectors.title),
        location: field(&selectors.location),
        department: field(&selectors.department),
        description: field(&selectors.description),
        requirements: field(&selectors.requirements),
        posting_date: field(&selectors.posting_date),
        url,
    }
}

fn resolve_href(href: &str, base: Option<&Url>) -> String {
    match base.and_then(|base| base.join(href).ok()) {
        Some(resolved) => resolved.to_string(),
        None => href.to_string(),
    }
}
