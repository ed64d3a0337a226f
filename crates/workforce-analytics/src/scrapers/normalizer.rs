use scraper::ElementRef;

/// Collapses every whitespace run to a single space and trims the ends.
pub fn clean_text(text: &str) -> String {
    let cleaned = text.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned text content of an element and its descendants; missing elements
/// produce an empty string.
pub fn clean_element_text(element: Option<ElementRef<'_>>) -> String {
    match element {
        Some(element) => clean_text(&element.text().collect::<String>()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn clean_text_collapses_internal_whitespace() {
        assert_eq!(
            clean_text("  Senior \n\t Data   Engineer  "),
            "Senior Data Engineer"
        );
    }

    #[test]
    fn clean_text_handles_empty_and_blank_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n\t "), "");
    }

    #[test]
    fn clean_text_drops_zero_width_characters() {
        assert_eq!(clean_text("\u{feff}Remote\u{200b} - US"), "Remote - US");
    }

    #[test]
    fn element_text_joins_nested_nodes() {
        let fragment = Html::parse_fragment(
            "<h2>Platform <span>Engineer</span>\n <em>II</em></h2>",
        );
        let selector = Selector::parse("h2").expect("selector");
        let heading = fragment.select(&selector).next();
        assert_eq!(clean_element_text(heading), "Platform Engineer II");
    }

    #[test]
    fn missing_element_is_empty() {
        assert_eq!(clean_element_text(None), "");
    }
}
