use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::model::PageText;
use crate::options::PageSelection;

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("hardcoded blank line regex is valid"));

/// Replaces carriage returns with newlines and collapses three or more
/// consecutive newlines into a single blank line.
#[must_use]
pub fn normalize_page_text(text: &str) -> String {
    let unified = text.replace('\r', "\n");
    BLANK_RUN_RE.replace_all(&unified, "\n\n").into_owned()
}

pub(crate) fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }
    pages
}

/// Pages of a form-feed separated text dump, normalized and filtered by
/// `selection`.
pub fn pages_from_text(
    raw_text: &str,
    selection: Option<&PageSelection>,
) -> Result<Vec<PageText>, ExtractError> {
    let pages = split_text_into_pages(raw_text)
        .into_iter()
        .zip(1_u32..)
        .filter(|(_, page_number)| selection.is_none_or(|selection| selection.contains(*page_number)))
        .map(|(text, page_number)| PageText {
            page_number,
            text: normalize_page_text(&text),
        })
        .collect::<Vec<_>>();

    if pages.is_empty() {
        return Err(ExtractError::NoPagesSelected);
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{normalize_page_text, pages_from_text, split_text_into_pages};
    use crate::error::ExtractError;
    use crate::options::PageSelection;

    #[test]
    fn splits_form_feed_delimited_pages() {
        let pages = split_text_into_pages("p1\u{000C}p2\u{000C}");
        assert_eq!(pages, vec!["p1", "p2"]);
    }

    #[test]
    fn normalizes_carriage_returns_and_blank_runs() {
        assert_eq!(normalize_page_text("a\rb"), "a\nb");
        assert_eq!(normalize_page_text("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_page_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn applies_page_selection() {
        let selection = PageSelection::from_str("2").expect("selection should parse");
        let pages = pages_from_text("um\u{000C}dois\u{000C}três", Some(&selection))
            .expect("page 2 exists");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 2);
        assert_eq!(pages[0].text, "dois");
    }

    #[test]
    fn empty_selection_result_is_an_error() {
        let selection = PageSelection::from_str("9").expect("selection should parse");
        let error = pages_from_text("um", Some(&selection)).expect_err("page 9 is missing");
        assert!(matches!(error, ExtractError::NoPagesSelected));
    }
}
