use std::collections::BTreeSet;
use std::str::FromStr;

use crate::extract::DEFAULT_MIN_FILLED_FIELDS;
use crate::model::FieldLabel;

/// Guide pages to read, 1-based, as given to `--pages` (`"3-10,14"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn parse_page(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("guide pages start at 1".to_string()),
        Ok(page) => Ok(page),
        Err(_) => Err(format!("'{}' is not a guide page number", raw.trim())),
    }
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match token.split_once('-') {
                Some((first, last)) => {
                    let (first, last) = (parse_page(first)?, parse_page(last)?);
                    if last < first {
                        return Err(format!("page range '{token}' runs backwards"));
                    }
                    pages.extend(first..=last);
                }
                None => {
                    pages.insert(parse_page(token)?);
                }
            }
        }

        if pages.is_empty() {
            return Err("no guide pages selected".to_string());
        }
        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub pages: Option<PageSelection>,
    pub delimiter: u8,
    /// Header lines to discard on top of the built-in guide boilerplate.
    pub extra_boilerplate: Vec<String>,
    pub min_filled_fields: usize,
}

impl ExtractOptions {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(1..=FieldLabel::ALL.len()).contains(&self.min_filled_fields) {
            return Err(format!(
                "min_filled_fields must be within 1..={}",
                FieldLabel::ALL.len()
            ));
        }
        if !self.delimiter.is_ascii() || self.delimiter == b'"' || self.delimiter == b'\n' {
            return Err("delimiter must be an ASCII character other than quote or newline".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: None,
            delimiter: b',',
            extra_boilerplate: Vec::new(),
            min_filled_fields: DEFAULT_MIN_FILLED_FIELDS,
        }
    }
}
