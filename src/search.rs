use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::{FieldLabel, PlantRecord, PlantTable};

/// Number of leading query characters used for the prefix fallback.
const PREFIX_FALLBACK_CHARS: usize = 3;

/// Accent-insensitive comparison key: NFD, drop combining marks, lowercase,
/// trim. Unrelated to the dedup key used during assembly.
///
/// Every mark category (Mn, Mc, Me) is dropped. Portuguese diacritics all
/// decompose to nonspacing marks, so guide text matches a Mn-only filter.
#[must_use]
pub fn search_key(value: &str) -> String {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Substring filter over one attribute; an empty needle list accepts all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    pub label: FieldLabel,
    needles: Vec<String>,
}

impl AttributeFilter {
    #[must_use]
    pub fn new<I, S>(label: FieldLabel, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label,
            needles: needles
                .into_iter()
                .map(|needle| search_key(needle.as_ref()))
                .collect(),
        }
    }

    #[must_use]
    pub fn accepts(&self, record: &PlantRecord) -> bool {
        if self.needles.is_empty() {
            return true;
        }
        let value = search_key(record.field(self.label));
        self.needles.iter().any(|needle| value.contains(needle.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub filters: Vec<AttributeFilter>,
}

impl SearchQuery {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: AttributeFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Records matching the name query (substring, falling back to a prefix of
/// the query when nothing matches) and every attribute filter.
#[must_use]
pub fn search<'a>(table: &'a PlantTable, query: &SearchQuery) -> Vec<&'a PlantRecord> {
    let by_name = match query.text.as_deref().map(search_key) {
        Some(key) if !key.is_empty() => match_name(table, &key),
        _ => table.iter().collect(),
    };

    by_name
        .into_iter()
        .filter(|record| query.filters.iter().all(|filter| filter.accepts(record)))
        .collect()
}

fn match_name<'a>(table: &'a PlantTable, key: &str) -> Vec<&'a PlantRecord> {
    let contains = table
        .iter()
        .filter(|record| search_key(&record.name).contains(key))
        .collect::<Vec<_>>();
    if !contains.is_empty() {
        return contains;
    }

    let prefix = key.chars().take(PREFIX_FALLBACK_CHARS).collect::<String>();
    table
        .iter()
        .filter(|record| search_key(&record.name).starts_with(&prefix))
        .collect()
}

/// Sorted distinct non-empty values of one attribute, e.g. for filter menus.
#[must_use]
pub fn distinct_values(table: &PlantTable, label: FieldLabel) -> Vec<String> {
    table
        .iter()
        .map(|record| record.field(label))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
