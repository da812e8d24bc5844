use std::sync::LazyLock;

use regex::Regex;

use crate::model::{FieldLabel, FieldValues};

static DEFAULT_CAPTURER: LazyLock<FieldCapturer> = LazyLock::new(FieldCapturer::new);

/// Captures labelled values out of one page of text.
///
/// A value starts right after `<label>:` (first case-insensitive occurrence)
/// and runs until the next line that starts with any known label followed by
/// a colon, or until the end of the page.
#[derive(Debug, Clone)]
pub struct FieldCapturer {
    starts: [Regex; 5],
    boundary: Regex,
}

impl FieldCapturer {
    #[must_use]
    pub fn new() -> Self {
        let starts = FieldLabel::ALL.map(|label| {
            Regex::new(&format!("(?i){}:", regex::escape(label.label())))
                .expect("hardcoded field label regex is valid")
        });

        let alternation = FieldLabel::ALL
            .iter()
            .map(|label| regex::escape(label.label()))
            .collect::<Vec<_>>()
            .join("|");
        let boundary = Regex::new(&format!(r"(?i)\n(?:{alternation}):"))
            .expect("hardcoded field boundary regex is valid");

        Self { starts, boundary }
    }

    /// Byte offset of the first `<label>:` occurrence, if any.
    #[must_use]
    pub fn find_label(&self, label: FieldLabel, text: &str) -> Option<usize> {
        self.start_regex(label).find(text).map(|found| found.start())
    }

    /// Captured value for `label`, or an empty string when the label is absent
    /// or carries no text.
    #[must_use]
    pub fn capture(&self, label: FieldLabel, text: &str) -> String {
        let Some(start) = self.start_regex(label).find(text) else {
            return String::new();
        };

        let rest = &text[start.end()..];
        let end = self
            .boundary
            .find(rest)
            .map_or(rest.len(), |boundary| boundary.start());

        clean_value(&rest[..end])
    }

    /// Number of distinct labels present anywhere in `text`, and how many
    /// label occurrences start a line.
    #[must_use]
    pub fn label_presence(&self, text: &str) -> (usize, usize) {
        let present = self
            .starts
            .iter()
            .filter(|start| start.is_match(text))
            .count();
        let line_starts = self.boundary.find_iter(text).count();
        (present, line_starts)
    }

    /// Runs [`Self::capture`] for every label against the same text.
    #[must_use]
    pub fn capture_all(&self, text: &str) -> FieldValues {
        let mut values = FieldValues::default();
        for label in FieldLabel::ALL {
            values.set(label, self.capture(label, text));
        }
        values
    }

    fn start_regex(&self, label: FieldLabel) -> &Regex {
        &self.starts[label.index()]
    }
}

impl Default for FieldCapturer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "pdf")]
pub(crate) fn shared_capturer() -> &'static FieldCapturer {
    &DEFAULT_CAPTURER
}

/// Shorthand for [`FieldCapturer::capture`] with a shared capturer.
#[must_use]
pub fn capture_field(label: FieldLabel, text: &str) -> String {
    DEFAULT_CAPTURER.capture(label, text)
}

fn clean_value(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|ch| ch == ' ' || ch == '.')
        .to_string()
}
