use tracing::debug;

use crate::field::FieldCapturer;
use crate::model::{FieldLabel, PlantRecord};
use crate::name::{Boilerplate, NameRecovery, normalize_plant_name};

pub const DEFAULT_MIN_FILLED_FIELDS: usize = 2;

/// Shortest plant name the completeness gate accepts, in chars.
pub const MIN_NAME_CHARS: usize = 3;

/// What a single page turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Record(PlantRecord),
    /// Blank page.
    Empty,
    /// No `Exposição ao Sol:` marker: cover, divider, index...
    NonEntry,
    /// Marker found but the name or field gate failed.
    Incomplete { name: String, filled: usize },
}

impl PageOutcome {
    #[must_use]
    pub fn into_record(self) -> Option<PlantRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// Turns one page of text into at most one [`PlantRecord`].
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    capturer: FieldCapturer,
    boilerplate: Boilerplate,
    recovery: NameRecovery,
    min_filled_fields: usize,
}

impl RecordExtractor {
    #[must_use]
    pub fn new(boilerplate: Boilerplate) -> Self {
        Self {
            capturer: FieldCapturer::new(),
            boilerplate,
            recovery: NameRecovery::default(),
            min_filled_fields: DEFAULT_MIN_FILLED_FIELDS,
        }
    }

    #[must_use]
    pub fn with_name_recovery(mut self, recovery: NameRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    #[must_use]
    pub fn with_min_filled_fields(mut self, min_filled_fields: usize) -> Self {
        self.min_filled_fields = min_filled_fields;
        self
    }

    #[must_use]
    pub fn extract(&self, text: &str) -> Option<PlantRecord> {
        self.inspect(text).into_record()
    }

    #[must_use]
    pub fn inspect(&self, text: &str) -> PageOutcome {
        if text.trim().is_empty() {
            return PageOutcome::Empty;
        }

        let Some(marker) = self.capturer.find_label(FieldLabel::Exposicao, text) else {
            return PageOutcome::NonEntry;
        };

        let name = self.recover_name(&text[..marker]);
        let fields = self.capturer.capture_all(text);
        let filled = fields.filled_count();

        if name.is_empty()
            || name.chars().count() < MIN_NAME_CHARS
            || filled < self.min_filled_fields
        {
            debug!(%name, filled, "entry rejected by completeness gate");
            return PageOutcome::Incomplete { name, filled };
        }

        debug!(%name, filled, "entry accepted");
        PageOutcome::Record(PlantRecord::new(name, fields))
    }

    /// Plant name from the text above the first field label.
    #[must_use]
    pub fn recover_name(&self, header: &str) -> String {
        let lines = self.boilerplate.header_lines(header);
        normalize_plant_name(&self.recovery.recover(&lines))
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new(Boilerplate::default())
    }
}
