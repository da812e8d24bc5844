use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Text of one source page, newline-normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// The five attribute labels recognised on an entry page, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldLabel {
    Exposicao,
    Rega,
    Ambiente,
    Poda,
    Adubo,
}

impl FieldLabel {
    pub const ALL: [Self; 5] = [
        Self::Exposicao,
        Self::Rega,
        Self::Ambiente,
        Self::Poda,
        Self::Adubo,
    ];

    /// Label as printed in the guide, without the trailing colon.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exposicao => "Exposição ao Sol",
            Self::Rega => "Rega",
            Self::Ambiente => "Ambiente",
            Self::Poda => "Poda",
            Self::Adubo => "Adubo",
        }
    }

    /// Column name used in the output table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Exposicao => "exposicao",
            Self::Rega => "rega",
            Self::Ambiente => "ambiente",
            Self::Poda => "poda",
            Self::Adubo => "adubo",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Exposicao => 0,
            Self::Rega => 1,
            Self::Ambiente => 2,
            Self::Poda => 3,
            Self::Adubo => 4,
        }
    }
}

impl Display for FieldLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Captured values, one slot per [`FieldLabel`].
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldValues([String; 5]);

impl FieldValues {
    #[must_use]
    pub fn get(&self, label: FieldLabel) -> &str {
        &self.0[label.index()]
    }

    pub fn set(&mut self, label: FieldLabel, value: impl Into<String>) {
        self.0[label.index()] = value.into();
    }

    #[must_use]
    pub fn with(mut self, label: FieldLabel, value: impl Into<String>) -> Self {
        self.set(label, value);
        self
    }

    /// Number of non-empty values (0..=5).
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.0.iter().filter(|value| !value.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldLabel, &str)> {
        FieldLabel::ALL
            .into_iter()
            .map(move |label| (label, self.get(label)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantRecord {
    pub name: String,
    pub fields: FieldValues,
}

impl PlantRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, fields: FieldValues) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Identity used when merging duplicates: trimmed, lowercased name.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    #[must_use]
    pub fn completeness(&self) -> usize {
        self.fields.filled_count()
    }

    #[must_use]
    pub fn field(&self, label: FieldLabel) -> &str {
        self.fields.get(label)
    }
}

/// Final output: one record per dedup key, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantTable {
    records: Vec<PlantRecord>,
}

impl PlantTable {
    pub const HEADERS: [&'static str; 6] =
        ["planta", "exposicao", "rega", "ambiente", "poda", "adubo"];

    pub(crate) fn from_records(records: Vec<PlantRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[PlantRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<PlantRecord> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlantRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a PlantTable {
    type Item = &'a PlantRecord;
    type IntoIter = std::slice::Iter<'a, PlantRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Flat row shape of the persisted table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRow {
    pub planta: String,
    #[serde(default)]
    pub exposicao: String,
    #[serde(default)]
    pub rega: String,
    #[serde(default)]
    pub ambiente: String,
    #[serde(default)]
    pub poda: String,
    #[serde(default)]
    pub adubo: String,
}

impl From<&PlantRecord> for PlantRow {
    fn from(record: &PlantRecord) -> Self {
        Self {
            planta: record.name.clone(),
            exposicao: record.field(FieldLabel::Exposicao).to_string(),
            rega: record.field(FieldLabel::Rega).to_string(),
            ambiente: record.field(FieldLabel::Ambiente).to_string(),
            poda: record.field(FieldLabel::Poda).to_string(),
            adubo: record.field(FieldLabel::Adubo).to_string(),
        }
    }
}

impl From<PlantRow> for PlantRecord {
    fn from(row: PlantRow) -> Self {
        let fields = FieldValues::default()
            .with(FieldLabel::Exposicao, row.exposicao)
            .with(FieldLabel::Rega, row.rega)
            .with(FieldLabel::Ambiente, row.ambiente)
            .with(FieldLabel::Poda, row.poda)
            .with(FieldLabel::Adubo, row.adubo);
        Self::new(row.planta, fields)
    }
}
