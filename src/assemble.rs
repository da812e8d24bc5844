use std::collections::HashMap;

use tracing::debug;

use crate::model::{PlantRecord, PlantTable};
use crate::name::normalize_plant_name;

/// Result of offering one record to the [`Assembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    /// Replaced a stored record with a lower completeness score.
    Replaced { previous_score: usize },
    /// Kept the stored record; the new one was not strictly more complete.
    Discarded { kept_score: usize },
}

/// Order-sensitive fold from records to a [`PlantTable`].
///
/// Records are offered in page order. For each dedup key the first record is
/// kept unless a later one has strictly more non-empty fields.
#[derive(Debug, Default)]
pub struct Assembler {
    slots: Vec<PlantRecord>,
    by_key: HashMap<String, usize>,
}

impl Assembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PlantRecord) -> MergeOutcome {
        let key = record.dedup_key();
        let Some(slot) = self.by_key.get(&key).copied() else {
            self.by_key.insert(key, self.slots.len());
            self.slots.push(record);
            return MergeOutcome::Inserted;
        };

        let stored = &mut self.slots[slot];
        let previous_score = stored.completeness();
        if record.completeness() > previous_score {
            debug!(%key, previous_score, score = record.completeness(), "replacing duplicate entry");
            *stored = record;
            MergeOutcome::Replaced { previous_score }
        } else {
            MergeOutcome::Discarded {
                kept_score: previous_score,
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Re-cleans names and sorts by name (then by field values for a total order).
    #[must_use]
    pub fn finish(self) -> PlantTable {
        let mut records = self
            .slots
            .into_iter()
            .map(|record| PlantRecord::new(normalize_plant_name(&record.name), record.fields))
            .collect::<Vec<_>>();
        records.sort_by(|left, right| {
            left.name
                .cmp(&right.name)
                .then_with(|| left.fields.cmp(&right.fields))
        });
        PlantTable::from_records(records)
    }
}

/// Deduplicates `records` (in encounter order) and returns the sorted table.
pub fn assemble<I>(records: I) -> PlantTable
where
    I: IntoIterator<Item = PlantRecord>,
{
    let assembler = records
        .into_iter()
        .fold(Assembler::new(), |mut assembler, record| {
            assembler.push(record);
            assembler
        });
    assembler.finish()
}
