pub mod assemble;
pub mod csv_out;
mod error;
pub mod extract;
pub mod field;
pub mod model;
pub mod name;
mod options;
pub mod page_text;
pub mod pdf_reader;
pub mod search;
mod warning;

use std::path::Path;

use tracing::info;

use crate::assemble::{Assembler, MergeOutcome};
use crate::csv_out::{write_table, write_table_to_string};
use crate::extract::{PageOutcome, RecordExtractor};
use crate::model::{PageText, PlantTable};
use crate::name::Boilerplate;
use crate::page_text::pages_from_text;
use crate::pdf_reader::{is_pdf_path, read_pdf_pages, read_pdf_pages_from_bytes};

pub use error::ExtractError;
pub use options::{ExtractOptions, PageSelection};
pub use warning::{ExtractWarning, WarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub page_count: usize,
    /// Pages that carried the entry marker, accepted or not.
    pub entry_count: usize,
    pub record_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

/// Runs extraction and assembly over pages given in document order.
pub fn extract_table(
    pages: &[PageText],
    options: &ExtractOptions,
) -> Result<(PlantTable, ExtractionReport), ExtractError> {
    options.validate().map_err(ExtractError::InvalidOption)?;

    let extractor = RecordExtractor::new(Boilerplate::new(options.extra_boilerplate.iter().cloned()))
        .with_min_filled_fields(options.min_filled_fields);
    let mut assembler = Assembler::new();
    let mut warnings = Vec::new();
    let mut entry_count = 0;

    for page in pages {
        let record = match extractor.inspect(&page.text) {
            PageOutcome::Record(record) => record,
            PageOutcome::Empty => {
                warnings.push(
                    ExtractWarning::new(WarningCode::EmptyPage, "page has no text")
                        .with_page(page.page_number),
                );
                continue;
            }
            PageOutcome::NonEntry => {
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::NonEntryPage,
                        "no 'Exposição ao Sol:' marker; page skipped",
                    )
                    .with_page(page.page_number),
                );
                continue;
            }
            PageOutcome::Incomplete { name, filled } => {
                entry_count += 1;
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::IncompleteEntry,
                        format!("entry '{name}' skipped with {filled} filled field(s)"),
                    )
                    .with_page(page.page_number),
                );
                continue;
            }
        };

        entry_count += 1;
        let name = record.name.clone();
        match assembler.push(record) {
            MergeOutcome::Inserted => {}
            MergeOutcome::Replaced { previous_score } => warnings.push(
                ExtractWarning::new(
                    WarningCode::DuplicateReplaced,
                    format!("'{name}' replaces an earlier entry with {previous_score} field(s)"),
                )
                .with_page(page.page_number),
            ),
            MergeOutcome::Discarded { kept_score } => warnings.push(
                ExtractWarning::new(
                    WarningCode::DuplicateDiscarded,
                    format!("'{name}' ignored; earlier entry has {kept_score} field(s)"),
                )
                .with_page(page.page_number),
            ),
        }
    }

    let table = assembler.finish();
    info!(
        pages = pages.len(),
        entries = entry_count,
        records = table.len(),
        "plant table assembled"
    );

    let report = ExtractionReport {
        page_count: pages.len(),
        entry_count,
        record_count: table.len(),
        warnings,
    };
    Ok((table, report))
}

/// Reads `input` as a PDF (by extension) or as a form-feed separated text dump.
pub fn read_pages(input: &Path, options: &ExtractOptions) -> Result<Vec<PageText>, ExtractError> {
    if is_pdf_path(input) {
        return read_pdf_pages(input, options.pages.as_ref());
    }

    let raw = std::fs::read_to_string(input)?;
    pages_from_text(&raw, options.pages.as_ref())
}

pub fn convert_to_csv(
    input: &Path,
    output_csv: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionReport, ExtractError> {
    let pages = read_pages(input, options)?;
    let (table, report) = extract_table(&pages, options)?;
    write_table(output_csv, &table, options.delimiter)?;
    Ok(report)
}

pub fn convert_pdf_bytes_to_csv_string(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<(String, ExtractionReport), ExtractError> {
    let pages = read_pdf_pages_from_bytes(input_pdf, options.pages.as_ref())?;
    let (table, report) = extract_table(&pages, options)?;
    let csv = write_table_to_string(&table, options.delimiter)?;
    Ok((csv, report))
}
