use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(String),

    #[error("failed to extract PDF text: {0}")]
    PdfExtract(String),

    #[error(
        "PDF support is not compiled in; rebuild with `cargo install plant-guide-csv --features pdf` or pass a form-feed separated text dump"
    )]
    ReaderUnavailable,

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no pages available after applying selection")]
    NoPagesSelected,
}
