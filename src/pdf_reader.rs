use std::path::Path;

#[cfg(not(feature = "pdf"))]
use crate::error::ExtractError;
#[cfg(not(feature = "pdf"))]
use crate::model::PageText;
#[cfg(not(feature = "pdf"))]
use crate::options::PageSelection;

#[cfg(feature = "pdf")]
pub use self::backend::{read_pdf_pages, read_pdf_pages_from_bytes};

#[cfg(not(feature = "pdf"))]
pub fn read_pdf_pages(
    _input_pdf: &Path,
    _page_selection: Option<&PageSelection>,
) -> Result<Vec<PageText>, ExtractError> {
    Err(ExtractError::ReaderUnavailable)
}

#[cfg(not(feature = "pdf"))]
pub fn read_pdf_pages_from_bytes(
    _input_pdf: &[u8],
    _page_selection: Option<&PageSelection>,
) -> Result<Vec<PageText>, ExtractError> {
    Err(ExtractError::ReaderUnavailable)
}

/// True when `path` has a `.pdf` extension (any case).
#[must_use]
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"))
}

#[cfg(feature = "pdf")]
mod backend {
    use std::collections::BTreeMap;
    use std::path::Path;

    use encoding_rs::{UTF_16BE, WINDOWS_1252};
    use lopdf::content::Content;
    use lopdf::{Document, Object};
    use tracing::debug;

    use crate::error::ExtractError;
    use crate::field::shared_capturer;
    use crate::model::PageText;
    use crate::options::PageSelection;
    use crate::page_text::{normalize_page_text, split_text_into_pages};

    pub(super) fn looks_decoding_broken(text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        if text.contains("?Identity-H Unimplemented?") {
            return true;
        }

        let total = text.chars().count();
        let replacement = text.matches('\u{FFFD}').count();
        let control = text
            .chars()
            .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t' | '\u{000C}'))
            .count();

        replacement * 8 > total || control * 5 > total
    }

    pub(super) fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
        let decoded = Document::decode_text(encoding, bytes);
        if !looks_decoding_broken(&decoded) {
            return decoded;
        }

        if bytes.starts_with(&[0xFE, 0xFF]) {
            let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(&bytes[2..]);
            if !had_errors && !utf16.is_empty() {
                return utf16.into_owned();
            }
        }

        if let Some(name) = encoding {
            let lower = name.to_ascii_lowercase();

            if lower.contains("identity-h") || lower.contains("ucs2") || lower.contains("utf16") {
                let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
                if !had_errors && !utf16.is_empty() {
                    return utf16.into_owned();
                }
            }

            if lower.contains("winansi") || lower.contains("1252") || lower.contains("latin") {
                let (latin, _, had_errors) = WINDOWS_1252.decode(bytes);
                if !had_errors && !latin.is_empty() {
                    return latin.into_owned();
                }
            }
        }

        String::from_utf8_lossy(bytes).to_string()
    }

    /// Higher is better. Candidates where field labels are readable (and start
    /// lines) win over ones that merely contain more text.
    pub(super) fn extraction_quality_score(text: &str) -> i64 {
        if text.trim().is_empty() {
            return i64::MIN / 4;
        }

        let (present, line_starts) = shared_capturer().label_presence(text);
        let non_empty_lines = text.lines().filter(|line| !line.trim().is_empty()).count();
        let broken_penalty = if looks_decoding_broken(text) { 800 } else { 0 };

        let present = i64::try_from(present).unwrap_or(i64::MAX / 4);
        let line_starts = i64::try_from(line_starts).unwrap_or(i64::MAX / 4);
        let non_empty_lines = i64::try_from(non_empty_lines).unwrap_or(i64::MAX / 4);
        present * 100 + line_starts * 50 + non_empty_lines - broken_penalty
    }

    pub(super) fn choose_best_text(candidates: &[String]) -> String {
        candidates
            .iter()
            .max_by_key(|text| extraction_quality_score(text))
            .cloned()
            .unwrap_or_default()
    }

    fn extract_text_from_page_content(
        document: &Document,
        page_id: lopdf::ObjectId,
    ) -> Option<String> {
        fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
            for operand in operands {
                match operand {
                    Object::String(bytes, _) => {
                        text.push_str(&decode_pdf_bytes(encoding, bytes));
                    }
                    Object::Array(items) => {
                        collect_text(text, encoding, items);
                    }
                    Object::Integer(value) => {
                        if *value < -100 {
                            text.push(' ');
                        }
                    }
                    Object::Real(value) => {
                        if *value < -100.0 {
                            text.push(' ');
                        }
                    }
                    _ => {}
                }
            }
        }

        let raw_content = document.get_page_content(page_id).ok()?;
        let content = Content::decode(&raw_content).ok()?;
        let encodings = document
            .get_page_fonts(page_id)
            .into_iter()
            .map(|(name, font)| (name, font.get_font_encoding()))
            .collect::<BTreeMap<Vec<u8>, &str>>();

        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_encoding = None;
        for operation in content.operations {
            match operation.operator.as_str() {
                "Tf" => {
                    if let Some(font_name) = operation
                        .operands
                        .first()
                        .and_then(|operand| operand.as_name().ok())
                    {
                        current_encoding = encodings.get(font_name).copied();
                    }
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    collect_text(&mut current, current_encoding, &operation.operands);
                }
                "T*" | "Td" | "TD" | "ET" => {
                    if !current.trim().is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            }
        }

        if !current.trim().is_empty() {
            lines.push(current);
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn collect_pages(
        document: &Document,
        whole_text: Result<String, String>,
        page_selection: Option<&PageSelection>,
    ) -> Result<Vec<PageText>, ExtractError> {
        let pages_map = document.get_pages();
        let extract_error = whole_text.as_ref().err().cloned();
        let split_pages = whole_text
            .ok()
            .map(|text| split_text_into_pages(&text))
            .filter(|pages| pages.len() == pages_map.len());
        if split_pages.is_none() {
            debug!("pdf-extract page split unavailable; using content streams only");
        }

        let mut pages = Vec::new();
        for (index, (page_no, page_id)) in pages_map.iter().enumerate() {
            if page_selection.is_some_and(|selection| !selection.contains(*page_no)) {
                continue;
            }

            let mut candidates = Vec::new();
            if let Some(text) = split_pages
                .as_ref()
                .and_then(|split| split.get(index).cloned())
                .filter(|text| !text.trim().is_empty())
            {
                candidates.push(text);
            }
            if let Some(text) = extract_text_from_page_content(document, *page_id) {
                candidates.push(text);
            }
            if let Some(text) = document
                .extract_text(&[*page_no])
                .ok()
                .filter(|text| !text.trim().is_empty())
            {
                candidates.push(text);
            }

            let text = normalize_page_text(&choose_best_text(&candidates));
            debug!(page = *page_no, candidates = candidates.len(), "page text selected");
            pages.push(PageText {
                page_number: *page_no,
                text,
            });
        }

        if pages.is_empty() {
            return Err(ExtractError::NoPagesSelected);
        }

        if pages.iter().all(|page| page.text.trim().is_empty()) {
            if let Some(error) = extract_error {
                return Err(ExtractError::PdfExtract(error));
            }
        }

        Ok(pages)
    }

    /// Reads every page of the PDF at `input_pdf`, in page order.
    pub fn read_pdf_pages(
        input_pdf: &Path,
        page_selection: Option<&PageSelection>,
    ) -> Result<Vec<PageText>, ExtractError> {
        let document = Document::load(input_pdf)
            .map_err(|error| ExtractError::PdfLoad(error.to_string()))?;
        let whole_text = pdf_extract::extract_text(input_pdf).map_err(|error| error.to_string());
        collect_pages(&document, whole_text, page_selection)
    }

    pub fn read_pdf_pages_from_bytes(
        input_pdf: &[u8],
        page_selection: Option<&PageSelection>,
    ) -> Result<Vec<PageText>, ExtractError> {
        let document = Document::load_mem(input_pdf)
            .map_err(|error| ExtractError::PdfLoad(error.to_string()))?;
        let whole_text =
            pdf_extract::extract_text_from_mem(input_pdf).map_err(|error| error.to_string());
        collect_pages(&document, whole_text, page_selection)
    }
}
