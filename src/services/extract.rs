// src/services/extract.rs

use tracing::debug;

/// Extract text from an uploaded screenplay PDF.
///
/// A failed extraction does not abort the report: the error is folded into
/// the returned text and the pipeline continues with it.
pub fn extract_script_text(bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(err) => format!("Error leyendo PDF: {}", err),
    }
}

/// Strict variant for the reference-pricing path, where a bad PDF means
/// "no reference data" rather than inline error text.
pub fn try_extract_text(bytes: &[u8]) -> Option<String> {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => Some(text),
        Err(err) => {
            debug!("Reference PDF extraction failed: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_become_inline_error_text() {
        let text = extract_script_text(b"definitely not a pdf");
        assert!(text.starts_with("Error leyendo PDF:"));
    }

    #[test]
    fn garbage_bytes_yield_no_reference_text() {
        assert!(try_extract_text(b"definitely not a pdf").is_none());
    }
}
