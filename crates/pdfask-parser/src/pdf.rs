//! PDF document loader using pdf-extract
//!
//! Extracts text content from PDF files, one segment per page.
//! Pages whose text is blank are skipped but keep their numbering.

use std::path::Path;

use tracing::debug;

use crate::{DocumentLoader, FileType, PageText, ParsedDocument, ParserError, Result};

/// PDF document loader
#[derive(Debug, Clone, Default)]
pub struct PdfLoader {
    /// Keep blank pages instead of skipping them
    pub keep_blank_pages: bool,
}

impl PdfLoader {
    /// Create a new PDF loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep pages that contain no text
    pub fn with_blank_pages(mut self, keep: bool) -> Self {
        self.keep_blank_pages = keep;
        self
    }

    /// Extract pages from in-memory PDF bytes
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Vec<PageText>> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ParserError::PdfError(e.to_string()))?;

        Ok(self.number_pages(pages))
    }

    fn number_pages(&self, pages: Vec<String>) -> Vec<PageText> {
        pages
            .into_iter()
            .enumerate()
            .filter(|(_, text)| self.keep_blank_pages || !text.trim().is_empty())
            .map(|(i, text)| PageText {
                number: i as u32 + 1,
                text,
            })
            .collect()
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<ParsedDocument> {
        let bytes = std::fs::read(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let pages = self.load_bytes(&bytes)?;
        let document = ParsedDocument {
            file_path: path.display().to_string(),
            file_type: FileType::Pdf,
            pages,
        };
        debug!(
            path = %path.display(),
            pages = document.pages.len(),
            chars = document.char_count(),
            "Extracted PDF text"
        );

        Ok(document)
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Pdf]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::pdf_with_pages;

    #[test]
    fn test_number_pages_skips_blank() {
        let loader = PdfLoader::new();
        let pages = loader.number_pages(vec!["one".into(), "  \n".into(), "three".into()]);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].number, 3);
        assert_eq!(pages[1].text, "three");
    }

    #[test]
    fn test_number_pages_keeps_blank_when_asked() {
        let loader = PdfLoader::new().with_blank_pages(true);
        let pages = loader.number_pages(vec!["one".into(), String::new(), "three".into()]);
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn test_two_page_pdf_keeps_pages_apart() {
        let bytes = pdf_with_pages(&["PageOneText", "PageTwoText"]);
        let pages = PdfLoader::new().load_bytes(&bytes).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].number, 2);
        assert!(pages[0].text.contains("PageOneText"));
        assert!(!pages[0].text.contains("PageTwoText"));
        assert!(pages[1].text.contains("PageTwoText"));
    }

    #[test]
    fn test_load_generated_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.pdf");
        std::fs::write(&path, pdf_with_pages(&["Hello from pdfask"])).unwrap();

        let doc = PdfLoader::new().load(&path).unwrap();
        assert_eq!(doc.file_type, FileType::Pdf);
        assert!(doc.pages[0].text.contains("Hello"));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pdf");
        std::fs::write(&path, b"not a valid pdf").unwrap();

        let err = PdfLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, ParserError::PdfError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PdfLoader::new()
            .load(Path::new("/nonexistent/file.pdf"))
            .unwrap_err();
        assert!(matches!(err, ParserError::IoError { .. }));
    }

    #[test]
    fn test_supported_types() {
        let loader = PdfLoader::new();
        assert!(loader.can_load(FileType::Pdf));
        assert!(!loader.can_load(FileType::PlainText));
    }
}
