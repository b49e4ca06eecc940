//! pdfask Parser - Document loading and text splitting
//!
//! Supports loading of:
//! - PDF documents (one text segment per page)
//! - Markdown and plain text files
//!
//! Each loader implements the `DocumentLoader` trait and produces a
//! `ParsedDocument`, which a `TextSplitter` turns into bounded,
//! overlapping `DocumentChunk`s ready for embedding.

pub mod pdf;
pub mod splitter;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use pdf::PdfLoader;
pub use splitter::{RecursiveCharacterSplitter, TextSplitter};

use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during document loading
#[derive(Error, Debug)]
pub enum ParserError {
    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PDF parsing error
    #[error("PDF parsing error: {0}")]
    PdfError(String),

    /// Encoding error
    #[error("Text encoding error: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Parsed Document Types
// ============================================================================

/// A loaded document, split into its natural text segments
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Original file path
    pub file_path: String,

    /// Detected file type
    pub file_type: FileType,

    /// Text segments in reading order
    pub pages: Vec<PageText>,
}

impl ParsedDocument {
    /// Create a new parsed document
    pub fn new(file_path: impl Into<String>, file_type: FileType) -> Self {
        Self {
            file_path: file_path.into(),
            file_type,
            pages: Vec::new(),
        }
    }

    /// Add a page
    pub fn with_page(mut self, number: u32, text: impl Into<String>) -> Self {
        self.pages.push(PageText {
            number,
            text: text.into(),
        });
        self
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Text of a single page (or the whole file for unpaged formats)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,

    /// Extracted text
    pub text: String,
}

/// Supported file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Markdown,
    PlainText,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "md" | "markdown" => Self::Markdown,
            "txt" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Markdown => write!(f, "markdown"),
            Self::PlainText => write!(f, "text"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Loader Trait
// ============================================================================

/// Trait for document loaders
pub trait DocumentLoader: Send + Sync {
    /// Load a document from a file path
    fn load(&self, path: &Path) -> Result<ParsedDocument>;

    /// Get supported file types
    fn supported_types(&self) -> &[FileType];

    /// Check if this loader can handle a file type
    fn can_load(&self, file_type: FileType) -> bool {
        self.supported_types().contains(&file_type)
    }
}

// ============================================================================
// Loader Registry
// ============================================================================

/// Registry of available loaders
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn DocumentLoader>>,
}

impl LoaderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Registry with every built-in loader
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PdfLoader::new());
        registry.register(PlainTextLoader);
        registry
    }

    /// Register a loader
    pub fn register<L: DocumentLoader + 'static>(&mut self, loader: L) {
        self.loaders.push(Box::new(loader));
    }

    /// Find a loader for a file type
    pub fn find_loader(&self, file_type: FileType) -> Option<&dyn DocumentLoader> {
        self.loaders
            .iter()
            .find(|l| l.can_load(file_type))
            .map(|l| l.as_ref())
    }

    /// Load a file using the appropriate loader
    pub fn load(&self, path: &Path) -> Result<ParsedDocument> {
        let file_type = FileType::from_path(path);

        if file_type == FileType::Unknown {
            return Err(ParserError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            ));
        }

        let loader = self
            .find_loader(file_type)
            .ok_or_else(|| ParserError::UnsupportedFormat(file_type.to_string()))?;

        loader.load(path)
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// Plain Text Loader
// ============================================================================

/// Plain text and markdown loader
pub struct PlainTextLoader;

impl DocumentLoader for PlainTextLoader {
    fn load(&self, path: &Path) -> Result<ParsedDocument> {
        let bytes = std::fs::read(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        let content =
            String::from_utf8(bytes).map_err(|e| ParserError::EncodingError(e.to_string()))?;

        let file_type = match FileType::from_path(path) {
            FileType::Markdown => FileType::Markdown,
            _ => FileType::PlainText,
        };

        Ok(ParsedDocument::new(path.display().to_string(), file_type).with_page(1, content))
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::PlainText, FileType::Markdown]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_extension("pdf"), FileType::Pdf);
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("md"), FileType::Markdown);
        assert_eq!(FileType::from_extension("txt"), FileType::PlainText);
        assert_eq!(FileType::from_extension("docx"), FileType::Unknown);
    }

    #[test]
    fn test_document_counts_chars_across_pages() {
        let doc = ParsedDocument::new("a.pdf", FileType::Pdf)
            .with_page(1, "first page")
            .with_page(3, "휴가");

        assert_eq!(doc.pages[1].number, 3);
        assert_eq!(doc.char_count(), 12);
    }

    #[test]
    fn test_plain_text_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Title\n\nBody").unwrap();

        let doc = PlainTextLoader.load(&path).unwrap();
        assert_eq!(doc.file_type, FileType::Markdown);
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].text, "# Title\n\nBody");
    }

    #[test]
    fn test_plain_text_loader_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        let err = PlainTextLoader.load(&path).unwrap_err();
        assert!(matches!(err, ParserError::EncodingError(_)));
    }

    #[test]
    fn test_registry_rejects_unknown_extension() {
        let registry = LoaderRegistry::with_defaults();
        let err = registry.load(Path::new("report.docx")).unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedFormat(ref ext) if ext == "docx"));
    }

    #[test]
    fn test_registry_finds_loaders() {
        let registry = LoaderRegistry::with_defaults();
        assert!(registry.find_loader(FileType::Pdf).is_some());
        assert!(registry.find_loader(FileType::Markdown).is_some());
        assert!(registry.find_loader(FileType::Unknown).is_none());
    }
}
