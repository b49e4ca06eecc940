//! Recursive character text splitting
//!
//! Splits text on the coarsest separator present (paragraphs, then lines,
//! then words, then characters), then greedily merges the pieces back into
//! chunks of at most `chunk_size` characters. Consecutive chunks share a
//! tail of at most `chunk_overlap` characters. Lengths are counted in
//! chars, never bytes, so multi-byte text is never cut mid-codepoint.

use std::collections::VecDeque;

use pdfask_core::DocumentChunk;
use tracing::{debug, warn};

use crate::ParsedDocument;

/// Default separators, coarsest first
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Trait for text splitters
pub trait TextSplitter: Send + Sync {
    /// Split raw text into chunk strings
    fn split_text(&self, text: &str) -> Vec<String>;

    /// Split every page of a document, numbering chunks across pages
    fn split_document(&self, doc: &ParsedDocument) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        let mut index = 0u32;

        for page in &doc.pages {
            for content in self.split_text(&page.text) {
                chunks.push(DocumentChunk::new(content, index).with_page(page.number));
                index += 1;
            }
        }

        debug!(
            file = %doc.file_path,
            pages = doc.pages.len(),
            chunks = chunks.len(),
            "Split document"
        );

        chunks
    }
}

/// Splitter that recurses through a separator list
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Create a splitter with the default separators.
    ///
    /// `chunk_size` is clamped to at least 1 and `chunk_overlap` to below it.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // Coarsest separator that occurs in the text; fall back to the last one
        let position = separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s.as_str()))
            .unwrap_or(separators.len().saturating_sub(1));
        let separator = separators.get(position).map(String::as_str).unwrap_or("");
        let finer = separators.get(position + 1..).unwrap_or(&[]);

        let mut good_splits: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if finer.is_empty() {
                final_chunks.push(piece.to_string());
            } else {
                final_chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Greedily merge pieces into chunks, carrying an overlapping tail forward
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in splits {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        total,
                        chunk_size = self.chunk_size,
                        "Created a chunk longer than the configured size"
                    );
                }

                if !current.is_empty() {
                    if let Some(doc) = join_pieces(&current) {
                        docs.push(doc);
                    }

                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }

        docs
    }
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn join_pieces(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split before every occurrence of `separator`, keeping it on the next piece.
/// An empty separator splits into single characters.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, _) in text.match_indices(separator) {
        if i > start {
            pieces.push(&text[start..i]);
        }
        start = i;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileType;
    use proptest::prelude::*;

    fn numbered_words(n: usize) -> String {
        (0..n)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(
            split_keeping_separator("a\n\nb\n\nc", "\n\n"),
            vec!["a", "\n\nb", "\n\nc"]
        );
        assert_eq!(split_keeping_separator("héllo", ""), vec!["h", "é", "l", "l", "o"]);
        assert_eq!(split_keeping_separator("\n\nlead", "\n\n"), vec!["\n\nlead"]);
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = RecursiveCharacterSplitter::default();
        let chunks = splitter.split_text("  A short paragraph.  ");
        assert_eq!(chunks, vec!["A short paragraph.".to_string()]);
    }

    #[test]
    fn test_empty_and_blank_text() {
        let splitter = RecursiveCharacterSplitter::default();
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\n \n").is_empty());
    }

    #[test]
    fn test_long_text_respects_size_and_overlaps() {
        let splitter = RecursiveCharacterSplitter::new(1000, 200);
        let text = numbered_words(600);
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
        }
        for window in chunks.windows(2) {
            let head: String = window[1].chars().take(20).collect();
            assert!(
                window[0].contains(&head),
                "next chunk should start inside the previous one"
            );
        }
        assert!(chunks.last().unwrap().ends_with("word599"));
    }

    #[test]
    fn test_paragraphs_are_preferred_boundaries() {
        let splitter = RecursiveCharacterSplitter::new(50, 0);
        let text = format!("{}\n\n{}", "a".repeat(40), "b".repeat(40));
        let chunks = splitter.split_text(&text);

        assert_eq!(chunks, vec!["a".repeat(40), "b".repeat(40)]);
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let splitter = RecursiveCharacterSplitter::new(10, 2);
        let chunks = splitter.split_text(&"x".repeat(25));

        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks[0], "x".repeat(10));
    }

    #[test]
    fn test_multibyte_text() {
        let splitter = RecursiveCharacterSplitter::new(5, 1);
        let chunks = splitter.split_text("연차휴가신청절차안내");
        assert!(chunks.iter().all(|c| c.chars().count() <= 5));
        assert!(chunks.len() >= 2);
    }

    #[test]
    fn test_overlap_clamped_below_size() {
        let splitter = RecursiveCharacterSplitter::new(10, 50);
        assert_eq!(splitter.chunk_overlap(), 9);

        let splitter = RecursiveCharacterSplitter::new(0, 0);
        assert_eq!(splitter.chunk_size(), 1);
    }

    #[test]
    fn test_split_document_numbers_across_pages() {
        let doc = ParsedDocument::new("doc.pdf", FileType::Pdf)
            .with_page(1, numbered_words(300))
            .with_page(3, "closing remarks");

        let splitter = RecursiveCharacterSplitter::new(1000, 200);
        let chunks = splitter.split_document(&doc);

        assert!(chunks.len() >= 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i as u32);
        }
        let last = chunks.last().unwrap();
        assert_eq!(last.page, Some(3));
        assert_eq!(last.content, "closing remarks");
        assert_eq!(chunks[0].page, Some(1));
    }

    proptest! {
        #[test]
        fn prop_chunks_never_exceed_size(
            text in "[a-z \\n]{0,600}",
            size in 5usize..120,
            overlap in 0usize..60,
        ) {
            let splitter = RecursiveCharacterSplitter::new(size, overlap);
            for chunk in splitter.split_text(&text) {
                prop_assert!(chunk.chars().count() <= splitter.chunk_size());
                prop_assert!(!chunk.trim().is_empty());
            }
        }
    }
}
