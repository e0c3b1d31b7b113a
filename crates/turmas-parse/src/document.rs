//! PDF documents loaded through lopdf.

use std::path::Path;

use crate::error::BackendError;
use crate::interpreter::{PageContent, interpret_page};
use crate::lattice;
use crate::stream;
use crate::table::{RawTable, Strategy, TableSettings};
use crate::text::{Word, WordOptions, extract_words, words_to_text};

/// A parsed PDF: every page interpreted once, up front.
///
/// The lopdf document is only held while pages are interpreted.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pages: Vec<PageContent>,
    words: Vec<Vec<Word>>,
    options: WordOptions,
}

fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

fn media_box(doc: &lopdf::Document, page_id: lopdf::ObjectId) -> Result<[f64; 4], BackendError> {
    let obj = resolve_inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
    let obj = match obj {
        lopdf::Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| BackendError::Parse(format!("failed to resolve MediaBox: {e}")))?,
        other => other,
    };
    let array = obj
        .as_array()
        .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
    if array.len() < 4 {
        return Err(BackendError::Parse(format!(
            "MediaBox has {} entries, expected 4",
            array.len()
        )));
    }
    let mut values = [0.0; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = item
            .as_float()
            .map(f64::from)
            .map_err(|e| BackendError::Parse(format!("MediaBox entry is not a number: {e}")))?;
    }
    Ok(values)
}

impl PdfDocument {
    /// Parse PDF bytes and interpret every page.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        if doc.is_encrypted() {
            return Err(BackendError::Parse("encrypted PDFs are not supported".into()));
        }

        let options = WordOptions::default();
        let mut pages = Vec::new();
        for (index, page_id) in doc.get_pages().into_values().enumerate() {
            let content = doc.get_page_content(page_id).map_err(|e| {
                BackendError::Parse(format!("failed to read content of page {}: {e}", index + 1))
            })?;
            let page = interpret_page(&content, media_box(&doc, page_id)?)?;
            tracing::debug!(
                page = index + 1,
                glyphs = page.glyphs.len(),
                edges = page.edges.len(),
                "page interpreted"
            );
            pages.push(page);
        }

        let words = pages
            .iter()
            .map(|p| extract_words(&p.glyphs, &options))
            .collect();
        Ok(Self {
            pages,
            words,
            options,
        })
    }

    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Plain text of one page, lines separated by `\n`.
    pub fn page_text(&self, index: usize) -> Option<String> {
        self.words
            .get(index)
            .map(|words| words_to_text(words, &self.options))
    }

    pub fn page_texts(&self) -> Vec<String> {
        self.words
            .iter()
            .map(|words| words_to_text(words, &self.options))
            .collect()
    }

    /// Text of all pages, separated by newlines.
    pub fn full_text(&self) -> String {
        self.page_texts().join("\n")
    }

    /// Detect tables on every page with the configured strategy.
    ///
    /// Fails with [`BackendError::NoTables`] when nothing is found, so the
    /// caller can fall back to another strategy.
    pub fn extract_tables(&self, settings: &TableSettings) -> Result<Vec<RawTable>, BackendError> {
        let mut tables = Vec::new();
        for (index, page) in self.pages.iter().enumerate() {
            match settings.strategy {
                Strategy::Lattice => {
                    let found =
                        lattice::find_tables(&page.edges, &page.glyphs, &settings.lattice, &settings.words);
                    tables.extend(found.iter().map(|t| RawTable {
                        page: Some(index),
                        label: None,
                        rows: t.text_rows(),
                    }));
                }
                Strategy::Stream => {
                    if let Some(rows) = stream::find_table(&self.words[index], &settings.stream) {
                        tables.push(RawTable {
                            page: Some(index),
                            label: None,
                            rows,
                        });
                    }
                }
            }
        }

        tracing::info!(
            strategy = %settings.strategy,
            tables = tables.len(),
            "table extraction finished"
        );
        if tables.is_empty() {
            return Err(BackendError::NoTables(settings.strategy.name()));
        }
        Ok(tables)
    }
}
