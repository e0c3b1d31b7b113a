//! Opening a source document and running the roster pipeline over it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use turmas_core::{
    Binding, ColumnLayout, Metadata, PhoneFormat, RawRow, RecordEvent, RecordFilter, Reconstructor,
    Roster, Settings, TablePosition, UNIDENTIFIED_CLASS, class_for_table, class_from_text,
    find_class_markers_by_page, normalize_record,
};
use turmas_parse::{PdfDocument, RawTable, Strategy, TableSettings, csv_source};

use crate::error::ReportError;
use crate::metadata::{format_issued_at, school_name_from_header, source_file_name};

/// Lattice results are trusted only when the first table has more rows.
const MIN_LATTICE_ROWS: usize = 5;

/// Which table detection strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyChoice {
    /// Lattice first, one fallback to stream.
    #[default]
    Auto,
    /// Only the given strategy; no fallback.
    Only(Strategy),
}

/// Kind of source document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Csv,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<SourceKind> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("pdf") {
            Some(SourceKind::Pdf)
        } else if ext.eq_ignore_ascii_case("csv") {
            Some(SourceKind::Csv)
        } else {
            None
        }
    }

    /// Column layout for one table of this source.
    ///
    /// CSV dumps may come from the legacy extractor, which shifted every
    /// field after the id one column right; their rows decide.
    fn layout(self, table: &RawTable) -> ColumnLayout {
        match self {
            SourceKind::Pdf => ColumnLayout::PDF,
            SourceKind::Csv => ColumnLayout::detect(&table.rows),
        }
    }
}

/// A table together with the class it was bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTable {
    pub class: String,
    pub binding: Binding,
    pub table: RawTable,
}

/// Run one strategy, or lattice with a single stream fallback.
pub fn extract_with_fallback(
    doc: &PdfDocument,
    choice: StrategyChoice,
) -> Result<(Vec<RawTable>, Strategy), ReportError> {
    let run = |strategy: Strategy| {
        doc.extract_tables(&TableSettings::with_strategy(strategy))
            .map_err(|source| ReportError::Extraction { strategy, source })
    };

    match choice {
        StrategyChoice::Only(strategy) => Ok((run(strategy)?, strategy)),
        StrategyChoice::Auto => {
            match doc.extract_tables(&TableSettings::with_strategy(Strategy::Lattice)) {
                Ok(tables) if tables.first().is_some_and(|t| t.len() > MIN_LATTICE_ROWS) => {
                    tracing::info!(tables = tables.len(), "lattice extraction accepted");
                    return Ok((tables, Strategy::Lattice));
                }
                Ok(tables) => tracing::info!(
                    tables = tables.len(),
                    first_rows = tables.first().map_or(0, RawTable::len),
                    "lattice result too small, falling back to stream"
                ),
                Err(err) => tracing::info!(error = %err, "lattice extraction failed, falling back to stream"),
            }
            Ok((run(Strategy::Stream)?, Strategy::Stream))
        }
    }
}

/// A source document with its tables extracted.
#[derive(Debug, Clone)]
pub struct Report {
    path: PathBuf,
    kind: SourceKind,
    page_texts: Vec<String>,
    tables: Vec<ClassTable>,
    strategy: Option<Strategy>,
}

impl Report {
    /// Read the source, extract its tables and bind each one to a class.
    pub fn open(path: impl AsRef<Path>, choice: StrategyChoice) -> Result<Report, ReportError> {
        let path = path.as_ref();
        let kind = SourceKind::from_path(path)
            .ok_or_else(|| ReportError::UnsupportedFormat(path.to_path_buf()))?;

        let (page_texts, raw_tables, strategy) = match kind {
            SourceKind::Pdf => {
                let bytes = std::fs::read(path).map_err(|source| ReportError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let doc = PdfDocument::open(&bytes)?;
                let (tables, strategy) = extract_with_fallback(&doc, choice)?;
                (doc.page_texts(), tables, Some(strategy))
            }
            SourceKind::Csv => {
                let file = std::fs::File::open(path).map_err(|source| ReportError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let tables = csv_source::read_tables(std::io::BufReader::new(file))?;
                (Vec::new(), tables, None)
            }
        };

        let tables = bind_classes(raw_tables, &page_texts);
        Ok(Report {
            path: path.to_path_buf(),
            kind,
            page_texts,
            tables,
            strategy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Strategy that produced the tables; `None` for CSV sources.
    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub fn tables(&self) -> &[ClassTable] {
        &self.tables
    }

    pub fn page_texts(&self) -> &[String] {
        &self.page_texts
    }

    /// Document metadata stamped with `now`.
    pub fn metadata<Tz: TimeZone>(&self, settings: &Settings, now: &DateTime<Tz>) -> Metadata {
        let school_name = match &settings.school_name {
            Some(name) => name.clone(),
            None => school_name_from_header(&self.page_texts.join("\n")),
        };
        Metadata {
            issued_at: format_issued_at(now),
            school_name,
            source_file: source_file_name(&self.path),
        }
    }

    /// Reconstruct, normalize and group every student.
    pub fn roster(&self, filter: RecordFilter, phones: &PhoneFormat) -> Roster {
        let mut roster = Roster::new(filter);

        for class_table in &self.tables {
            roster.ensure_class(&class_table.class);
            let layout = self.kind.layout(&class_table.table);
            let rows = &class_table.table.rows;
            for event in Reconstructor::new(rows, layout) {
                match event {
                    RecordEvent::Record { index, record } => {
                        let student = normalize_record(&record, phones);
                        if !roster.push(&class_table.class, student) {
                            tracing::debug!(row = index, "record dropped");
                        }
                    }
                    RecordEvent::Skipped { index } => {
                        tracing::debug!(row = index, cells = ?rows[index], "row does not start a record");
                    }
                    RecordEvent::Malformed { index, error } => {
                        tracing::warn!(row = index, %error, "skipping malformed row");
                    }
                }
            }
        }
        tracing::info!(classes = roster.classes().len(), students = roster.len(), "roster built");
        roster
    }

    /// Every raw row prefixed with its class label, for the CSV dump.
    ///
    /// A row whose first cell holds its own `Turma:` label uses that label.
    pub fn labeled_rows(&self) -> Vec<(String, &RawRow)> {
        self.tables
            .iter()
            .flat_map(|t| {
                t.table.rows.iter().map(move |row| {
                    let label = match row.first() {
                        Some(first) if first.to_lowercase().contains("turma:") => class_from_text(first),
                        _ => t.class.clone(),
                    };
                    (label, row)
                })
            })
            .collect()
    }
}

fn bind_classes(tables: Vec<RawTable>, page_texts: &[String]) -> Vec<ClassTable> {
    let markers = find_class_markers_by_page(page_texts);
    if !page_texts.is_empty() && markers.is_empty() {
        tracing::warn!("no class marker found; every student goes to `{UNIDENTIFIED_CLASS}`");
    }

    let mut previous: Option<String> = None;
    let mut last_page: Option<usize> = None;
    let mut ordinal_on_page = 0;
    let mut bound = Vec::with_capacity(tables.len());

    for (index, table) in tables.into_iter().enumerate() {
        let (class, binding) = match &table.label {
            Some(label) => (label.clone(), Binding::Exact),
            None => {
                if table.page.is_some() && table.page == last_page {
                    ordinal_on_page += 1;
                } else {
                    ordinal_on_page = 0;
                }
                last_page = table.page;
                let position = TablePosition {
                    index,
                    page: table.page,
                    ordinal_on_page,
                };
                let tc = class_for_table(position, &markers, page_texts.len(), previous.as_deref());
                if tc.binding == Binding::Estimated {
                    tracing::warn!(table = index, class = %tc.name, "class bound by estimated page");
                }
                (tc.name, tc.binding)
            }
        };
        previous = Some(class.clone());
        bound.push(ClassTable {
            class,
            binding,
            table,
        });
    }
    bound
}
