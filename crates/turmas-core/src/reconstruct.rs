//! Reassembly of student records split across physical table rows.
//!
//! Table extraction frequently breaks one logical student row into several
//! physical rows: the name wraps onto a second line, extra phone numbers
//! spill into the next row, and so on. A record starts at a row whose id
//! cell begins with digits (the INEP id) and owns every following row up to
//! the next such row.
//!
//! [`reconstruct`] is the pure window function; [`Reconstructor`] owns the
//! cursor over a whole table and yields one [`RecordEvent`] per step.

use crate::error::RowShapeError;
use crate::normalize::clean_text;

/// One physical table row: ordered text cells.
pub type RawRow = Vec<String>;

/// Cell indices of each field within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub id: usize,
    pub name: usize,
    pub birth_date: usize,
    pub gender: usize,
    pub age: usize,
    pub phones: usize,
}

impl ColumnLayout {
    /// Layout of tables extracted straight from the PDF report.
    pub const PDF: ColumnLayout = ColumnLayout {
        id: 0,
        name: 1,
        birth_date: 2,
        gender: 3,
        age: 4,
        phones: 5,
    };

    /// Layout of the raw CSV dump once its leading `Turma` column is removed.
    pub const CSV: ColumnLayout = ColumnLayout {
        id: 0,
        name: 2,
        birth_date: 3,
        gender: 4,
        age: 5,
        phones: 6,
    };

    /// Whether `row` opens a new record: its id cell starts with a digit.
    pub fn is_record_start(&self, row: &[String]) -> bool {
        starts_with_digit(&cell(row, self.id))
    }

    /// Layout of a CSV dump, judged by where its start rows keep the birth date.
    ///
    /// The legacy extractor left an empty column between id and name, which
    /// pushes the date one cell right. Rows with no date in either place do
    /// not count; ties resolve to [`ColumnLayout::PDF`].
    pub fn detect(rows: &[RawRow]) -> ColumnLayout {
        let (mut current, mut legacy) = (0usize, 0usize);
        for row in rows.iter().filter(|row| Self::PDF.is_record_start(row)) {
            if is_date_prefix(&cell(row, Self::PDF.birth_date)) {
                current += 1;
            } else if cell(row, Self::PDF.name).is_empty()
                && is_date_prefix(&cell(row, Self::CSV.birth_date))
            {
                legacy += 1;
            }
        }
        if legacy > current { Self::CSV } else { Self::PDF }
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::PDF
    }
}

/// Fields of one student as found in the table, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub name: String,
    pub birth_date: String,
    pub gender: String,
    pub age: String,
    pub phones: String,
    /// Physical rows the record spanned, start row included.
    pub rows_consumed: usize,
}

/// [`ColumnLayout::is_record_start`] with the PDF layout.
pub fn is_record_start(row: &[String]) -> bool {
    ColumnLayout::PDF.is_record_start(row)
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|c| clean_text(c)).unwrap_or_default()
}

fn starts_with_digit(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_date_prefix(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 10
        && bytes[..10]
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 2 || i == 5 { *b == b'/' } else { b.is_ascii_digit() })
}

/// Reconstruct the record that starts at `window[0]`.
///
/// Returns the raw record and the number of rows it consumed. The window
/// may extend past the record; scanning stops at the next start row.
/// A continuation row without any cell is reported as [`RowShapeError`].
pub fn reconstruct(
    window: &[RawRow],
    layout: &ColumnLayout,
) -> Result<(RawRecord, usize), RowShapeError> {
    let first = match window.first() {
        Some(row) if layout.is_record_start(row) => row,
        Some(_) => return Err(RowShapeError::new(0, "row does not start a record")),
        None => return Err(RowShapeError::new(0, "empty window")),
    };

    let mut record = RawRecord::default();
    let mut name_parts: Vec<String> = Vec::new();

    let id_cell = cell(first, layout.id);
    let remainder = id_cell.trim_start_matches(|c: char| c.is_ascii_digit()).trim();
    name_parts.push(remainder.to_string());
    if layout.name != layout.id {
        name_parts.push(cell(first, layout.name));
    }

    let birth = cell(first, layout.birth_date);
    if is_date_prefix(&birth) {
        record.birth_date = birth;
    }
    let gender = cell(first, layout.gender);
    if gender == "M" || gender == "F" {
        record.gender = gender;
    }
    let age = cell(first, layout.age);
    if starts_with_digit(&age) {
        record.age = age;
    }
    record.phones = cell(first, layout.phones);

    let mut consumed = 1;
    for (offset, row) in window.iter().enumerate().skip(1) {
        if row.is_empty() {
            return Err(RowShapeError::new(offset, "continuation row has no cells"));
        }
        if layout.is_record_start(row) {
            break;
        }
        consumed += 1;

        let lead = cell(row, layout.id);
        if !lead.is_empty() {
            name_parts.push(lead);
        }
        if layout.name != layout.id {
            let name = cell(row, layout.name);
            if !name.is_empty() {
                name_parts.push(name);
            }
        }
        let phones = cell(row, layout.phones);
        if !phones.is_empty() {
            if record.phones.is_empty() {
                record.phones = phones;
            } else {
                record.phones.push(' ');
                record.phones.push_str(&phones);
            }
        }
    }

    record.name = name_parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    record.rows_consumed = consumed;
    Ok((record, consumed))
}

/// Outcome of one reconstruction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEvent {
    /// A record started at `index`.
    Record { index: usize, record: RawRecord },
    /// Row `index` does not start a record and belongs to none.
    Skipped { index: usize },
    /// The record starting at `index` could not be reassembled; the cursor
    /// moved past the start row only.
    Malformed { index: usize, error: RowShapeError },
}

/// Cursor over a table's rows producing [`RecordEvent`]s.
#[derive(Debug, Clone)]
pub struct Reconstructor<'a> {
    rows: &'a [RawRow],
    layout: ColumnLayout,
    cursor: usize,
}

impl<'a> Reconstructor<'a> {
    pub fn new(rows: &'a [RawRow], layout: ColumnLayout) -> Self {
        Self {
            rows,
            layout,
            cursor: 0,
        }
    }

    /// Convenience: only the successfully reconstructed records.
    pub fn records(self) -> impl Iterator<Item = RawRecord> + 'a {
        self.filter_map(|event| match event {
            RecordEvent::Record { record, .. } => Some(record),
            _ => None,
        })
    }
}

impl Iterator for Reconstructor<'_> {
    type Item = RecordEvent;

    fn next(&mut self) -> Option<RecordEvent> {
        let index = self.cursor;
        let row = self.rows.get(index)?;

        if !self.layout.is_record_start(row) {
            self.cursor += 1;
            return Some(RecordEvent::Skipped { index });
        }

        match reconstruct(&self.rows[index..], &self.layout) {
            Ok((record, consumed)) => {
                self.cursor += consumed;
                Some(RecordEvent::Record { index, record })
            }
            Err(error) => {
                self.cursor += 1;
                Some(RecordEvent::Malformed { index, error })
            }
        }
    }
}
