//! Tables from a raw CSV dump (`Turma,Col0,...,ColN`).
//!
//! The first column carries the class label resolved when the dump was
//! written; the remaining columns are the extracted cells. Consecutive rows
//! with the same label form one table. Header rows (`Col0...` or `ID ...`)
//! also start a new table and are dropped.

use std::io::Read;
use std::path::Path;

use crate::error::BackendError;
use crate::table::RawTable;

fn is_header_row(cells: &[String]) -> bool {
    cells
        .iter()
        .any(|c| c.trim() == "Col0" || c.trim() == "ID" || c.trim() == "ID INEP")
}

/// Read tables from CSV data. The first record is the header and is skipped.
pub fn read_tables<R: Read>(reader: R) -> Result<Vec<RawTable>, BackendError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut tables: Vec<RawTable> = Vec::new();
    let mut split_next = true;

    for record in csv_reader.records() {
        let record = record?;
        let mut fields = record.iter().map(str::to_string);
        let label = fields.next().unwrap_or_default();
        let cells: Vec<String> = fields.collect();

        if is_header_row(&cells) {
            split_next = true;
            continue;
        }

        let label = label.trim().to_string();
        let same_label = tables
            .last()
            .is_some_and(|t| t.label.as_deref() == Some(label.as_str()));
        if split_next || !same_label {
            tables.push(RawTable {
                page: None,
                label: Some(label),
                rows: Vec::new(),
            });
            split_next = false;
        }
        if let Some(table) = tables.last_mut() {
            table.rows.push(cells);
        }
    }

    tracing::info!(tables = tables.len(), "CSV tables read");
    Ok(tables)
}

pub fn read_tables_from_path(path: impl AsRef<Path>) -> Result<Vec<RawTable>, BackendError> {
    let file = std::fs::File::open(path)?;
    read_tables(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
Turma,Col0,Col1,Col2,Col3,Col4,Col5,Col6,Col7
1ºIV01-EM,Col0,Col1,Col2,Col3,Col4,Col5,Col6,Col7
1ºIV01-EM,111,,ANA LIMA,01/01/2010,F,14 anos,(27) 99999-0000,
1ºIV01-EM,,,SOUZA,,,,,
1ºIV02-EM,222,,BRUNO,02/02/2010,M,14 anos,,
";

    #[test]
    fn test_groups_rows_by_label() {
        let tables = read_tables(DUMP.as_bytes()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].label.as_deref(), Some("1ºIV01-EM"));
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[0][2], "ANA LIMA");
        assert_eq!(tables[0].page, None);
        assert_eq!(tables[1].label.as_deref(), Some("1ºIV02-EM"));
    }

    #[test]
    fn test_header_row_splits_same_label() {
        let data = "Turma,Col0\nA,1\nA,ID\nA,2\n";
        let tables = read_tables(data.as_bytes()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].rows, vec![vec!["2".to_string()]]);
    }

    #[test]
    fn test_empty_input_yields_no_tables() {
        assert!(read_tables("Turma,Col0\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_tables_from_path("/nonexistent/alunos.csv").unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
