//! Output documents and their serialization.
//!
//! Every emitter renders into memory first; [`write_output`] is the only
//! place that touches the filesystem, so a failed run leaves no file behind.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use turmas_core::{AccountFactory, Metadata, RawRow, Roster, Settings, UserAccount};

use crate::error::ReportError;

const REPORT_INDENT: &[u8] = b"    ";
const USERS_INDENT: &[u8] = b"  ";

/// `{"metadata": {...}, "<class>": [...], ...}`
#[derive(Debug, Serialize)]
pub struct GroupedReport<'a> {
    pub metadata: &'a Metadata,
    #[serde(flatten)]
    pub roster: &'a Roster,
}

/// `{"metadata": {...}, "classes": {"<class>": [...]}}`
#[derive(Debug, Serialize)]
pub struct NestedReport<'a> {
    pub metadata: &'a Metadata,
    pub classes: &'a Roster,
}

fn to_json<T: Serialize + ?Sized>(value: &T, indent: &[u8]) -> Result<Vec<u8>, ReportError> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent));
    value.serialize(&mut ser)?;
    out.push(b'\n');
    Ok(out)
}

pub fn grouped_json(metadata: &Metadata, roster: &Roster) -> Result<Vec<u8>, ReportError> {
    to_json(&GroupedReport { metadata, roster }, REPORT_INDENT)
}

/// Nested schema document. Built from a [`turmas_core::RecordFilter::Strict`] roster,
/// every student in it carries a birth date.
pub fn nested_json(metadata: &Metadata, roster: &Roster) -> Result<Vec<u8>, ReportError> {
    to_json(&NestedReport { metadata, classes: roster }, REPORT_INDENT)
}

/// One account per student, classes in roster order.
pub fn user_accounts(roster: &Roster, settings: &Settings) -> Vec<UserAccount> {
    let mut factory = AccountFactory::new(settings);
    roster
        .iter()
        .flat_map(|(class, students)| students.iter().map(move |s| (class, s)))
        .map(|(class, student)| factory.account(student, class))
        .collect()
}

pub fn users_json(accounts: &[UserAccount]) -> Result<Vec<u8>, ReportError> {
    to_json(accounts, USERS_INDENT)
}

pub fn stats_json(counts: &IndexMap<String, usize>) -> Result<Vec<u8>, ReportError> {
    to_json(counts, USERS_INDENT)
}

/// Raw rows as `Turma,Col0,...,ColN`; the column count comes from the first row.
pub fn raw_csv(rows: &[(String, &RawRow)]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    let width = rows.first().map_or(0, |(_, row)| row.len());
    let mut header = Vec::with_capacity(width + 1);
    header.push("Turma".to_string());
    header.extend((0..width).map(|i| format!("Col{i}")));
    writer.write_record(&header)?;

    for (label, row) in rows {
        writer.write_record(std::iter::once(label.as_str()).chain(row.iter().map(String::as_str)))?;
    }
    writer
        .into_inner()
        .map_err(|err| ReportError::Csv(err.into_error().into()))
}

/// Swap the source's extension for `ext`, placed in `output_dir` when given.
pub fn derive_output_path(source: &Path, ext: &str, output_dir: Option<&Path>) -> PathBuf {
    let file_name = source.with_extension(ext);
    match (output_dir, file_name.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file_name,
    }
}

/// `<stem>_stats.json` next to `output`.
pub fn stats_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}_stats.json"))
}

/// Write a rendered document, creating the parent directory if needed.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, bytes).map_err(write_err)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}
