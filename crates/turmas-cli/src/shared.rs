use std::error::Error;
use std::path::{Path, PathBuf};

use turmas::{Report, ReportError, Settings, StrategyChoice, emit};

use crate::cli::SourceArgs;

/// Print an error and its source chain to stderr; returns the exit code.
pub fn fail(err: &dyn Error) -> i32 {
    eprintln!("Erro: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  causa: {cause}");
        source = cause.source();
    }
    1
}

/// Source from the command line or `PDF_FILE_PATH`, else `default_source`.
pub fn resolve_source(file: Option<&Path>, settings: &Settings) -> Result<PathBuf, i32> {
    match file.or(settings.default_source.as_deref()) {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            eprintln!(
                "Erro: nenhum arquivo de entrada; informe FILE, PDF_FILE_PATH ou default_source"
            );
            Err(1)
        }
    }
}

/// Open the report with user-facing progress and error messages.
pub fn open_report(args: &SourceArgs, settings: &Settings) -> Result<Report, i32> {
    let source = resolve_source(args.file.as_deref(), settings)?;
    if !source.exists() {
        eprintln!("Erro: arquivo não encontrado: {}", source.display());
        return Err(1);
    }
    println!("Processando arquivo: {}", source.display());

    let report = Report::open(&source, StrategyChoice::from(args.strategy)).map_err(|e| fail(&e))?;
    if let Some(strategy) = report.strategy() {
        println!("Tabelas extraídas com a estratégia {strategy}: {}", report.tables().len());
    }
    Ok(report)
}

/// `--output` when given, else the source path with `ext` in `output_dir`.
///
/// Refuses a destination that would overwrite the source.
pub fn output_path(
    args: &SourceArgs,
    report: &Report,
    ext: &str,
    settings: &Settings,
) -> Result<PathBuf, i32> {
    let path = args.output.clone().unwrap_or_else(|| {
        emit::derive_output_path(report.path(), ext, settings.output_dir.as_deref())
    });
    if path == report.path() {
        eprintln!("Erro: a saída sobrescreveria o arquivo de entrada: {}", path.display());
        return Err(1);
    }
    Ok(path)
}

/// Unwrap a rendered document, reporting a serialization failure.
pub fn rendered(bytes: Result<Vec<u8>, ReportError>) -> Result<Vec<u8>, i32> {
    bytes.map_err(|e| fail(&e))
}

pub fn write(path: &Path, bytes: &[u8]) -> Result<(), i32> {
    emit::write_output(path, bytes).map_err(|e| fail(&e))
}
