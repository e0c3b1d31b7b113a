//! turmas: turn school enrollment reports into per-class student JSON.
//!
//! This is the public API facade crate for turmas. It re-exports types from
//! turmas-core and uses turmas-parse to read PDF and CSV sources.
//!
//! # Architecture
//!
//! - **turmas-core**: Backend-independent roster types and algorithms
//! - **turmas-parse**: PDF content interpretation and table detection
//! - **turmas** (this crate): Source opening, strategy fallback, class
//!   binding and output rendering
//!
//! ```no_run
//! use turmas::{PhoneFormat, RecordFilter, Report, Settings, StrategyChoice, emit};
//!
//! let report = Report::open("alunos.pdf", StrategyChoice::Auto)?;
//! let roster = report.roster(RecordFilter::Lenient, &PhoneFormat::Display);
//! let metadata = report.metadata(&Settings::default(), &chrono::Local::now());
//! let json = emit::grouped_json(&metadata, &roster)?;
//! # Ok::<(), turmas::ReportError>(())
//! ```

pub mod emit;
pub mod error;
pub mod metadata;
pub mod report;

pub use turmas_core;
pub use turmas_parse;

pub use error::ReportError;
pub use report::{ClassTable, Report, SourceKind, StrategyChoice, extract_with_fallback};
pub use turmas_core::{
    Binding, Gender, Metadata, PhoneFormat, RecordFilter, Roster, Settings, Student,
    UNIDENTIFIED_CLASS, UserAccount,
};
pub use turmas_parse::Strategy;
