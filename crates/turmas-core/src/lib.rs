//! turmas-core: backend-independent roster types and algorithms.
//!
//! This crate holds everything that happens after table extraction: locating
//! class identifiers in page text, reassembling student rows that the
//! extractor split apart, normalizing raw cells into typed fields, and
//! grouping the result by class. It never touches PDF bytes.

pub mod config;
pub mod error;
pub mod locator;
pub mod normalize;
pub mod reconstruct;
pub mod roster;
pub mod student;
pub mod users;

pub use config::Settings;
pub use error::{CoreError, RowShapeError};
pub use locator::{
    Binding, ClassMarker, MarkerKind, TableClass, TablePosition, class_for_table, class_from_text,
    find_class_markers, find_class_markers_by_page,
};
pub use normalize::{
    PhoneFormat, clean_text, extract_birthdate, extract_phones, normalize_age, normalize_gender,
    normalize_record,
};
pub use reconstruct::{
    ColumnLayout, RawRecord, RawRow, RecordEvent, Reconstructor, is_record_start, reconstruct,
};
pub use roster::{RecordFilter, Roster, UNIDENTIFIED_CLASS};
pub use student::{Gender, Metadata, Student};
pub use users::{AccountFactory, UserAccount, determine_schedule, generate_email};
