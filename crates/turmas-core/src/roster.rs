//! Students grouped by class, in first-seen order.

use indexmap::IndexMap;
use serde::Serialize;

use crate::student::Student;

/// Group key used when no class marker could be found.
pub const UNIDENTIFIED_CLASS: &str = "class not identified";

/// Which records the roster accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFilter {
    /// A non-empty name is enough.
    #[default]
    Lenient,
    /// Name and birth date are both required.
    Strict,
}

impl RecordFilter {
    pub fn accepts(self, student: &Student) -> bool {
        if student.name.trim().is_empty() {
            return false;
        }
        match self {
            RecordFilter::Lenient => true,
            RecordFilter::Strict => student.birth_date.is_some(),
        }
    }
}

/// Insertion-ordered mapping from class label to its students.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    #[serde(skip)]
    filter: RecordFilter,
    classes: IndexMap<String, Vec<Student>>,
}

impl Roster {
    pub fn new(filter: RecordFilter) -> Self {
        Self {
            filter,
            classes: IndexMap::new(),
        }
    }

    pub fn filter(&self) -> RecordFilter {
        self.filter
    }

    /// Register a class so it is emitted even without students.
    pub fn ensure_class(&mut self, class: &str) {
        if !self.classes.contains_key(class) {
            self.classes.insert(class.to_string(), Vec::new());
        }
    }

    /// Append a student to `class`. Returns `false` if the filter rejected it.
    pub fn push(&mut self, class: &str, student: Student) -> bool {
        if !self.filter.accepts(&student) {
            tracing::debug!(class, name = %student.name, "record rejected by roster filter");
            return false;
        }
        self.ensure_class(class);
        if let Some(students) = self.classes.get_mut(class) {
            students.push(student);
        }
        true
    }

    pub fn classes(&self) -> &IndexMap<String, Vec<Student>> {
        &self.classes
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Student])> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn get(&self, class: &str) -> Option<&[Student]> {
        self.classes.get(class).map(Vec::as_slice)
    }

    pub fn class_counts(&self) -> IndexMap<String, usize> {
        self.classes
            .iter()
            .map(|(k, v)| (k.clone(), v.len()))
            .collect()
    }

    /// Total number of students across all classes.
    pub fn len(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
