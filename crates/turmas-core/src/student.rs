//! Student records and per-document metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Gender as printed on the report, normalized from its single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculino,
    Feminino,
    /// The source code was neither `M` nor `F`.
    #[default]
    Unspecified,
}

impl Gender {
    /// Capitalized label used by the user-account export, `None` when unknown.
    pub fn account_label(self) -> Option<&'static str> {
        match self {
            Gender::Masculino => Some("Masculino"),
            Gender::Feminino => Some("Feminino"),
            Gender::Unspecified => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Masculino => "masculino",
            Gender::Feminino => "feminino",
            Gender::Unspecified => "unspecified",
        };
        f.write_str(s)
    }
}

/// One enrolled student after normalization.
///
/// `primary_phone` always mirrors the first entry of `phone_numbers`; it is
/// computed by the constructor and by [`Student::set_phone_numbers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    /// ISO `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_phone: Option<String>,
    #[serde(default)]
    phone_numbers: Vec<String>,
}

impl Student {
    pub fn new(
        name: impl Into<String>,
        birth_date: Option<String>,
        gender: Gender,
        age: u32,
        phone_numbers: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            birth_date,
            gender,
            age,
            primary_phone: phone_numbers.first().cloned(),
            phone_numbers,
        }
    }

    pub fn primary_phone(&self) -> Option<&str> {
        self.primary_phone.as_deref()
    }

    pub fn phone_numbers(&self) -> &[String] {
        &self.phone_numbers
    }

    pub fn set_phone_numbers(&mut self, phones: Vec<String>) {
        self.primary_phone = phones.first().cloned();
        self.phone_numbers = phones;
    }
}

/// Document-level facts attached once to every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Portuguese long timestamp, e.g. `Sex, 16 de Maio de 2025, 14:30`.
    pub issued_at: String,
    pub school_name: String,
    pub source_file: String,
}
