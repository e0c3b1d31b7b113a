//! Projection of students onto login accounts.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::normalize::{ascii_fold, title_case};
use crate::student::Student;

/// An account record ready to be imported into the school platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub status: String,
    pub school_id: u32,
    pub district_id: u32,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub schedule: String,
    pub class_name: String,
}

/// Shift label derived from the class identifier.
///
/// `I` (integral, including `IV`) wins over `M`, `T` and `N`; anything
/// else, or an empty label, is treated as integral.
pub fn determine_schedule(class: &str) -> &'static str {
    let class = class.to_uppercase();
    if class.contains('I') {
        "Integral"
    } else if class.contains('M') {
        "Manhã"
    } else if class.contains('T') {
        "Tarde"
    } else if class.contains('N') {
        "Noite"
    } else {
        "Integral"
    }
}

/// Build `first.last@domain` from a full name, appending the lowest free
/// numeric suffix when the address is already in `taken`.
///
/// The returned address is inserted into `taken`.
pub fn generate_email(name: &str, domain: &str, taken: &mut HashSet<String>) -> String {
    let parts: Vec<String> = title_case(name)
        .split(' ')
        .map(ascii_fold)
        .filter(|p| !p.is_empty())
        .collect();

    let base = match parts.as_slice() {
        [] => "aluno".to_string(),
        [only] => only.clone(),
        [first, .., last] => format!("{first}.{last}"),
    };

    let mut email = format!("{base}@{domain}");
    let mut counter = 1;
    while taken.contains(&email) {
        email = format!("{base}{counter}@{domain}");
        counter += 1;
    }
    taken.insert(email.clone());
    email
}

/// Turns students into accounts, keeping generated emails unique.
#[derive(Debug)]
pub struct AccountFactory<'a> {
    settings: &'a Settings,
    taken: HashSet<String>,
}

impl<'a> AccountFactory<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            taken: HashSet::new(),
        }
    }

    /// `student` is expected to carry dial-format phone numbers.
    pub fn account(&mut self, student: &Student, class: &str) -> UserAccount {
        UserAccount {
            name: title_case(&student.name),
            email: generate_email(&student.name, &self.settings.email_domain, &mut self.taken),
            password: self.settings.default_password.clone(),
            role: self.settings.role.clone(),
            status: self.settings.status.clone(),
            school_id: self.settings.school_id,
            district_id: self.settings.district_id,
            phone: student.primary_phone().map(str::to_string),
            date_of_birth: student.birth_date.clone(),
            gender: student.gender.account_label().map(str::to_string),
            schedule: determine_schedule(class).to_string(),
            class_name: class.to_string(),
        }
    }
}
