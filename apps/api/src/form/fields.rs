use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One logical step of the wizard and the group of fields it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Personal,
    Education,
    Experience,
    Skills,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Personal,
        Section::Education,
        Section::Experience,
        Section::Skills,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Personal => "Personal Information",
            Section::Education => "Education",
            Section::Experience => "Work Experience",
            Section::Skills => "Skills",
        }
    }

    pub fn fields(&self) -> &'static [FormField] {
        match self {
            Section::Personal => &[
                FormField::FullName,
                FormField::Email,
                FormField::Phone,
                FormField::Location,
                FormField::Summary,
            ],
            Section::Education => &[
                FormField::Degree,
                FormField::Institution,
                FormField::EduStartDate,
                FormField::EduEndDate,
                FormField::Gpa,
                FormField::Rank,
            ],
            Section::Experience => &[
                FormField::Position,
                FormField::Company,
                FormField::ExpStartDate,
                FormField::ExpEndDate,
                FormField::Responsibilities,
            ],
            Section::Skills => &[FormField::SkillCategory, FormField::Skills],
        }
    }

    /// Whether the section holds repeated entries rather than single values.
    pub fn is_repeated(&self) -> bool {
        !matches!(self, Section::Personal)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Every named input of the wizard form.
///
/// Serialized in snake_case (`edu_start_date`, `skill_category`, ...), which is
/// also the key format of [`RawForm`] in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    FullName,
    Email,
    Phone,
    Location,
    Summary,
    Degree,
    Institution,
    EduStartDate,
    EduEndDate,
    Gpa,
    Rank,
    Position,
    Company,
    ExpStartDate,
    ExpEndDate,
    Responsibilities,
    SkillCategory,
    Skills,
}

impl FormField {
    pub fn section(&self) -> Section {
        use FormField::*;
        match self {
            FullName | Email | Phone | Location | Summary => Section::Personal,
            Degree | Institution | EduStartDate | EduEndDate | Gpa | Rank => Section::Education,
            Position | Company | ExpStartDate | ExpEndDate | Responsibilities => {
                Section::Experience
            }
            SkillCategory | Skills => Section::Skills,
        }
    }

    /// Fields that must be non-blank for their section to pass.
    /// Experience fields are governed by the all-or-nothing entry rule instead.
    pub fn is_required(&self) -> bool {
        use FormField::*;
        matches!(
            self,
            FullName
                | Email
                | Degree
                | Institution
                | EduStartDate
                | EduEndDate
                | Gpa
                | SkillCategory
                | Skills
        )
    }
}

/// Raw field groups exactly as submitted.
///
/// Each field maps to an ordered sequence of values, one per repeated entry;
/// index `i` of every field in a section belongs to the same entry. Personal
/// fields are single-valued and read from index 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawForm(BTreeMap<FormField, Vec<String>>);

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, field: FormField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(field, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn set(&mut self, field: FormField, values: Vec<String>) {
        self.0.insert(field, values);
    }

    /// Replaces every field group present in `other`, leaving the rest untouched.
    pub fn merge(&mut self, other: RawForm) {
        self.0.extend(other.0);
    }

    pub fn values(&self, field: FormField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Value of `field` for entry `index`; missing positions read as blank.
    pub fn value_at(&self, field: FormField, index: usize) -> &str {
        self.values(field)
            .get(index)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn first(&self, field: FormField) -> &str {
        self.value_at(field, 0)
    }

    /// Number of entries in a section: the longest of its field sequences.
    pub fn entry_count(&self, section: Section) -> usize {
        section
            .fields()
            .iter()
            .map(|f| self.values(*f).len())
            .max()
            .unwrap_or(0)
    }

    /// Resets a section to a single blank entry.
    pub fn clear_section(&mut self, section: Section) {
        for field in section.fields() {
            self.0.insert(*field, vec![String::new()]);
        }
    }

    pub fn is_blank_at(&self, field: FormField, index: usize) -> bool {
        self.value_at(field, index).trim().is_empty()
    }
}
