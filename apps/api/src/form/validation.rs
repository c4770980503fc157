use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::form::fields::{FormField, RawForm, Section};
use crate::models::cv::YearMonth;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

const GPA_MIN: f64 = 0.0;
const GPA_MAX: f64 = 4.0;

/// Date fields checked at submission, with the wording used in messages.
const DATE_FIELDS: &[(FormField, &str)] = &[
    (FormField::EduStartDate, "education start date"),
    (FormField::EduEndDate, "education end date"),
    (FormField::ExpStartDate, "experience start date"),
    (FormField::ExpEndDate, "experience end date"),
];

/// Pointer to one offending input so the client can highlight it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRef {
    pub field: FormField,
    /// 1-based entry number within the section.
    pub entry: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionValidation {
    pub section: Section,
    pub passed: bool,
    pub errors: Vec<String>,
    pub invalid_fields: Vec<FieldRef>,
}

impl SectionValidation {
    fn from_parts(section: Section, errors: Vec<String>, invalid_fields: Vec<FieldRef>) -> Self {
        Self {
            section,
            passed: errors.is_empty(),
            errors,
            invalid_fields,
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("phone pattern compiles"))
}

/// Checks the fields of one wizard section.
///
/// Personal, education and skills: every required field of every entry must
/// be non-blank; any gap yields the single generic message.
/// Experience is optional as a whole, but an entry with any field filled must
/// have all of them filled.
pub fn validate_section(section: Section, form: &RawForm) -> SectionValidation {
    match section {
        Section::Experience => validate_experience(form),
        _ => validate_required(section, form),
    }
}

fn validate_required(section: Section, form: &RawForm) -> SectionValidation {
    // A required section with no submitted entries counts as one blank entry.
    let entries = if section.is_repeated() {
        form.entry_count(section).max(1)
    } else {
        1
    };

    let invalid_fields: Vec<FieldRef> = (0..entries)
        .flat_map(|index| {
            section
                .fields()
                .iter()
                .filter(|f| f.is_required())
                .filter(move |f| form.is_blank_at(**f, index))
                .map(move |f| FieldRef {
                    field: *f,
                    entry: index + 1,
                })
        })
        .collect();

    let errors = if invalid_fields.is_empty() {
        vec![]
    } else {
        vec![REQUIRED_FIELDS_MESSAGE.to_string()]
    };

    SectionValidation::from_parts(section, errors, invalid_fields)
}

fn validate_experience(form: &RawForm) -> SectionValidation {
    let fields = Section::Experience.fields();
    let mut errors = Vec::new();
    let mut invalid_fields = Vec::new();

    for index in 0..form.entry_count(Section::Experience) {
        let blank: Vec<FormField> = fields
            .iter()
            .copied()
            .filter(|f| form.is_blank_at(*f, index))
            .collect();

        // Untouched entries are skipped; fully filled ones pass.
        if blank.is_empty() || blank.len() == fields.len() {
            continue;
        }

        errors.push(format!(
            "If adding work experience, please fill in all fields for experience entry {}.",
            index + 1
        ));
        invalid_fields.extend(blank.into_iter().map(|field| FieldRef {
            field,
            entry: index + 1,
        }));
    }

    SectionValidation::from_parts(Section::Experience, errors, invalid_fields)
}

/// Whole-form checks run before a document is generated: contact formats,
/// GPA presence and range for every listed degree, and date parseability.
pub fn validate_submission(form: &RawForm) -> Vec<String> {
    let mut errors = Vec::new();

    let email = form.first(FormField::Email).trim();
    if !email_regex().is_match(email) {
        errors.push("Please enter a valid email address".to_string());
    }

    let phone = form.first(FormField::Phone).trim();
    if !phone.is_empty() && !phone_regex().is_match(phone) {
        errors.push("Please enter a valid phone number".to_string());
    }

    for (index, degree) in form.values(FormField::Degree).iter().enumerate() {
        if degree.trim().is_empty() {
            continue;
        }
        let gpa = form.value_at(FormField::Gpa, index).trim();
        if gpa.is_empty() {
            errors.push(format!("GPA is required for education entry {}", index + 1));
        } else if parse_gpa(gpa).is_none() {
            errors.push(format!(
                "GPA at entry {} must be between {} and {}",
                index + 1,
                GPA_MIN,
                GPA_MAX
            ));
        }
    }

    for (field, label) in DATE_FIELDS {
        for (index, value) in form.values(*field).iter().enumerate() {
            if value.trim().is_empty() {
                continue;
            }
            if value.parse::<YearMonth>().is_err() {
                errors.push(format!("Invalid {label} at entry {}", index + 1));
            }
        }
    }

    errors
}

/// Every section check followed by the submission checks, as one flat list.
/// Section messages are prefixed with the section title.
pub fn validate_form(form: &RawForm) -> Vec<String> {
    let mut errors: Vec<String> = Section::ALL
        .iter()
        .flat_map(|section| {
            validate_section(*section, form)
                .errors
                .into_iter()
                .map(move |e| format!("{}: {}", section.title(), e))
        })
        .collect();
    errors.extend(validate_submission(form));
    errors
}

/// Parses a GPA, accepting only finite values on the 0 to 4 scale.
pub fn parse_gpa(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|g| g.is_finite() && (GPA_MIN..=GPA_MAX).contains(g))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal() -> RawForm {
        RawForm::new()
            .with(FormField::FullName, ["Ada Lovelace"])
            .with(FormField::Email, ["ada@example.com"])
    }

    fn education(gpas: &[&str]) -> RawForm {
        let n = gpas.len();
        personal()
            .with(FormField::Degree, vec!["BSc"; n])
            .with(FormField::Institution, vec!["Uni"; n])
            .with(FormField::EduStartDate, vec!["2016-09"; n])
            .with(FormField::EduEndDate, vec!["2020-05"; n])
            .with(FormField::Gpa, gpas.to_vec())
    }

    #[test]
    fn test_personal_passes_with_name_and_email() {
        let result = validate_section(Section::Personal, &personal());
        assert!(result.passed);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_personal_blank_name_reports_generic_message() {
        let form = personal().with(FormField::FullName, ["   "]);
        let result = validate_section(Section::Personal, &form);
        assert!(!result.passed);
        assert_eq!(result.errors, vec![REQUIRED_FIELDS_MESSAGE.to_string()]);
        assert_eq!(
            result.invalid_fields,
            vec![FieldRef {
                field: FormField::FullName,
                entry: 1
            }]
        );
    }

    #[test]
    fn test_optional_personal_fields_may_be_blank() {
        let form = personal().with(FormField::Phone, [""]).with(FormField::Summary, [""]);
        assert!(validate_section(Section::Personal, &form).passed);
    }

    #[test]
    fn test_education_with_no_entries_fails() {
        let result = validate_section(Section::Education, &personal());
        assert!(!result.passed);
        assert!(result
            .invalid_fields
            .iter()
            .any(|f| f.field == FormField::Degree && f.entry == 1));
    }

    #[test]
    fn test_education_rank_is_optional() {
        let form = education(&["3.5"]).with(FormField::Rank, [""]);
        assert!(validate_section(Section::Education, &form).passed);
    }

    #[test]
    fn test_education_second_entry_gap_is_located() {
        let form = education(&["3.5", "3.9"]).with(FormField::Institution, ["Uni", ""]);
        let result = validate_section(Section::Education, &form);
        assert!(!result.passed);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.invalid_fields,
            vec![FieldRef {
                field: FormField::Institution,
                entry: 2
            }]
        );
    }

    #[test]
    fn test_skills_require_category_and_text() {
        let form = RawForm::new()
            .with(FormField::SkillCategory, ["Languages"])
            .with(FormField::Skills, [""]);
        assert!(!validate_section(Section::Skills, &form).passed);

        let form = form.with(FormField::Skills, ["Rust, Go"]);
        assert!(validate_section(Section::Skills, &form).passed);
    }

    #[test]
    fn test_experience_untouched_is_skipped() {
        let form = RawForm::new()
            .with(FormField::Position, [""])
            .with(FormField::Company, ["  "]);
        assert!(validate_section(Section::Experience, &form).passed);
        assert!(validate_section(Section::Experience, &RawForm::new()).passed);
    }

    #[test]
    fn test_experience_partial_entry_names_its_index() {
        let form = RawForm::new()
            .with(FormField::Position, ["Engineer", "Lead"])
            .with(FormField::Company, ["Acme", ""])
            .with(FormField::ExpStartDate, ["2019-01", "2021-01"])
            .with(FormField::ExpEndDate, ["2020-12", "2022-01"])
            .with(FormField::Responsibilities, ["Built things", "Led things"]);
        let result = validate_section(Section::Experience, &form);
        assert!(!result.passed);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("entry 2"));
        assert_eq!(
            result.invalid_fields,
            vec![FieldRef {
                field: FormField::Company,
                entry: 2
            }]
        );
    }

    #[test]
    fn test_experience_complete_entries_pass() {
        let form = RawForm::new()
            .with(FormField::Position, ["Engineer"])
            .with(FormField::Company, ["Acme"])
            .with(FormField::ExpStartDate, ["2019-01"])
            .with(FormField::ExpEndDate, ["2020-12"])
            .with(FormField::Responsibilities, ["Built things"]);
        assert!(validate_section(Section::Experience, &form).passed);
    }

    #[test]
    fn test_submission_accepts_valid_form() {
        let form = education(&["3.75"]).with(FormField::Phone, ["+1 (234) 567-890"]);
        assert!(validate_submission(&form).is_empty());
    }

    #[test]
    fn test_submission_rejects_bad_email() {
        for bad in ["", "ada", "ada@example", "ada @example.com", "@example.com"] {
            let form = personal().with(FormField::Email, [bad]);
            assert_eq!(
                validate_submission(&form),
                vec!["Please enter a valid email address".to_string()],
                "email {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_submission_rejects_bad_phone() {
        let form = personal().with(FormField::Phone, ["call me maybe"]);
        assert_eq!(
            validate_submission(&form),
            vec!["Please enter a valid phone number".to_string()]
        );
        let form = personal().with(FormField::Phone, ["12+34"]);
        assert_eq!(validate_submission(&form).len(), 1);
    }

    #[test]
    fn test_gpa_out_of_range_one_error_per_entry() {
        let form = education(&["4.5", "3.0", "-0.1", "abc"]);
        let errors = validate_submission(&form);
        assert_eq!(
            errors,
            vec![
                "GPA at entry 1 must be between 0 and 4".to_string(),
                "GPA at entry 3 must be between 0 and 4".to_string(),
                "GPA at entry 4 must be between 0 and 4".to_string(),
            ]
        );
    }

    #[test]
    fn test_gpa_required_for_listed_degree() {
        let form = education(&[""]);
        assert_eq!(
            validate_submission(&form),
            vec!["GPA is required for education entry 1".to_string()]
        );
    }

    #[test]
    fn test_gpa_ignored_for_blank_degree() {
        let form = education(&["9"]).with(FormField::Degree, [""]);
        assert!(validate_submission(&form).is_empty());
    }

    #[test]
    fn test_gpa_bounds_inclusive() {
        assert_eq!(parse_gpa("0"), Some(0.0));
        assert_eq!(parse_gpa("4.00"), Some(4.0));
        assert_eq!(parse_gpa("NaN"), None);
        assert_eq!(parse_gpa("inf"), None);
    }

    #[test]
    fn test_invalid_dates_are_reported_with_entry_number() {
        let form = personal()
            .with(FormField::EduStartDate, ["2016-09", "2016-13"])
            .with(FormField::ExpEndDate, ["", "not a date"]);
        assert_eq!(
            validate_submission(&form),
            vec![
                "Invalid education start date at entry 2".to_string(),
                "Invalid experience end date at entry 2".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_form_prefixes_section_errors() {
        let errors = validate_form(&personal());
        assert!(errors.contains(&format!("Education: {REQUIRED_FIELDS_MESSAGE}")));
        assert!(errors.contains(&format!("Skills: {REQUIRED_FIELDS_MESSAGE}")));
        assert!(!errors.iter().any(|e| e.starts_with("Work Experience")));
    }
}
