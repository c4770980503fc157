use tracing::debug;

use crate::form::fields::{FormField, RawForm};
use crate::form::validation::parse_gpa;
use crate::models::cv::{
    CvDocument, EducationEntry, ExperienceEntry, PersonalInfo, SkillGroup, YearMonth,
};
use crate::models::image::ProfileImage;

/// Shapes index-aligned field groups into a [`CvDocument`].
///
/// Entries whose inclusion field is blank are dropped without error: a degree
/// for education, a position or company for experience, a category for skills.
/// Callers validate first; anything unparseable that still gets here is
/// treated as absent.
pub fn collect(form: &RawForm, profile_image: Option<ProfileImage>) -> CvDocument {
    CvDocument {
        personal: collect_personal(form, profile_image),
        education: collect_education(form),
        experience: collect_experience(form),
        skills: collect_skills(form),
    }
}

fn collect_personal(form: &RawForm, profile_image: Option<ProfileImage>) -> PersonalInfo {
    PersonalInfo {
        full_name: form.first(FormField::FullName).trim().to_string(),
        email: form.first(FormField::Email).trim().to_string(),
        phone: non_blank(form.first(FormField::Phone)),
        location: non_blank(form.first(FormField::Location)),
        summary: non_blank(form.first(FormField::Summary)),
        profile_image,
    }
}

fn collect_education(form: &RawForm) -> Vec<EducationEntry> {
    form.values(FormField::Degree)
        .iter()
        .enumerate()
        .filter(|(_, degree)| !degree.trim().is_empty())
        .map(|(i, degree)| EducationEntry {
            degree: degree.trim().to_string(),
            institution: form.value_at(FormField::Institution, i).trim().to_string(),
            start_date: parse_date(form, FormField::EduStartDate, i),
            end_date: parse_date(form, FormField::EduEndDate, i),
            gpa: parse_gpa(form.value_at(FormField::Gpa, i)),
            rank: non_blank(form.value_at(FormField::Rank, i)),
        })
        .collect()
}

fn collect_experience(form: &RawForm) -> Vec<ExperienceEntry> {
    let count = form
        .values(FormField::Position)
        .len()
        .max(form.values(FormField::Company).len());

    (0..count)
        .filter_map(|i| {
            let position = non_blank(form.value_at(FormField::Position, i));
            let company = non_blank(form.value_at(FormField::Company, i));
            if position.is_none() && company.is_none() {
                return None;
            }
            Some(ExperienceEntry {
                position,
                company,
                start_date: parse_date(form, FormField::ExpStartDate, i),
                end_date: parse_date(form, FormField::ExpEndDate, i),
                responsibilities: non_blank(form.value_at(FormField::Responsibilities, i)),
            })
        })
        .collect()
}

fn collect_skills(form: &RawForm) -> Vec<SkillGroup> {
    form.values(FormField::SkillCategory)
        .iter()
        .enumerate()
        .filter(|(_, category)| !category.trim().is_empty())
        .map(|(i, category)| SkillGroup {
            category: category.trim().to_string(),
            skills: form.value_at(FormField::Skills, i).trim().to_string(),
        })
        .collect()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(form: &RawForm, field: FormField, index: usize) -> Option<YearMonth> {
    let raw = form.value_at(field, index).trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(ym) => Some(ym),
        Err(e) => {
            debug!("Dropping {:?} at entry {}: {}", field, index + 1, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> Option<YearMonth> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_personal_optional_fields_become_none_when_blank() {
        let form = RawForm::new()
            .with(FormField::FullName, [" Ada Lovelace "])
            .with(FormField::Email, ["ada@example.com"])
            .with(FormField::Phone, [""])
            .with(FormField::Location, ["London"]);
        let doc = collect(&form, None);
        assert_eq!(doc.personal.full_name, "Ada Lovelace");
        assert_eq!(doc.personal.phone, None);
        assert_eq!(doc.personal.location.as_deref(), Some("London"));
        assert_eq!(doc.personal.summary, None);
        assert!(doc.personal.profile_image.is_none());
    }

    #[test]
    fn test_education_skips_blank_degrees_and_keeps_order() {
        let form = RawForm::new()
            .with(FormField::Degree, ["BSc", "", "MSc"])
            .with(FormField::Institution, ["First", "Ghost", "Second"])
            .with(FormField::EduStartDate, ["2012-09", "", "2016-09"])
            .with(FormField::EduEndDate, ["2016-06", "", ""])
            .with(FormField::Gpa, ["3.5", "", "3.9"])
            .with(FormField::Rank, ["", "", "Top 5%"]);
        let doc = collect(&form, None);

        assert_eq!(doc.education.len(), 2);
        assert_eq!(doc.education[0].institution, "First");
        assert_eq!(doc.education[0].start_date, ym("2012-09"));
        assert_eq!(doc.education[0].gpa, Some(3.5));
        assert_eq!(doc.education[0].rank, None);
        assert_eq!(doc.education[1].institution, "Second");
        assert_eq!(doc.education[1].end_date, None);
        assert_eq!(doc.education[1].rank.as_deref(), Some("Top 5%"));
    }

    #[test]
    fn test_experience_needs_position_or_company() {
        let form = RawForm::new()
            .with(FormField::Position, ["Engineer", "", ""])
            .with(FormField::Company, ["", "", "Acme"])
            .with(FormField::Responsibilities, ["Shipped", "Orphan", ""]);
        let doc = collect(&form, None);

        assert_eq!(doc.experience.len(), 2);
        assert_eq!(doc.experience[0].position.as_deref(), Some("Engineer"));
        assert_eq!(doc.experience[0].company, None);
        assert_eq!(doc.experience[0].responsibilities.as_deref(), Some("Shipped"));
        assert_eq!(doc.experience[1].company.as_deref(), Some("Acme"));
        assert_eq!(doc.experience[1].responsibilities, None);
    }

    #[test]
    fn test_skills_need_category() {
        let form = RawForm::new()
            .with(FormField::SkillCategory, ["Languages", " "])
            .with(FormField::Skills, ["Rust, Go", "Orphaned"]);
        let doc = collect(&form, None);
        assert_eq!(
            doc.skills,
            vec![SkillGroup {
                category: "Languages".to_string(),
                skills: "Rust, Go".to_string(),
            }]
        );
    }

    #[test]
    fn test_unparseable_values_are_treated_as_absent() {
        let form = RawForm::new()
            .with(FormField::Degree, ["BSc"])
            .with(FormField::EduStartDate, ["someday"])
            .with(FormField::Gpa, ["7"]);
        let doc = collect(&form, None);
        assert_eq!(doc.education[0].start_date, None);
        assert_eq!(doc.education[0].gpa, None);
    }

    #[test]
    fn test_empty_form_yields_empty_sections() {
        let doc = collect(&RawForm::new(), None);
        assert!(doc.education.is_empty());
        assert!(doc.experience.is_empty());
        assert!(doc.skills.is_empty());
    }
}
