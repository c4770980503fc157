use serde::Serialize;

use crate::models::cv::{CvDocument, EducationEntry, ExperienceEntry, SkillGroup};
use crate::render::dates::format_period;

/// The single input shape shared by every template.
///
/// Dates, GPA and the image are pre-formatted here so templates only decide
/// layout. Empty vectors are falsy in Handlebars, which is how templates drop
/// whole sections.
#[derive(Debug, Serialize)]
pub struct DocumentView<'a> {
    pub personal: PersonalView<'a>,
    pub education: Vec<EducationView<'a>>,
    pub experience: Vec<ExperienceView<'a>>,
    pub skills: Vec<SkillView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PersonalView<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub location: Option<&'a str>,
    pub summary: Option<&'a str>,
    /// `data:` URI ready for an `<img src>`.
    pub image_src: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EducationView<'a> {
    pub degree: &'a str,
    pub institution: &'a str,
    pub period: Option<String>,
    pub gpa: Option<String>,
    pub rank: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ExperienceView<'a> {
    pub position: Option<&'a str>,
    pub company: Option<&'a str>,
    pub period: Option<String>,
    pub responsibilities: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SkillView<'a> {
    pub category: &'a str,
    pub skills: &'a str,
}

impl<'a> From<&'a CvDocument> for DocumentView<'a> {
    fn from(doc: &'a CvDocument) -> Self {
        let p = &doc.personal;
        DocumentView {
            personal: PersonalView {
                full_name: &p.full_name,
                email: &p.email,
                phone: p.phone.as_deref(),
                location: p.location.as_deref(),
                summary: p.summary.as_deref(),
                image_src: p.profile_image.as_ref().map(|img| img.to_data_uri()),
            },
            education: doc.education.iter().map(EducationView::from).collect(),
            experience: doc.experience.iter().map(ExperienceView::from).collect(),
            skills: doc.skills.iter().map(SkillView::from).collect(),
        }
    }
}

impl<'a> From<&'a EducationEntry> for EducationView<'a> {
    fn from(e: &'a EducationEntry) -> Self {
        EducationView {
            degree: &e.degree,
            institution: &e.institution,
            period: format_period(e.start_date, e.end_date),
            gpa: e.gpa.map(|g| format!("{g:.2}")),
            rank: e.rank.as_deref(),
        }
    }
}

impl<'a> From<&'a ExperienceEntry> for ExperienceView<'a> {
    fn from(e: &'a ExperienceEntry) -> Self {
        ExperienceView {
            position: e.position.as_deref(),
            company: e.company.as_deref(),
            period: format_period(e.start_date, e.end_date),
            responsibilities: e.responsibilities.as_deref(),
        }
    }
}

impl<'a> From<&'a SkillGroup> for SkillView<'a> {
    fn from(s: &'a SkillGroup) -> Self {
        SkillView {
            category: &s.category,
            skills: &s.skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::samples::sample_document;

    #[test]
    fn test_view_preformats_dates_and_gpa() {
        let mut doc = sample_document();
        doc.education[0].gpa = Some(3.5);
        let view = DocumentView::from(&doc);

        assert_eq!(
            view.education[0].period.as_deref(),
            Some("September 2016 - May 2020")
        );
        assert_eq!(view.education[0].gpa.as_deref(), Some("3.50"));
    }

    #[test]
    fn test_empty_sections_serialize_as_empty_arrays() {
        let mut doc = sample_document();
        doc.experience.clear();
        let json = serde_json::to_value(DocumentView::from(&doc)).unwrap();
        assert_eq!(json["experience"], serde_json::json!([]));
        assert!(json["personal"]["image_src"].is_null());
    }
}
