use crate::models::cv::{
    CvDocument, EducationEntry, ExperienceEntry, PersonalInfo, SkillGroup, YearMonth,
};

/// Placeholder CV shown when a user previews a template before filling the form.
pub fn sample_document() -> CvDocument {
    CvDocument {
        personal: PersonalInfo {
            full_name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: Some("+1 234 567 890".to_string()),
            location: Some("New York, USA".to_string()),
            summary: Some("Experienced professional with expertise in...".to_string()),
            profile_image: None,
        },
        education: vec![EducationEntry {
            degree: "Bachelor of Science in Computer Science".to_string(),
            institution: "Sample University".to_string(),
            start_date: YearMonth::new(2016, 9),
            end_date: YearMonth::new(2020, 5),
            gpa: None,
            rank: None,
        }],
        experience: vec![ExperienceEntry {
            position: Some("Senior Developer".to_string()),
            company: Some("Tech Company".to_string()),
            start_date: YearMonth::new(2020, 6),
            end_date: YearMonth::new(2023, 12),
            responsibilities: Some("Led development team, implemented new features...".to_string()),
        }],
        skills: vec![SkillGroup {
            category: "Programming Languages".to_string(),
            skills: "JavaScript, Python, Java".to_string(),
        }],
    }
}
