use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::image::ProfileImage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid year-month (expected YYYY-MM)")]
pub struct YearMonthError(pub String);

/// A calendar year-month such as `2020-06`.
///
/// Parses `YYYY-MM` (the value a month input produces) and also accepts a full
/// `YYYY-MM-DD` date, keeping only the year and month. Years are four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1000..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Full English month name followed by the four-digit year, e.g. `June 2020`.
    pub fn long_form(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.len() {
            7 => NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"),
            10 => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"),
            _ => return Err(YearMonthError(s.to_string())),
        };

        parsed
            .ok()
            .and_then(|d| YearMonth::new(d.year(), d.month()))
            .ok_or_else(|| YearMonthError(s.to_string()))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub profile_image: Option<ProfileImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub start_date: Option<YearMonth>,
    pub end_date: Option<YearMonth>,
    /// Grade point average on a 0 to 4 scale.
    pub gpa: Option<f64>,
    pub rank: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub position: Option<String>,
    pub company: Option<String>,
    pub start_date: Option<YearMonth>,
    pub end_date: Option<YearMonth>,
    pub responsibilities: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    /// Comma-separated free text, rendered as entered.
    pub skills: String,
}

/// Everything a template needs to render one CV. Built per render call and
/// dropped afterwards; entry order is the order the entries were entered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvDocument {
    pub personal: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<SkillGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_month_input_value() {
        let ym: YearMonth = "2020-06".parse().unwrap();
        assert_eq!(ym, YearMonth::new(2020, 6).unwrap());
        assert_eq!(ym.to_string(), "2020-06");
    }

    #[test]
    fn test_parses_full_date_keeping_month() {
        let ym: YearMonth = "2019-11-23".parse().unwrap();
        assert_eq!(ym, YearMonth::new(2019, 11).unwrap());
    }

    #[test]
    fn test_long_form_uses_english_month_name() {
        let ym: YearMonth = "2020-06".parse().unwrap();
        assert_eq!(ym.long_form(), "June 2020");
        assert_eq!(YearMonth::new(2016, 9).unwrap().long_form(), "September 2016");
    }

    #[test]
    fn test_rejects_invalid_month() {
        assert!("2020-13".parse::<YearMonth>().is_err());
        assert!("2020-00".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_rejects_garbage_and_short_years() {
        assert!("June 2020".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
        assert!("0999-01".parse::<YearMonth>().is_err());
        assert!("2020/06".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_rejects_impossible_day() {
        assert!("2021-02-30".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let ym = YearMonth::new(2023, 12).unwrap();
        let json = serde_json::to_string(&ym).unwrap();
        assert_eq!(json, "\"2023-12\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym);
        assert!(serde_json::from_str::<YearMonth>("\"2023-99\"").is_err());
    }
}
