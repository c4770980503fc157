use crate::models::cv::YearMonth;

/// Shown in place of a missing end date.
pub const PRESENT: &str = "Present";

/// `June 2020` for a present value, `Present` for an absent one.
pub fn format_month(value: Option<YearMonth>) -> String {
    value
        .map(|ym| ym.long_form())
        .unwrap_or_else(|| PRESENT.to_string())
}

/// Formats a start/end pair as `Start - End`.
///
/// A missing end reads as `Present`. With no start only the end date is shown,
/// and with neither there is nothing to show.
pub fn format_period(start: Option<YearMonth>, end: Option<YearMonth>) -> Option<String> {
    match (start, end) {
        (None, None) => None,
        (None, Some(end)) => Some(end.long_form()),
        (Some(start), end) => Some(format!("{} - {}", start.long_form(), format_month(end))),
    }
}
