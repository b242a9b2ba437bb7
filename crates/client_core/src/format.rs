//! Display helpers for course rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::domain::Course;

pub const NOT_AVAILABLE: &str = "-";

const UTC_DISPLAY_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// `None` renders as [`NOT_AVAILABLE`], parseable dates as a UTC string such
/// as `Fri, 01 Jan 2021 00:00:00 GMT`, and anything else unchanged.
pub fn format_course_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NOT_AVAILABLE.to_string();
    };
    match parse_course_date(raw.trim()) {
        Some(date) => date.format(UTC_DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

fn parse_course_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(date.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRow {
    pub course_name: String,
    pub course_id: String,
    pub start_date: String,
    pub self_paced: &'static str,
    pub enrollments: u64,
    pub completions: u64,
    pub detail_path: String,
}

impl From<&Course> for CourseRow {
    fn from(course: &Course) -> Self {
        Self {
            course_name: course.course_name.clone(),
            course_id: course.course_id.clone(),
            start_date: format_course_date(course.start_date.as_deref()),
            self_paced: if course.self_paced { "yes" } else { NOT_AVAILABLE },
            enrollments: course.enrollment_count(),
            completions: course.completion_count(),
            detail_path: format!("/figures/course/{}", course.course_id),
        }
    }
}
