use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary key of a listed record. The listing API has served both integer
/// and string keys over time, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMetrics {
    #[serde(default)]
    pub enrollment_count: u64,
    #[serde(default)]
    pub num_learners_completed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_for: Option<String>,
}

/// Read-only projection of one course as served by the general course listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: RecordId,
    pub course_id: String,
    pub course_name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub self_paced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// `null` when the backend has not produced daily metrics yet.
    #[serde(default)]
    pub metrics: Option<CourseMetrics>,
}

impl Course {
    pub fn enrollment_count(&self) -> u64 {
        self.metrics
            .as_ref()
            .map(|m| m.enrollment_count)
            .unwrap_or_default()
    }

    pub fn completion_count(&self) -> u64 {
        self.metrics
            .as_ref()
            .map(|m| m.num_learners_completed)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_integer_and_string_ids() {
        let int: RecordId = serde_json::from_str("42").expect("int id");
        let text: RecordId = serde_json::from_str("\"course-v1:edX+DemoX+Demo\"").expect("text id");
        assert_eq!(int, RecordId::Int(42));
        assert_eq!(text.to_string(), "course-v1:edX+DemoX+Demo");
    }

    #[test]
    fn missing_metrics_count_as_zero() {
        let course: Course = serde_json::from_value(serde_json::json!({
            "id": 1,
            "course_id": "course-v1:edX+DemoX+Demo",
            "course_name": "Demo",
            "start_date": null,
            "self_paced": true,
            "metrics": null,
        }))
        .expect("course");

        assert_eq!(course.enrollment_count(), 0);
        assert_eq!(course.completion_count(), 0);
        assert!(course.start_date.is_none());
    }
}
