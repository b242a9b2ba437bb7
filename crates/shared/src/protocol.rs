use serde::{Deserialize, Serialize};

use crate::domain::Course;

/// Query parameters understood by the paginated listing endpoint.
///
/// Field order is the order the parameters appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseListQuery {
    pub search: String,
    pub ordering: String,
    pub limit: u32,
    pub offset: u64,
}

/// One page of the listing. Both keys are required; a body without them is
/// treated as malformed rather than as an empty page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseListResponse {
    pub results: Vec<Course>,
    pub count: u64,
}
