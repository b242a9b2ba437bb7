//! Client-side engine for browsing the paginated course listing: view state,
//! request construction, and a fetch controller that keeps the two in step.

pub mod config;
pub mod controller;
pub mod format;
pub mod ordering;
pub mod request;
pub mod state;
pub mod transport;

pub use config::{load_settings, Settings, SettingsError};
pub use controller::{CourseListController, FetchOptions, FetchOutcome, RetryPolicy, ViewEvent};
pub use format::{format_course_date, CourseRow, NOT_AVAILABLE};
pub use ordering::{OrderingKey, SortDirection, SortIndicator};
pub use request::{build_request, RequestDescriptor};
pub use state::{Action, FetchTicket, Transition, ViewSnapshot, ViewState, DEFAULT_PER_PAGE};
pub use transport::{CourseSource, HttpCourseSource};
