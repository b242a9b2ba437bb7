//! View state of the course list and the transitions that mutate it.
//!
//! `ViewState::apply` is the only mutator. Actions that need data return a
//! [`FetchTicket`]; the ticket's sequence number is the authoritative request
//! until another ticket is issued, and completions carrying any other number
//! are dropped without touching state.
//!
//! `pages` always equals `ceil(count / per_page)` and a loaded view keeps
//! `current_page` within `1..=pages`. After a search, ordering or page-size
//! change the known page count belongs to the previous query, so page
//! navigation waits until the first page of the new query commits.

use std::sync::Arc;

use shared::{domain::Course, error::FetchFailure, protocol::CourseListResponse};
use url::Url;

use crate::{
    ordering::OrderingKey,
    request::{build_request, offset_for, RequestDescriptor},
};

pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Clone)]
pub enum Action {
    Mount,
    Refresh,
    SetSearchQuery(String),
    SetOrdering(OrderingKey),
    ToggleOrdering(String),
    SetPerPage(u32),
    GoToPage(u32),
    FetchSucceeded {
        seq: u64,
        page: u32,
        per_page: u32,
        response: CourseListResponse,
    },
    FetchFailed {
        seq: u64,
        failure: FetchFailure,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub page: u32,
    pub per_page: u32,
    pub request: RequestDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Fetch(FetchTicket),
    Committed,
    Failed(FetchFailure),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    base_url: Url,
    search_query: String,
    ordering: OrderingKey,
    per_page: u32,
    current_page: u32,
    count: u64,
    pages: u32,
    items: Arc<[Course]>,
    last_error: Option<FetchFailure>,
    next_seq: u64,
    in_flight: Option<u64>,
    requery_pending: bool,
}

impl ViewState {
    pub fn new(base_url: Url, per_page: u32, ordering: OrderingKey) -> Self {
        Self {
            base_url,
            search_query: String::new(),
            ordering,
            per_page: per_page.max(1),
            current_page: 1,
            count: 0,
            pages: 0,
            items: Arc::from(Vec::<Course>::new()),
            last_error: None,
            next_seq: 1,
            in_flight: None,
            requery_pending: false,
        }
    }

    pub fn with_defaults(base_url: Url) -> Self {
        Self::new(base_url, DEFAULT_PER_PAGE, OrderingKey::default())
    }

    pub fn apply(&mut self, action: Action) -> Transition {
        match action {
            Action::Mount => Transition::Fetch(self.issue(1)),
            Action::Refresh => {
                let page = if self.pages == 0 { 1 } else { self.current_page };
                Transition::Fetch(self.issue(page))
            }
            Action::SetSearchQuery(search_query) => {
                self.search_query = search_query;
                Transition::Fetch(self.restart())
            }
            Action::SetOrdering(ordering) => {
                self.ordering = ordering;
                Transition::Fetch(self.restart())
            }
            Action::ToggleOrdering(field) => {
                self.ordering = self.ordering.toggled(&field);
                Transition::Fetch(self.restart())
            }
            Action::SetPerPage(0) => Transition::Ignored,
            Action::SetPerPage(per_page) => {
                self.per_page = per_page;
                Transition::Fetch(self.restart())
            }
            Action::GoToPage(page) => {
                if self.requery_pending || page == 0 || page > self.pages {
                    return Transition::Ignored;
                }
                Transition::Fetch(self.issue(page))
            }
            Action::FetchSucceeded {
                seq,
                page,
                per_page,
                response,
            } => {
                if !self.is_current(seq) {
                    return Transition::Ignored;
                }
                self.in_flight = None;
                self.requery_pending = false;
                self.count = response.count;
                self.pages = page_count(response.count, per_page);
                self.items = Arc::from(response.results);
                // The result set may have shrunk since the page was requested.
                self.current_page = page.clamp(1, self.pages.max(1));
                self.last_error = None;
                Transition::Committed
            }
            Action::FetchFailed { seq, failure } => {
                if !self.is_current(seq) {
                    return Transition::Ignored;
                }
                self.in_flight = None;
                // Items stay from the last good load; the page count follows
                // the page size now in effect.
                self.pages = page_count(self.count, self.per_page);
                self.current_page = self.current_page.clamp(1, self.pages.max(1));
                self.last_error = Some(failure.clone());
                Transition::Failed(failure)
            }
        }
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.in_flight == Some(seq)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            items: Arc::clone(&self.items),
            count: self.count,
            pages: self.pages,
            current_page: self.current_page,
            per_page: self.per_page,
            search_query: self.search_query.clone(),
            ordering: self.ordering.clone(),
            last_error: self.last_error.clone(),
        }
    }

    fn restart(&mut self) -> FetchTicket {
        self.current_page = 1;
        self.requery_pending = true;
        self.issue(1)
    }

    fn issue(&mut self, page: u32) -> FetchTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);

        let request = build_request(
            &self.base_url,
            &self.search_query,
            &self.ordering,
            self.per_page,
            offset_for(page, self.per_page),
        );
        FetchTicket {
            seq,
            page,
            per_page: self.per_page,
            request,
        }
    }
}

pub fn page_count(count: u64, per_page: u32) -> u32 {
    let pages = count.div_ceil(u64::from(per_page.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Immutable copy of everything the rendering layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub items: Arc<[Course]>,
    pub count: u64,
    pub pages: u32,
    pub current_page: u32,
    pub per_page: u32,
    pub search_query: String,
    pub ordering: OrderingKey,
    pub last_error: Option<FetchFailure>,
}

impl ViewSnapshot {
    pub fn can_navigate(&self) -> bool {
        self.pages > 0
    }

    pub fn has_previous(&self) -> bool {
        self.can_navigate() && self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.can_navigate() && self.current_page < self.pages
    }

    /// Page numbers within `span` of the current page, clamped to `1..=pages`.
    pub fn page_window(&self, span: u32) -> Vec<u32> {
        if !self.can_navigate() {
            return Vec::new();
        }
        let current = self.current_page.clamp(1, self.pages);
        let start = current.saturating_sub(span).max(1);
        let end = current.saturating_add(span).min(self.pages);
        (start..=end).collect()
    }

    pub fn summary(&self) -> String {
        format!("Total number of results: {}.", self.count)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
