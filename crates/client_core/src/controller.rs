//! Fetch controller: turns view actions into listing requests and commits the
//! authoritative response back into [`ViewState`].

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use shared::error::{FetchError, FetchFailure};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    ordering::OrderingKey,
    state::{Action, FetchTicket, Transition, ViewSnapshot, ViewState},
    transport::{CourseSource, HttpCourseSource},
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ViewEvent {
    Loaded(ViewSnapshot),
    LoadFailed(FetchFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Committed(ViewSnapshot),
    Failed(FetchFailure),
    /// A newer request was issued before this one finished; nothing changed.
    Superseded,
    /// The action was rejected by the reducer and no request was issued.
    Unchanged,
}

pub struct CourseListController {
    source: Arc<dyn CourseSource>,
    state: Mutex<ViewState>,
    options: FetchOptions,
    events: broadcast::Sender<ViewEvent>,
}

impl CourseListController {
    pub fn new(source: Arc<dyn CourseSource>, state: ViewState, options: FetchOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source,
            state: Mutex::new(state),
            options,
            events,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        settings.validate()?;
        let base_url = settings.parsed_base_url()?;
        let ordering = settings.parsed_ordering()?;
        let source = HttpCourseSource::new(
            &base_url,
            settings.session_cookie.clone(),
            settings.request_timeout(),
        )
        .context("failed to create course list transport")?;

        info!(
            base_url = %base_url,
            per_page = settings.per_page,
            ordering = %ordering,
            "course list controller configured"
        );

        let options = FetchOptions {
            timeout: settings.request_timeout(),
            retry: RetryPolicy {
                max_retries: settings.max_retries,
                backoff: settings.retry_backoff(),
            },
        };
        Ok(Self::new(
            Arc::new(source),
            ViewState::new(base_url, settings.per_page, ordering),
            options,
        ))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn mount(&self) -> FetchOutcome {
        self.dispatch(Action::Mount).await
    }

    pub async fn refresh(&self) -> FetchOutcome {
        self.dispatch(Action::Refresh).await
    }

    pub async fn set_search_query(&self, search_query: impl Into<String>) -> FetchOutcome {
        self.dispatch(Action::SetSearchQuery(search_query.into())).await
    }

    pub async fn set_ordering(&self, ordering: OrderingKey) -> FetchOutcome {
        self.dispatch(Action::SetOrdering(ordering)).await
    }

    pub async fn toggle_ordering(&self, field: impl Into<String>) -> FetchOutcome {
        self.dispatch(Action::ToggleOrdering(field.into())).await
    }

    pub async fn set_per_page(&self, per_page: u32) -> FetchOutcome {
        self.dispatch(Action::SetPerPage(per_page)).await
    }

    pub async fn set_current_page(&self, page: u32) -> FetchOutcome {
        self.dispatch(Action::GoToPage(page)).await
    }

    /// Applies a user action and, when it produces a ticket, performs the
    /// fetch. The ticket's request is built under the state lock, so it always
    /// sees the field the action just changed. Completions are only ever
    /// applied by [`Self::fetch`].
    async fn dispatch(&self, action: Action) -> FetchOutcome {
        let transition = self.state.lock().await.apply(action);
        match transition {
            Transition::Fetch(ticket) => self.fetch(ticket).await,
            Transition::Committed | Transition::Failed(_) | Transition::Ignored => {
                FetchOutcome::Unchanged
            }
        }
    }

    async fn fetch(&self, ticket: FetchTicket) -> FetchOutcome {
        debug!(
            seq = ticket.seq,
            page = ticket.page,
            limit = ticket.request.query.limit,
            offset = ticket.request.query.offset,
            url = %ticket.request.url,
            "issuing course list request"
        );

        let mut attempt: u32 = 0;
        let result = loop {
            attempt += 1;
            let result = match tokio::time::timeout(
                self.options.timeout,
                self.source.fetch_page(&ticket.request),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(self.options.timeout)),
            };

            match result {
                Err(err) if err.is_retryable() && attempt <= self.options.retry.max_retries => {
                    warn!(
                        seq = ticket.seq,
                        attempt,
                        kind = ?err.kind(),
                        "course list request failed; retrying: {err}"
                    );
                    tokio::time::sleep(self.options.retry.backoff * attempt).await;
                    if !self.state.lock().await.is_current(ticket.seq) {
                        debug!(seq = ticket.seq, "request superseded during retry");
                        return FetchOutcome::Superseded;
                    }
                }
                other => break other,
            }
        };

        let action = match result {
            Ok(response) => Action::FetchSucceeded {
                seq: ticket.seq,
                page: ticket.page,
                per_page: ticket.per_page,
                response,
            },
            Err(err) => Action::FetchFailed {
                seq: ticket.seq,
                failure: FetchFailure::from(err),
            },
        };

        let mut state = self.state.lock().await;
        let transition = state.apply(action);
        match transition {
            Transition::Committed => {
                let snapshot = state.snapshot();
                drop(state);
                debug!(
                    seq = ticket.seq,
                    page = snapshot.current_page,
                    count = snapshot.count,
                    pages = snapshot.pages,
                    "course list page committed"
                );
                let _ = self.events.send(ViewEvent::Loaded(snapshot.clone()));
                FetchOutcome::Committed(snapshot)
            }
            Transition::Failed(failure) => {
                drop(state);
                warn!(seq = ticket.seq, kind = ?failure.kind, "course list load failed: {}", failure.message);
                let _ = self.events.send(ViewEvent::LoadFailed(failure.clone()));
                FetchOutcome::Failed(failure)
            }
            Transition::Ignored | Transition::Fetch(_) => {
                debug!(seq = ticket.seq, "discarding stale course list response");
                FetchOutcome::Superseded
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
