//! Transport seam between the fetch controller and the listing endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use shared::{error::FetchError, protocol::CourseListResponse};
use tracing::debug;
use url::{Origin, Url};

use crate::request::RequestDescriptor;

#[async_trait]
pub trait CourseSource: Send + Sync {
    async fn fetch_page(&self, request: &RequestDescriptor) -> Result<CourseListResponse, FetchError>;
}

/// reqwest-backed source. Credentials are scoped to the origin of the
/// configured base URL and never sent anywhere else.
pub struct HttpCourseSource {
    http: Client,
    origin: Origin,
    session_cookie: Option<String>,
    timeout: Duration,
}

impl HttpCourseSource {
    pub fn new(
        base_url: &Url,
        session_cookie: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            origin: base_url.origin(),
            session_cookie,
            timeout,
        })
    }

    fn credentials_for(&self, url: &Url) -> Option<&str> {
        if url.origin() == self.origin {
            self.session_cookie.as_deref()
        } else {
            None
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CourseSource for HttpCourseSource {
    async fn fetch_page(&self, request: &RequestDescriptor) -> Result<CourseListResponse, FetchError> {
        let mut builder = self
            .http
            .get(request.url.clone())
            .header(header::ACCEPT, "application/json");
        if let Some(cookie) = self.credentials_for(&request.url) {
            builder = builder.header(header::COOKIE, cookie);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.map_send_error(err))?;
        debug!(status = status.as_u16(), bytes = body.len(), "course list response received");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<CourseListResponse>(&body)
            .map_err(|err| FetchError::MalformedResponse(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
