// File: src/submit.rs
// Purpose: Async appointment submission with CSRF and in-flight guarding

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::MedformsConfig;
use crate::form_data::FormData;

/// Hidden form field carrying the session's CSRF token.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Header the backend checks the token against.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Booking endpoint, relative to the transport's base URL.
pub const BOOKING_ENDPOINT: &str = "/appointments/api/";

/// Where a confirmed booking sends the user next.
pub const APPOINTMENT_LISTING_PATH: &str = "/appointments/";

/// Minimal view of an HTTP response, enough to classify and parse.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Form-encoded POST transport. Abstracted so tests exercise the
/// submission state machine without a server.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(
        &self,
        path: &str,
        fields: &[(String, String)],
        csrf_token: &str,
    ) -> Result<TransportResponse>;
}

/// Production transport over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        path: &str,
        fields: &[(String, String)],
        csrf_token: &str,
    ) -> Result<TransportResponse> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .post(&url)
            .header(CSRF_HEADER, csrf_token)
            .form(fields)
            .send()
            .await
            .context("Failed to send booking request")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read booking response body")?;

        Ok(TransportResponse { status, body })
    }
}

#[derive(Debug, Deserialize)]
struct BookingResponse {
    scheduled_time: String,
}

/// Outcome of one booking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Confirmed {
        scheduled_time: DateTime<FixedOffset>,
        /// Human-readable confirmation, e.g. "March 5, 2026 2:30 PM"
        display: String,
        listing_url: String,
    },
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitState {
    Idle,
    InFlight,
}

/// Drives the async booking submission. At most one request is in flight;
/// a submit while one is pending is dropped, not queued.
pub struct SubmissionBridge {
    transport: Box<dyn Transport>,
    endpoint: String,
    listing_path: String,
    state: SubmitState,
}

impl SubmissionBridge {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self::with_paths(transport, BOOKING_ENDPOINT, APPOINTMENT_LISTING_PATH)
    }

    /// Endpoint and listing path taken from the loaded configuration.
    pub fn from_config(transport: Box<dyn Transport>, config: &MedformsConfig) -> Self {
        Self::with_paths(
            transport,
            config.booking.endpoint.clone(),
            config.booking.listing_path.clone(),
        )
    }

    pub fn with_paths(
        transport: Box<dyn Transport>,
        endpoint: impl Into<String>,
        listing_path: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            listing_path: listing_path.into(),
            state: SubmitState::Idle,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == SubmitState::InFlight
    }

    /// Submit the validated form. Returns None when a previous submission
    /// is still in flight; otherwise the outcome once the request settles.
    /// The in-flight guard is released on every settle path, including
    /// transport errors.
    pub async fn submit(&mut self, form: &FormData) -> Option<BookingOutcome> {
        if self.state == SubmitState::InFlight {
            debug!("submission already in flight, ignoring");
            return None;
        }
        self.state = SubmitState::InFlight;

        let csrf_token = form.value(CSRF_FIELD).to_string();
        let fields: Vec<(String, String)> = form
            .entries()
            .filter(|(name, _)| *name != CSRF_FIELD)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let outcome = match self
            .transport
            .post_form(&self.endpoint, &fields, &csrf_token)
            .await
        {
            Ok(response) if response.is_success() => self.parse_confirmation(&response.body),
            Ok(response) => {
                warn!(status = response.status, "booking request rejected");
                BookingOutcome::Failed
            }
            Err(err) => {
                warn!(error = %err, "booking request failed");
                BookingOutcome::Failed
            }
        };

        self.state = SubmitState::Idle;
        Some(outcome)
    }

    fn parse_confirmation(&self, body: &str) -> BookingOutcome {
        let parsed: BookingResponse = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "malformed booking confirmation");
                return BookingOutcome::Failed;
            }
        };

        let scheduled_time = match parse_scheduled_time(&parsed.scheduled_time) {
            Some(time) => time,
            None => {
                warn!(value = %parsed.scheduled_time, "unparseable scheduled_time");
                return BookingOutcome::Failed;
            }
        };

        BookingOutcome::Confirmed {
            display: format_scheduled_time(&scheduled_time),
            scheduled_time,
            listing_url: self.listing_path.clone(),
        }
    }

    #[cfg(test)]
    fn force_in_flight(&mut self) {
        self.state = SubmitState::InFlight;
    }
}

/// RFC 3339 first, then the backend's naive local format.
fn parse_scheduled_time(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

/// "March 5, 2026 2:30 PM" style, no leading zeros.
fn format_scheduled_time(time: &DateTime<FixedOffset>) -> String {
    time.format("%B %-d, %Y %-I:%M %p").to_string()
}
