//! Per-selection context: the active brand, its report and its access gate.
//!
//! All state that must not outlive a brand selection lives here and is
//! cleared by a single [`ReportSession::reset`]. Every outbound request is
//! tagged with the [`SelectionToken`] current when it was issued; answers
//! carrying an older token are discarded instead of applied.

use std::time::Instant;

use crate::access::{AccessGate, CodeRequest, EmailRequest, ValidationReply};
use crate::brand::Brand;
use crate::carousel::Carousel;
use crate::error::FlowError;
use crate::presenter::{contents_per_view, ReportView, REPORT_CONTENTS};
use crate::report::{ReportState, ReportSummary};

const NO_HANDLE: &str = "No brand selected or missing handle for report.";
const REPORT_FAILED: &str = "Failed to load report data. Please try again later.";

/// Identifies the selection a request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionToken(u64);

/// A request stamped with the selection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<T> {
    pub token: SelectionToken,
    pub request: T,
}

/// Report fetch for the active brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub handle: String,
}

/// Best-effort notification issued once the report is unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub handle: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct ReportSession {
    active: Option<Brand>,
    generation: u64,
    report: ReportState,
    gate: AccessGate,
    contents: Carousel,
}

impl Default for ReportSession {
    fn default() -> Self {
        Self {
            active: None,
            generation: 0,
            report: ReportState::Idle,
            gate: AccessGate::new(),
            contents: Carousel::new(contents_per_view(false)),
        }
    }
}

impl ReportSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Brand> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> SelectionToken {
        SelectionToken(self.generation)
    }

    #[must_use]
    pub fn report(&self) -> &ReportState {
        &self.report
    }

    #[must_use]
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    #[must_use]
    pub fn contents(&self) -> &Carousel {
        &self.contents
    }

    /// Makes `brand` the active selection.
    ///
    /// Switching to a different brand resets the session; re-activating the
    /// brand that is already active keeps it. Returns whether a reset
    /// happened, i.e. whether the report needs fetching.
    pub fn activate(&mut self, brand: Brand) -> bool {
        if self.active.as_ref().is_some_and(|b| b.id == brand.id) {
            return false;
        }
        tracing::info!(brand = %brand.name, handle = %brand.handle, "brand activated");
        self.active = Some(brand);
        self.reset();
        true
    }

    /// Drops the active brand along with everything tied to it.
    pub fn clear(&mut self) {
        self.active = None;
        self.reset();
    }

    /// Discards the report and access state and invalidates every request
    /// still in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.report = ReportState::Idle;
        self.gate.reset();
        self.contents.reset();
    }

    fn check_token(&self, token: SelectionToken, what: &str) -> Result<(), FlowError> {
        if token == self.token() {
            Ok(())
        } else {
            tracing::warn!(what, "discarding response for a previous selection");
            Err(FlowError::Stale)
        }
    }

    // -- report -----------------------------------------------------------

    /// Starts a report fetch for the active brand.
    ///
    /// # Errors
    ///
    /// - [`FlowError::MissingPrecondition`] when no brand is active or its
    ///   handle is blank; the report moves to its failed state.
    /// - [`FlowError::Busy`] while a fetch is outstanding.
    pub fn begin_report(&mut self) -> Result<Tagged<ReportRequest>, FlowError> {
        let handle = self
            .active
            .as_ref()
            .map(|b| b.handle.trim())
            .filter(|h| !h.is_empty())
            .map(str::to_owned);
        let Some(handle) = handle else {
            tracing::warn!("skipping report fetch: no brand or handle");
            self.report = ReportState::Failed(NO_HANDLE.to_string());
            return Err(FlowError::MissingPrecondition(NO_HANDLE.to_string()));
        };
        if self.report == ReportState::Loading {
            return Err(FlowError::Busy("report"));
        }

        self.report = ReportState::Loading;
        Ok(Tagged {
            token: self.token(),
            request: ReportRequest { handle },
        })
    }

    /// Applies a report fetch outcome.
    ///
    /// # Errors
    ///
    /// - [`FlowError::Stale`] when the response belongs to an earlier
    ///   selection; nothing changes.
    /// - The fetch error otherwise; the report moves to its failed state.
    pub fn finish_report(
        &mut self,
        token: SelectionToken,
        outcome: Result<ReportSummary, FlowError>,
    ) -> Result<(), FlowError> {
        self.check_token(token, "report")?;
        match outcome {
            Ok(summary) => {
                tracing::info!(handle = ?summary.handle, "report loaded");
                self.report = ReportState::Loaded(summary);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "report failed to load");
                self.report = ReportState::Failed(REPORT_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Display model for the active brand's report.
    #[must_use]
    pub fn view(&self) -> Option<ReportView> {
        self.active
            .as_ref()
            .map(|b| ReportView::new(b, self.report.summary()))
    }

    // -- access gate ------------------------------------------------------

    /// Starts an email submission.
    ///
    /// # Errors
    ///
    /// See [`AccessGate::begin_email`].
    pub fn begin_email(&mut self, email: &str) -> Result<Tagged<EmailRequest>, FlowError> {
        let request = self.gate.begin_email(email)?;
        Ok(Tagged {
            token: self.token(),
            request,
        })
    }

    /// Applies an email validation answer.
    ///
    /// # Errors
    ///
    /// [`FlowError::Stale`] for an outdated answer, otherwise see
    /// [`AccessGate::finish_email`].
    pub fn finish_email(
        &mut self,
        token: SelectionToken,
        outcome: Result<ValidationReply, FlowError>,
        now: Instant,
    ) -> Result<(), FlowError> {
        self.check_token(token, "email validation")?;
        self.gate.finish_email(outcome, now)
    }

    /// Starts a code submission.
    ///
    /// # Errors
    ///
    /// See [`AccessGate::begin_code`].
    pub fn begin_code(&mut self, code: &str) -> Result<Tagged<CodeRequest>, FlowError> {
        let request = self.gate.begin_code(code)?;
        Ok(Tagged {
            token: self.token(),
            request,
        })
    }

    /// Applies a code validation answer against the loaded report.
    ///
    /// On verification returns the notification to send; the report's own
    /// handle is preferred over the brand's.
    ///
    /// # Errors
    ///
    /// [`FlowError::Stale`] for an outdated answer, otherwise see
    /// [`AccessGate::finish_code`].
    pub fn finish_code(
        &mut self,
        token: SelectionToken,
        outcome: Result<ValidationReply, FlowError>,
        now: Instant,
    ) -> Result<SendRequest, FlowError> {
        self.check_token(token, "code validation")?;
        let summary = self.report.summary();
        let url = summary.and_then(ReportSummary::report_url);
        self.gate.finish_code(outcome, url, now)?;

        let handle = summary
            .and_then(|s| s.handle.clone())
            .filter(|h| !h.trim().is_empty())
            .or_else(|| self.active.as_ref().map(|b| b.handle.clone()))
            .unwrap_or_default();
        Ok(SendRequest {
            handle,
            email: self.gate.email().to_string(),
        })
    }

    /// Clears expired feedback.
    pub fn tick(&mut self, now: Instant) {
        self.gate.expire_feedback(now);
    }

    // -- report contents carousel ----------------------------------------

    pub fn next_content(&mut self) {
        self.contents.next(REPORT_CONTENTS.len());
    }

    pub fn prev_content(&mut self) {
        self.contents.prev();
    }

    pub fn jump_content(&mut self, index: usize) {
        self.contents.jump(index, REPORT_CONTENTS.len());
    }

    /// Switches between the narrow (one item) and wide (three item) layout.
    pub fn set_narrow(&mut self, narrow: bool) {
        self.contents
            .resize(contents_per_view(narrow), REPORT_CONTENTS.len());
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
