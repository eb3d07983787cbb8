//! Two-step email verification gating the report URL.
//!
//! The gate is I/O-free. Each submission is split into a `begin_*` call,
//! which validates the transition and marks the request in flight, and a
//! `finish_*` call that applies the server's answer. Feedback messages never
//! move the stage; they only annotate it and expire after
//! [`FEEDBACK_TTL`] unless the gate has been verified.

use std::time::{Duration, Instant};

use crate::error::FlowError;

/// How long a feedback message stays visible before it clears itself.
pub const FEEDBACK_TTL: Duration = Duration::from_secs(5);

const EMAIL_FAILURE: &str = "An error occurred while validating your email. Please try again.";
const CODE_FAILURE: &str = "An error occurred while validating your code. Please try again.";
const URL_NOT_FOUND: &str = "Report URL not found. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessStage {
    #[default]
    Idle,
    AwaitingCode,
    Verified {
        report_url: String,
    },
}

/// Which form a feedback message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackContext {
    Email,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub context: FeedbackContext,
    pub severity: Severity,
    pub posted_at: Instant,
}

/// The validation endpoint's answer: `{success, msg}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReply {
    pub success: bool,
    pub msg: Option<String>,
}

/// Email submission ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRequest {
    pub email: String,
}

/// Code submission ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    stage: AccessStage,
    email: String,
    code: String,
    feedback: Option<Feedback>,
    in_flight: Option<FeedbackContext>,
}

impl AccessGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(&self) -> &AccessStage {
        &self.stage
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Whether a submission is outstanding; the triggering action stays
    /// disabled until it resolves.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The revealed report URL, only once verified.
    #[must_use]
    pub fn verified_url(&self) -> Option<&str> {
        match &self.stage {
            AccessStage::Verified { report_url } => Some(report_url),
            _ => None,
        }
    }

    /// Returns the gate to `Idle` with no inputs, feedback or pending call.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validates and records an email submission.
    ///
    /// # Errors
    ///
    /// - [`FlowError::Busy`] while an email submission is outstanding.
    /// - [`FlowError::InvalidTransition`] unless the gate is `Idle`.
    /// - [`FlowError::MissingPrecondition`] for a blank email.
    pub fn begin_email(&mut self, email: &str) -> Result<EmailRequest, FlowError> {
        if self.in_flight.is_some() {
            return Err(FlowError::Busy("email validation"));
        }
        if self.stage != AccessStage::Idle {
            return Err(FlowError::InvalidTransition(
                "Email already submitted.".to_string(),
            ));
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(FlowError::MissingPrecondition(
                "Please enter an email address.".to_string(),
            ));
        }

        email.clone_into(&mut self.email);
        self.feedback = None;
        self.in_flight = Some(FeedbackContext::Email);
        Ok(EmailRequest {
            email: self.email.clone(),
        })
    }

    /// Applies the validation endpoint's answer to an email submission.
    ///
    /// # Errors
    ///
    /// Mirrors the error feedback that was posted:
    /// [`FlowError::ValidationRejected`] when the server refused the email,
    /// or the transport error when the call itself failed.
    pub fn finish_email(
        &mut self,
        outcome: Result<ValidationReply, FlowError>,
        now: Instant,
    ) -> Result<(), FlowError> {
        self.in_flight = None;
        match outcome {
            Ok(reply) if reply.success => {
                self.stage = AccessStage::AwaitingCode;
                let text = reply
                    .msg
                    .unwrap_or_else(|| "Verification code sent.".to_string());
                tracing::info!("email accepted; awaiting verification code");
                self.post(text, FeedbackContext::Email, Severity::Info, now);
                Ok(())
            }
            Ok(reply) => {
                let text = reply
                    .msg
                    .unwrap_or_else(|| "Email could not be validated.".to_string());
                self.post(text.clone(), FeedbackContext::Email, Severity::Error, now);
                Err(FlowError::ValidationRejected(text))
            }
            Err(e) => {
                tracing::warn!(error = %e, "email validation request failed");
                self.post(
                    EMAIL_FAILURE.to_string(),
                    FeedbackContext::Email,
                    Severity::Error,
                    now,
                );
                Err(e)
            }
        }
    }

    /// Validates and records a code submission.
    ///
    /// # Errors
    ///
    /// - [`FlowError::Busy`] while a code submission is outstanding.
    /// - [`FlowError::InvalidTransition`] unless the gate is awaiting a code.
    /// - [`FlowError::MissingPrecondition`] for a blank code.
    pub fn begin_code(&mut self, code: &str) -> Result<CodeRequest, FlowError> {
        if self.in_flight.is_some() {
            return Err(FlowError::Busy("code validation"));
        }
        if self.stage != AccessStage::AwaitingCode {
            return Err(FlowError::InvalidTransition(
                "Submit your email before entering a code.".to_string(),
            ));
        }
        let code = code.trim();
        if code.is_empty() {
            return Err(FlowError::MissingPrecondition(
                "Please enter the validation code.".to_string(),
            ));
        }

        code.clone_into(&mut self.code);
        self.feedback = None;
        self.in_flight = Some(FeedbackContext::Code);
        Ok(CodeRequest {
            email: self.email.clone(),
            code: self.code.clone(),
        })
    }

    /// Applies the validation endpoint's answer to a code submission.
    ///
    /// Verification needs both an accepted code and a `report_url` from the
    /// already-fetched report; without the URL the gate stays awaiting a
    /// code and posts an error.
    ///
    /// # Errors
    ///
    /// - [`FlowError::ValidationRejected`] when the server refused the code;
    ///   the code input is cleared.
    /// - [`FlowError::MissingPrecondition`] when no report URL is available.
    /// - The transport error when the call itself failed.
    pub fn finish_code(
        &mut self,
        outcome: Result<ValidationReply, FlowError>,
        report_url: Option<&str>,
        now: Instant,
    ) -> Result<(), FlowError> {
        self.in_flight = None;
        match outcome {
            Ok(reply) if reply.success => match report_url {
                Some(url) => {
                    tracing::info!("verification code accepted; report unlocked");
                    self.feedback = None;
                    self.stage = AccessStage::Verified {
                        report_url: url.to_string(),
                    };
                    Ok(())
                }
                None => {
                    tracing::warn!("code accepted but the report has no URL");
                    self.post(
                        URL_NOT_FOUND.to_string(),
                        FeedbackContext::Code,
                        Severity::Error,
                        now,
                    );
                    Err(FlowError::MissingPrecondition(URL_NOT_FOUND.to_string()))
                }
            },
            Ok(reply) => {
                self.code.clear();
                let text = reply
                    .msg
                    .unwrap_or_else(|| "Invalid validation code.".to_string());
                self.post(text.clone(), FeedbackContext::Code, Severity::Error, now);
                Err(FlowError::ValidationRejected(text))
            }
            Err(e) => {
                tracing::warn!(error = %e, "code validation request failed");
                self.post(
                    CODE_FAILURE.to_string(),
                    FeedbackContext::Code,
                    Severity::Error,
                    now,
                );
                Err(e)
            }
        }
    }

    /// Clears feedback older than [`FEEDBACK_TTL`], unless verified.
    pub fn expire_feedback(&mut self, now: Instant) {
        if matches!(self.stage, AccessStage::Verified { .. }) {
            return;
        }
        if self
            .feedback
            .as_ref()
            .is_some_and(|f| now.saturating_duration_since(f.posted_at) >= FEEDBACK_TTL)
        {
            self.feedback = None;
        }
    }

    fn post(&mut self, text: String, context: FeedbackContext, severity: Severity, now: Instant) {
        self.feedback = Some(Feedback {
            text,
            context,
            severity,
            posted_at: now,
        });
    }
}

#[cfg(test)]
#[path = "access_test.rs"]
mod tests;
