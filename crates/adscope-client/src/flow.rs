//! Async drivers connecting [`AdsClient`] calls to the core state machines.
//!
//! Each driver follows the same shape: ask the state machine to begin (which
//! validates the transition and marks the action busy), perform the call,
//! then hand the outcome back tagged with the selection it was issued for.

use std::time::Instant;

use adscope_core::{CatalogStore, FlowError, ReportSession, SendRequest};
use tokio::task::JoinHandle;

use crate::client::AdsClient;

/// Result of a successful code verification.
#[derive(Debug)]
pub struct Verified {
    /// Report URL rewritten for the embedded viewer.
    pub viewer_url: String,
    /// The background send notification. Dropping it detaches the task.
    pub notification: JoinHandle<()>,
}

/// Loads the catalog into `catalog`.
///
/// # Errors
///
/// [`FlowError::Busy`] if a load is already running; otherwise the fetch
/// error, which has also been recorded as the catalog's failed state.
pub async fn load_catalog(client: &AdsClient, catalog: &mut CatalogStore) -> Result<(), FlowError> {
    catalog.begin_load()?;
    let outcome = client.fetch_catalog().await.map_err(FlowError::from);
    let result = outcome.as_ref().map(|_| ()).map_err(Clone::clone);
    catalog.finish_load(outcome);
    result
}

/// Fetches the report for the session's active brand.
///
/// # Errors
///
/// [`FlowError::MissingPrecondition`] without an active handle (no request
/// is made), [`FlowError::Stale`] if the selection changed meanwhile, or the
/// fetch error.
pub async fn fetch_report(client: &AdsClient, session: &mut ReportSession) -> Result<(), FlowError> {
    let tagged = session.begin_report()?;
    let outcome = client
        .fetch_report(&tagged.request.handle)
        .await
        .map_err(FlowError::from);
    session.finish_report(tagged.token, outcome)
}

/// Submits `email` for validation.
///
/// # Errors
///
/// See [`ReportSession::begin_email`] and [`ReportSession::finish_email`].
pub async fn submit_email(
    client: &AdsClient,
    session: &mut ReportSession,
    email: &str,
) -> Result<(), FlowError> {
    let tagged = session.begin_email(email)?;
    let outcome = client
        .validate_email(&tagged.request.email)
        .await
        .map_err(FlowError::from);
    session.finish_email(tagged.token, outcome, Instant::now())
}

/// Submits the verification `code`. On success the report's send
/// notification is fired in the background; its outcome is only logged.
///
/// # Errors
///
/// See [`ReportSession::begin_code`] and [`ReportSession::finish_code`].
pub async fn submit_code(
    client: &AdsClient,
    session: &mut ReportSession,
    code: &str,
) -> Result<Verified, FlowError> {
    let tagged = session.begin_code(code)?;
    let outcome = client
        .validate_code(&tagged.request.email, &tagged.request.code)
        .await
        .map_err(FlowError::from);
    let send = session.finish_code(tagged.token, outcome, Instant::now())?;

    let viewer_url = session
        .gate()
        .verified_url()
        .map(adscope_core::viewer_url)
        .unwrap_or_default();

    Ok(Verified {
        viewer_url,
        notification: spawn_send(client.clone(), send),
    })
}

/// Fires the send notification without waiting for it.
fn spawn_send(client: AdsClient, send: SendRequest) -> JoinHandle<()> {
    tokio::spawn(async move {
        match client.send_report(&send.handle, &send.email).await {
            Ok(body) => tracing::debug!(handle = %send.handle, response = %body, "send action completed"),
            Err(e) => tracing::warn!(handle = %send.handle, error = %e, "send action failed"),
        }
    })
}
