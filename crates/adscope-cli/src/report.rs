//! Report command handler and the report screen shared with `explore`.

use std::io::Write as _;

use adscope_client::{fetch_report, submit_code, submit_email, AdsClient};
use adscope_core::{AppConfig, CountUp, Explorer, FlowError, ReportSession, ReportState};
use chrono::Utc;

use crate::animate::{CountUpTask, FRAME};
use crate::explore::Input;
use crate::{brands, render};

/// Prints the active brand's report: header, stats, overviews and the
/// contents carousel. With `animate`, loaded stats count up from zero.
pub(crate) async fn show_report(session: &ReportSession, animate: bool) {
    let Some(view) = session.view() else {
        println!("No brand selected.");
        return;
    };

    if animate && matches!(session.report(), ReportState::Loaded(_)) {
        print!("{}", render::report_header(&view, session.report()));
        println!();
        let counters = view.stats.each_ref().map(|s| CountUp::new(s.value));
        let frame_view = view.clone();
        CountUpTask::spawn(counters, FRAME, move |values| {
            let mut stdout = std::io::stdout().lock();
            let _ = write!(stdout, "\r{}", render::stats_line(&frame_view, Some(values)));
            let _ = stdout.flush();
        })
        .finish()
        .await;
        println!();
        print!("{}", render::overviews(&view));
    } else {
        print!("{}", render::report(&view, session.report()));
    }
    println!();
    print!("{}", render::contents(session.contents()));
}

/// Whether a failed code submission should prompt for another code.
///
/// Only a refused code or a blank entry is worth retrying. An accepted code
/// with no report URL to unlock fails the same way on every attempt.
fn code_retryable(err: &FlowError, code: &str) -> bool {
    match err {
        FlowError::ValidationRejected(_) => true,
        FlowError::MissingPrecondition(_) => code.trim().is_empty(),
        _ => false,
    }
}

/// Show the report for `brand_id`, optionally unlocking the presentation.
///
/// With `unlock`, asks for an email (unless given) and then the emailed
/// verification code, retrying the code until it is accepted.
///
/// # Errors
///
/// Returns an error if the catalog or report fails to load, the brand id
/// is unknown, or verification fails for any reason other than a rejected
/// or blank code. An accepted code for a report without a URL is an error.
pub(crate) async fn run_report(
    client: &AdsClient,
    config: &AppConfig,
    brand_id: &str,
    unlock: bool,
    email: Option<&str>,
) -> anyhow::Result<()> {
    let catalog = brands::load_or_report(client, config).await?;
    let mut explorer = Explorer::new(catalog);
    explorer.select(brand_id)?;
    explorer.confirm()?;

    println!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC"));
    println!();
    let fetched = fetch_report(client, explorer.session_mut()).await;
    show_report(explorer.session(), true).await;
    fetched?;

    if !unlock {
        return Ok(());
    }

    println!();
    let mut input = Input::stdin();
    let email = match email {
        Some(e) => e.to_string(),
        None => input
            .ask("Email: ")
            .await?
            .ok_or_else(|| anyhow::anyhow!("no email entered"))?,
    };
    let sent = submit_email(client, explorer.session_mut(), &email).await;
    print!("{}", render::access(explorer.session().gate()));
    sent?;

    loop {
        let Some(code) = input.ask("Code: ").await? else {
            anyhow::bail!("no verification code entered");
        };
        match submit_code(client, explorer.session_mut(), &code).await {
            Ok(verified) => {
                let name = explorer
                    .session()
                    .active()
                    .map_or_else(String::new, |b| b.name.clone());
                println!();
                print!("{}", render::viewer(&name, Some(&verified.viewer_url)));
                if let Err(e) = verified.notification.await {
                    tracing::debug!(error = %e, "send notification task did not complete");
                }
                return Ok(());
            }
            Err(e) if code_retryable(&e, &code) => {
                print!("{}", render::access(explorer.session().gate()));
            }
            Err(e) => {
                print!("{}", render::access(explorer.session().gate()));
                return Err(e.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_code_is_retried() {
        let err = FlowError::ValidationRejected("Invalid code".into());
        assert!(code_retryable(&err, "123456"));
    }

    #[test]
    fn blank_code_is_retried() {
        let err = FlowError::MissingPrecondition("Please enter the validation code.".into());
        assert!(code_retryable(&err, "   "));
    }

    #[test]
    fn accepted_code_without_report_url_stops() {
        let err = FlowError::MissingPrecondition("Report URL not found. Please try again.".into());
        assert!(!code_retryable(&err, "123456"));
    }

    #[test]
    fn transport_failure_stops() {
        let err = FlowError::NetworkFailure("connection reset".into());
        assert!(!code_retryable(&err, "123456"));
    }
}
