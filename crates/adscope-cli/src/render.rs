//! Plain-text rendering of the leaderboard, the featured carousel and the
//! report screens.
//!
//! Every function returns a `String` so output can be asserted on in tests;
//! the command handlers do the printing.

use std::fmt::Write as _;

use adscope_core::carousel::Carousel;
use adscope_core::catalog::bar_percentage;
use adscope_core::presenter::{viewer_title, ReportContent};
use adscope_core::{
    AccessGate, AccessStage, Brand, CatalogStatus, CatalogStore, MetricField, ReportState,
    ReportView, Severity, REPORT_CONTENTS,
};

/// Width of a magnitude bar in characters.
pub(crate) const BAR_WIDTH: usize = 20;

const NO_REPORT_URL: &str = "No report URL available. Please try again.";

/// A bar of `BAR_WIDTH` cells, filled in proportion to `value / max`.
pub(crate) fn stat_bar(value: f64, max: f64) -> String {
    let pct = bar_percentage(value, max);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round().max(0.0) as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

/// The leaderboard page: one row per brand with followers and ads bars
/// scaled against the catalog maxima.
pub(crate) fn leaderboard(catalog: &CatalogStore) -> String {
    let mut out = String::new();
    match catalog.status() {
        CatalogStatus::NotLoaded | CatalogStatus::Loading => {
            out.push_str("Loading brands...\n");
            return out;
        }
        CatalogStatus::Failed(message) => {
            let _ = writeln!(out, "{message}");
            return out;
        }
        CatalogStatus::Ready => {}
    }

    let rows = catalog.page();
    let _ = writeln!(
        out,
        "Sorted by: {} | showing {} of {}",
        catalog.sort_label(),
        rows.len(),
        catalog.view().len()
    );
    if rows.is_empty() {
        if catalog.search_term().is_empty() {
            out.push_str("No brands found.\n");
        } else {
            let _ = writeln!(out, "No brands match \"{}\".", catalog.search_term());
        }
        return out;
    }

    let max_followers = catalog.max_of(MetricField::Followers);
    let max_ads = catalog.max_of(MetricField::TotalAds);
    let _ = writeln!(
        out,
        "{:<4}{:<26}{:<18}{:<10}{:<22}{:<8}{:<22}ID",
        "#", "BRAND", "CATEGORY", "FOLLOWERS", "", "ADS", ""
    );
    for (rank, brand) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4}{:<26}{:<18}{:<10}{:<22}{:<8}{:<22}{}",
            rank + 1,
            truncate(&brand.name, 22),
            truncate(&brand.category, 15),
            brand.followers.display(),
            stat_bar(brand.followers.raw, max_followers),
            brand.total_ads.display(),
            stat_bar(brand.total_ads.raw, max_ads),
            brand.id,
        );
    }
    if catalog.has_more() {
        out.push_str("(more brands available: `more`)\n");
    }
    out
}

/// The featured carousel window with its position indicator.
pub(crate) fn featured(catalog: &CatalogStore) -> String {
    let samples = catalog.sample_set();
    if samples.is_empty() {
        return "No featured brands.\n".to_string();
    }
    let carousel = catalog.sample_carousel();
    let mut out = String::new();
    let _ = writeln!(out, "Featured {}", dots(carousel, samples.len()));
    for brand in catalog.visible_samples() {
        let _ = writeln!(
            out,
            "  * {} ({}) - {} followers, {} ads [{}]",
            brand.name,
            brand.category,
            brand.followers.display(),
            brand.total_ads.display(),
            brand.id
        );
    }
    out
}

/// One marker per carousel position, the current one filled.
fn dots(carousel: &Carousel, len: usize) -> String {
    (0..carousel.positions(len).max(1))
        .map(|i| if i == carousel.index() { 'o' } else { '.' })
        .collect()
}

/// The staged-brand confirmation prompt.
pub(crate) fn confirmation(brand: &Brand) -> String {
    format!(
        "Selected: {} ({})\n{}\n`confirm` to view the report, `change` to pick another brand.\n",
        brand.name, brand.category, brand.description
    )
}

/// Report header, stats and overview sections.
pub(crate) fn report(view: &ReportView, state: &ReportState) -> String {
    format!(
        "{}\n{}\n{}",
        report_header(view, state),
        stats_line(view, None),
        overviews(view)
    )
}

/// Brand name, category, logo and the loading or failure line.
pub(crate) fn report_header(view: &ReportView, state: &ReportState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} | {}", view.brand_name, view.category);
    let _ = writeln!(out, "Logo: {}", view.logo_url);
    match state {
        ReportState::Loading | ReportState::Idle => out.push_str("Loading report...\n"),
        ReportState::Failed(message) => {
            let _ = writeln!(out, "{message}");
        }
        ReportState::Loaded(_) => {}
    }
    out
}

pub(crate) fn overviews(view: &ReportView) -> String {
    let mut out = String::new();
    for section in &view.overviews {
        let _ = writeln!(out, "\n{}\n{}", section.title, section.text);
    }
    out
}

/// The four stat tiles on a single line.
///
/// `stat_values` overrides the displayed values while they count up.
pub(crate) fn stats_line(view: &ReportView, stat_values: Option<[u64; 4]>) -> String {
    view.stats
        .iter()
        .enumerate()
        .map(|(i, stat)| {
            let value = stat_values.map_or(stat.value, |v| v[i]);
            format!("{}: {value}", stat.label)
        })
        .collect::<Vec<_>>()
        .join("  |  ")
}

/// The "what's in the report" carousel.
pub(crate) fn contents(carousel: &Carousel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Report contents {}",
        dots(carousel, REPORT_CONTENTS.len())
    );
    let visible: &[ReportContent] = carousel.visible(&REPORT_CONTENTS);
    for item in visible {
        let _ = writeln!(out, "  - {}: {}", item.title, item.description);
    }
    out
}

/// The access form: whichever input the gate currently wants, plus any
/// live feedback.
pub(crate) fn access(gate: &AccessGate) -> String {
    let mut out = String::new();
    match gate.stage() {
        AccessStage::Idle => {
            out.push_str("Enter your email to unlock the full report: `email <address>`\n");
        }
        AccessStage::AwaitingCode => {
            let _ = writeln!(
                out,
                "A code was sent to {}. Enter it with `code <code>`.",
                gate.email()
            );
        }
        AccessStage::Verified { .. } => out.push_str("Access granted.\n"),
    }
    if gate.is_busy() {
        out.push_str("Validating...\n");
    }
    if let Some(feedback) = gate.feedback() {
        let tag = match feedback.severity {
            Severity::Info => "info",
            Severity::Error => "error",
        };
        let _ = writeln!(out, "[{tag}] {}", feedback.text);
    }
    out
}

/// The unlocked report viewer.
pub(crate) fn viewer(brand_name: &str, viewer_url: Option<&str>) -> String {
    match viewer_url.filter(|u| !u.trim().is_empty()) {
        Some(url) => format!(
            "{}\nOpen Presentation: {url}\n",
            viewer_title(brand_name)
        ),
        None => format!("{NO_REPORT_URL}\n"),
    }
}
