//! Display model for a brand report.
//!
//! Everything here is derived data: which values to show, which fallbacks
//! to use while loading or when a field is empty, and how the report URL is
//! rewritten for the viewer. Rendering to a terminal lives in the CLI.

use std::time::Duration;

use crate::brand::Brand;
use crate::report::ReportSummary;

pub const PLACEHOLDER_LOGO: &str = "https://placehold.co/64x64/FFFFFF/000000?text=LOGO&font=Inter";

/// Duration of the stat count-up.
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(1500);

/// A static description of one section of the generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContent {
    pub title: &'static str,
    pub description: &'static str,
}

pub const REPORT_CONTENTS: [ReportContent; 8] = [
    ReportContent {
        title: "Strategic Overview",
        description: "Analysis of overall Meta advertising strategy and competitive positioning",
    },
    ReportContent {
        title: "Top Performing Ads",
        description: "Gallery of highest-converting creative examples and performance insights",
    },
    ReportContent {
        title: "Creative Strategy Breakdown",
        description: "Analysis of messaging themes, content pillars, and visual approach strategies",
    },
    ReportContent {
        title: "Campaign Architecture Strategy",
        description: "Analysis of campaign structure, organization, and execution strategies",
    },
    ReportContent {
        title: "Ad Formats",
        description: "Performance breakdown across video, image, carousel, and collection formats",
    },
    ReportContent {
        title: "Seasonality and Campaigns",
        description: "Analysis of seasonal adaptation strategies and special event campaigns",
    },
    ReportContent {
        title: "Customer Journey and Monetization",
        description: "Analysis of conversion tactics and customer path from awareness to purchase",
    },
    ReportContent {
        title: "Key Findings and Recommendations",
        description: "Strategic opportunities and actionable implementation insights",
    },
];

/// Window size of the report contents carousel.
#[must_use]
pub fn contents_per_view(narrow: bool) -> usize {
    if narrow {
        1
    } else {
        3
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub title: &'static str,
    pub text: String,
}

/// Everything the report header, stats and narrative sections show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub brand_name: String,
    pub category: String,
    pub logo_url: String,
    pub stats: [Stat; 4],
    pub overviews: [Overview; 3],
}

impl ReportView {
    /// Builds the view for `brand`, using `summary` once it has loaded.
    ///
    /// Without a summary the view shows loading placeholders and zeroed
    /// stats.
    #[must_use]
    pub fn new(brand: &Brand, summary: Option<&ReportSummary>) -> Self {
        let Some(summary) = summary else {
            return Self::loading(brand);
        };

        Self {
            brand_name: first_present(&[summary.full_name.as_deref(), Some(brand.name.as_str())])
                .unwrap_or("N/A")
                .to_string(),
            category: first_present(&[
                summary.category.as_deref(),
                Some(brand.category.as_str()),
            ])
            .unwrap_or("N/A")
            .to_string(),
            logo_url: first_present(&[summary.profile_pic.as_deref(), brand.logo_url.as_deref()])
                .unwrap_or(PLACEHOLDER_LOGO)
                .to_string(),
            stats: stats(
                summary.total_ads,
                summary.platforms,
                summary.images,
                summary.videos,
            ),
            overviews: [
                overview(
                    "Brand Overview",
                    summary.brand_overview.as_deref(),
                    "No brand overview available.",
                ),
                overview(
                    "Meta Advertising Overview",
                    summary.meta_advertising_overview.as_deref(),
                    "No meta advertising overview available.",
                ),
                overview(
                    "Goal of this Analysis",
                    summary.goal.as_deref(),
                    "No analysis goal available.",
                ),
            ],
        }
    }

    fn loading(brand: &Brand) -> Self {
        Self {
            brand_name: brand.name.clone(),
            category: brand.category.clone(),
            logo_url: brand
                .logo_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_LOGO.to_string()),
            stats: stats(0, 0, 0, 0),
            overviews: [
                overview("Brand Overview", None, "Loading brand overview..."),
                overview(
                    "Meta Advertising Overview",
                    None,
                    "Loading meta advertising overview...",
                ),
                overview("Goal of this Analysis", None, "Loading analysis goal..."),
            ],
        }
    }
}

fn stats(total_ads: u64, platforms: u64, images: u64, videos: u64) -> [Stat; 4] {
    [
        Stat {
            label: "Total Ads Analyzed",
            value: total_ads,
        },
        Stat {
            label: "Channels Analyzed",
            value: platforms,
        },
        Stat {
            label: "Total Images",
            value: images,
        },
        Stat {
            label: "Total Videos",
            value: videos,
        },
    ]
}

fn overview(title: &'static str, text: Option<&str>, fallback: &str) -> Overview {
    Overview {
        title,
        text: first_present(&[text]).unwrap_or(fallback).to_string(),
    }
}

fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

/// Rewrites a report URL for display: a trailing `/preview` path segment
/// becomes `/view`. Query string and fragment are preserved.
#[must_use]
pub fn viewer_url(report_url: &str) -> String {
    let (base, tail) = match report_url.find(['?', '#']) {
        Some(i) => report_url.split_at(i),
        None => (report_url, ""),
    };
    let trimmed = base.strip_suffix('/').unwrap_or(base);
    match trimmed.strip_suffix("/preview") {
        Some(prefix) => format!("{prefix}/view{tail}"),
        None => report_url.to_string(),
    }
}

/// Title used for the embedded report viewer.
#[must_use]
pub fn viewer_title(brand_name: &str) -> String {
    format!("{brand_name} Meta Ads Analysis")
}

/// Linear count from 0 to `target` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUp {
    pub target: u64,
    pub duration: Duration,
}

impl CountUp {
    #[must_use]
    pub fn new(target: u64) -> Self {
        Self {
            target,
            duration: COUNT_UP_DURATION,
        }
    }

    /// Value shown `elapsed` after the start: `floor(progress * target)`,
    /// reaching `target` exactly once the duration has passed.
    #[must_use]
    pub fn value_at(&self, elapsed: Duration) -> u64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.target;
        }
        let scaled = u128::from(self.target) * elapsed.as_nanos() / self.duration.as_nanos();
        u64::try_from(scaled).unwrap_or(self.target)
    }

    #[must_use]
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::RawBrand;

    fn brand() -> Brand {
        Brand::from_raw(RawBrand {
            brand: "Acme".into(),
            category: Some("Tools".into()),
            pic: Some("https://cdn/acme-list.png".into()),
            ..RawBrand::default()
        })
    }

    #[test]
    fn viewer_url_swaps_preview_suffix() {
        assert_eq!(viewer_url("https://x/preview"), "https://x/view");
        assert_eq!(
            viewer_url("https://docs.example.com/p/abc/preview?slide=2"),
            "https://docs.example.com/p/abc/view?slide=2"
        );
        assert_eq!(viewer_url("https://x/preview/"), "https://x/view");
    }

    #[test]
    fn viewer_url_leaves_other_urls_alone() {
        assert_eq!(viewer_url("https://x/edit"), "https://x/edit");
        assert_eq!(viewer_url("https://x/previews"), "https://x/previews");
    }

    #[test]
    fn view_prefers_report_fields() {
        let summary = ReportSummary {
            full_name: Some("Acme Corporation".into()),
            profile_pic: Some("https://cdn/acme.png".into()),
            total_ads: 42,
            videos: 5,
            goal: Some("Grow".into()),
            ..ReportSummary::default()
        };
        let view = ReportView::new(&brand(), Some(&summary));
        assert_eq!(view.brand_name, "Acme Corporation");
        assert_eq!(view.category, "Tools");
        assert_eq!(view.logo_url, "https://cdn/acme.png");
        assert_eq!(view.stats[0].value, 42);
        assert_eq!(view.stats[3].value, 5);
        assert_eq!(view.overviews[0].text, "No brand overview available.");
        assert_eq!(view.overviews[2].text, "Grow");
    }

    #[test]
    fn loading_view_uses_placeholders() {
        let view = ReportView::new(&brand(), None);
        assert_eq!(view.brand_name, "Acme");
        assert_eq!(view.logo_url, "https://cdn/acme-list.png");
        assert!(view.stats.iter().all(|s| s.value == 0));
        assert_eq!(view.overviews[1].text, "Loading meta advertising overview...");
    }

    #[test]
    fn contents_are_static_and_eight_long() {
        assert_eq!(REPORT_CONTENTS.len(), 8);
        assert_eq!(REPORT_CONTENTS[0].title, "Strategic Overview");
        assert_eq!(contents_per_view(true), 1);
        assert_eq!(contents_per_view(false), 3);
    }

    #[test]
    fn count_up_interpolates_linearly() {
        let c = CountUp {
            target: 100,
            duration: Duration::from_millis(1000),
        };
        assert_eq!(c.value_at(Duration::ZERO), 0);
        assert_eq!(c.value_at(Duration::from_millis(250)), 25);
        assert_eq!(c.value_at(Duration::from_millis(999)), 99);
        assert_eq!(c.value_at(Duration::from_millis(5000)), 100);
        assert!(c.is_finished(Duration::from_millis(1000)));
    }

    #[test]
    fn viewer_title_names_brand() {
        assert_eq!(viewer_title("Acme"), "Acme Meta Ads Analysis");
    }
}
