use serde::{Deserialize, Deserializer, Serialize};

/// Detailed report data for a single brand, keyed by the brand handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_ads: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub platforms: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub images: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub videos: u64,
    #[serde(default)]
    pub brand_overview: Option<String>,
    #[serde(default)]
    pub meta_advertising_overview: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default, rename = "reportURL")]
    pub report_url: Option<String>,
}

impl ReportSummary {
    /// The report URL, if the server has produced one.
    #[must_use]
    pub fn report_url(&self) -> Option<&str> {
        self.report_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Loading state of the report for the active brand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportState {
    #[default]
    Idle,
    Loading,
    Loaded(ReportSummary),
    Failed(String),
}

impl ReportState {
    #[must_use]
    pub fn summary(&self) -> Option<&ReportSummary> {
        match self {
            ReportState::Loaded(s) => Some(s),
            _ => None,
        }
    }
}

/// Accepts counts as JSON numbers, numeric strings or null; anything that
/// does not read as a non-negative integer becomes 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .unwrap_or_else(|| n.as_f64().map_or(0, truncate_count)),
        Some(serde_json::Value::String(s)) => leading_integer(&s),
        _ => 0,
    })
}

/// Float counts are truncated; `as` saturates, and negatives and NaN land on 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_count(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 {
        f.trunc() as u64
    } else {
        0
    }
}

fn leading_integer(s: &str) -> u64 {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_names() {
        let summary: ReportSummary = serde_json::from_value(serde_json::json!({
            "fullName": "Acme Co",
            "category": "Tools",
            "profilePic": "https://cdn/acme.png",
            "totalAds": 42,
            "platforms": "3",
            "images": null,
            "videos": 7.9,
            "brandOverview": "Overview",
            "metaAdvertisingOverview": "Meta",
            "goal": "Goal",
            "handle": "acme",
            "reportURL": "https://x/preview"
        }))
        .unwrap();

        assert_eq!(summary.full_name.as_deref(), Some("Acme Co"));
        assert_eq!(summary.total_ads, 42);
        assert_eq!(summary.platforms, 3);
        assert_eq!(summary.images, 0);
        assert_eq!(summary.videos, 7);
        assert_eq!(summary.report_url(), Some("https://x/preview"));
    }

    #[test]
    fn missing_fields_default() {
        let summary: ReportSummary = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(summary, ReportSummary::default());
        assert!(summary.report_url().is_none());
    }

    #[test]
    fn blank_report_url_counts_as_absent() {
        let summary = ReportSummary {
            report_url: Some("  ".into()),
            ..ReportSummary::default()
        };
        assert!(summary.report_url().is_none());
    }

    #[test]
    fn non_numeric_count_is_zero() {
        let summary: ReportSummary =
            serde_json::from_value(serde_json::json!({"totalAds": "lots", "images": -4}))
                .unwrap();
        assert_eq!(summary.total_ads, 0);
        assert_eq!(summary.images, 0);
    }
}
