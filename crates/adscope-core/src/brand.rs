use serde::{Deserialize, Deserializer, Serialize};

use crate::numbers::parse_compact_number;

/// Placeholder used when the feed leaves `category` or `quality` empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// A single catalog record exactly as the feed returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBrand {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub pic: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub followers: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ads: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
}

/// A numeric metric paired with the display string the feed supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub raw: f64,
    pub formatted: Option<String>,
}

impl Metric {
    fn parse(formatted: Option<String>) -> Self {
        Self {
            raw: parse_compact_number(formatted.as_deref()),
            formatted,
        }
    }

    /// Display string: the feed's own formatting when present, otherwise a
    /// compact rendering of the raw value.
    #[must_use]
    pub fn display(&self) -> String {
        match self.formatted.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => crate::numbers::format_compact_number(self.raw),
        }
    }
}

/// A brand available for selection on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub category: String,
    pub description: String,
    pub quality: String,
    pub handle: String,
    pub followers: Metric,
    pub total_ads: Metric,
}

impl Brand {
    /// Maps a raw feed record, filling derived identifiers and defaults.
    #[must_use]
    pub fn from_raw(raw: RawBrand) -> Self {
        let id = brand_id(&raw.brand);
        let handle = non_empty(raw.handle).unwrap_or_else(|| default_handle(&raw.brand));

        Self {
            id,
            logo_url: non_empty(raw.pic),
            category: non_empty(raw.category).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            description: raw.description.unwrap_or_default(),
            quality: non_empty(raw.quality).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            handle,
            followers: Metric::parse(raw.followers),
            total_ads: Metric::parse(raw.ads),
            name: raw.brand,
        }
    }
}

/// Lowercased name with every whitespace run replaced by a single `-`.
#[must_use]
pub fn brand_id(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Lowercased name with all whitespace removed.
#[must_use]
pub fn default_handle(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_lowercase()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Accepts a JSON string, number or null and yields it as optional text.
///
/// The feed is inconsistent about quoting its counters.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawBrand {
        RawBrand {
            brand: name.to_string(),
            ..RawBrand::default()
        }
    }

    #[test]
    fn id_collapses_whitespace_runs() {
        assert_eq!(brand_id("Liquid  Death Water"), "liquid-death-water");
    }

    #[test]
    fn default_handle_strips_whitespace() {
        assert_eq!(default_handle("Liquid Death"), "liquiddeath");
    }

    #[test]
    fn from_raw_derives_handle_when_absent() {
        let brand = Brand::from_raw(raw("Glossier Beauty"));
        assert_eq!(brand.id, "glossier-beauty");
        assert_eq!(brand.handle, "glossierbeauty");
    }

    #[test]
    fn from_raw_keeps_explicit_handle() {
        let mut r = raw("Glossier");
        r.handle = Some("glossier_official".into());
        assert_eq!(Brand::from_raw(r).handle, "glossier_official");
    }

    #[test]
    fn from_raw_defaults_category_and_quality() {
        let mut r = raw("Acme");
        r.category = Some(String::new());
        let brand = Brand::from_raw(r);
        assert_eq!(brand.category, NOT_AVAILABLE);
        assert_eq!(brand.quality, NOT_AVAILABLE);
        assert_eq!(brand.description, "");
    }

    #[test]
    fn from_raw_parses_metrics() {
        let mut r = raw("Acme");
        r.followers = Some("7.98m+".into());
        r.ads = Some("garbage".into());
        let brand = Brand::from_raw(r);
        assert!((brand.followers.raw - 7_980_000.0).abs() < 1e-6);
        assert_eq!(brand.followers.display(), "7.98m+");
        assert!(brand.total_ads.raw.abs() < f64::EPSILON);
    }

    #[test]
    fn metric_display_falls_back_to_compact_format() {
        let metric = Metric {
            raw: 1_500_000.0,
            formatted: None,
        };
        assert_eq!(metric.display(), "1.5M");
    }

    #[test]
    fn raw_brand_accepts_numeric_counters() {
        let r: RawBrand = serde_json::from_value(serde_json::json!({
            "brand": "Acme",
            "followers": 1200,
            "ads": null
        }))
        .unwrap();
        assert_eq!(r.followers.as_deref(), Some("1200"));
        assert!(r.ads.is_none());
    }
}
