//! In-memory brand catalog with filtered, sorted and paged views.
//!
//! The store owns the loaded brand list. Network access lives elsewhere:
//! callers mark a load as started with [`CatalogStore::begin_load`] and hand
//! the outcome to [`CatalogStore::finish_load`].

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::brand::{Brand, RawBrand};
use crate::carousel::Carousel;
use crate::error::FlowError;

/// Number of rows shown initially and added by each "load more".
pub const PAGE_SIZE: usize = 10;

/// Number of featured brands visible at once in the sample carousel.
pub const SAMPLE_WINDOW: usize = 3;

/// Quality tier that qualifies a brand for the featured carousel.
pub const DEFAULT_TOP_TIER: &str = "Superb";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Followers,
    TotalAds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Numeric brand metrics that can be scaled against the catalog maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    Followers,
    TotalAds,
}

/// A labelled sort choice offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    pub label: &'static str,
    pub key: SortKey,
    pub direction: SortDirection,
}

pub const SORT_OPTIONS: [SortOption; 6] = [
    SortOption {
        label: "Name (A-Z)",
        key: SortKey::Name,
        direction: SortDirection::Asc,
    },
    SortOption {
        label: "Name (Z-A)",
        key: SortKey::Name,
        direction: SortDirection::Desc,
    },
    SortOption {
        label: "Followers (High-Low)",
        key: SortKey::Followers,
        direction: SortDirection::Desc,
    },
    SortOption {
        label: "Followers (Low-High)",
        key: SortKey::Followers,
        direction: SortDirection::Asc,
    },
    SortOption {
        label: "Total Ads (High-Low)",
        key: SortKey::TotalAds,
        direction: SortDirection::Desc,
    },
    SortOption {
        label: "Total Ads (Low-High)",
        key: SortKey::TotalAds,
        direction: SortDirection::Asc,
    },
];

/// Label of the option matching `key` and `direction`, or `"Default"`.
#[must_use]
pub fn sort_label(key: SortKey, direction: SortDirection) -> &'static str {
    SORT_OPTIONS
        .iter()
        .find(|o| o.key == key && o.direction == direction)
        .map_or("Default", |o| o.label)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    NotLoaded,
    Loading,
    Ready,
    Failed(String),
}

/// Case-insensitive substring match against name, description and category.
///
/// An empty term keeps every brand.
#[must_use]
pub fn filter_brands<'a>(brands: &'a [Brand], term: &str) -> Vec<&'a Brand> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return brands.iter().collect();
    }
    brands
        .iter()
        .filter(|b| {
            b.name.to_lowercase().contains(&needle)
                || b.description.to_lowercase().contains(&needle)
                || b.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stable sort; equal elements keep their relative order in either direction.
pub fn sort_brands(brands: &mut [&Brand], key: SortKey, direction: SortDirection) {
    brands.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Name => locale_compare(&a.name, &b.name),
            SortKey::Followers => a.followers.raw.total_cmp(&b.followers.raw),
            SortKey::TotalAds => a.total_ads.raw.total_cmp(&b.total_ads.raw),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Dictionary-style comparison. Strings compare first on their base letters
/// (accents and case folded away), then on accents, then on case, with
/// lowercase ahead of uppercase.
fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| lowercase(a).cmp(&lowercase(b)))
        .then_with(|| b.cmp(a))
}

fn lowercase(s: &str) -> String {
    s.nfc().flat_map(char::to_lowercase).collect()
}

/// Base letters only: canonical decomposition with combining marks dropped,
/// lowercased, plus the letters that have no decomposition of their own.
fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase) {
        match c {
            'ø' => key.push('o'),
            'đ' | 'ð' => key.push('d'),
            'ł' => key.push('l'),
            'ı' => key.push('i'),
            'æ' => key.push_str("ae"),
            'œ' => key.push_str("oe"),
            'ß' => key.push_str("ss"),
            'þ' => key.push_str("th"),
            other => key.push(other),
        }
    }
    key
}

/// Owns the loaded brand list and the user's current view over it.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    brands: Vec<Brand>,
    status: CatalogStatus,
    search_term: String,
    sort_key: SortKey,
    sort_direction: SortDirection,
    visible: usize,
    max_followers: f64,
    max_total_ads: f64,
    top_tier: String,
    samples: Carousel,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_TIER)
    }
}

impl CatalogStore {
    #[must_use]
    pub fn new(top_tier: &str) -> Self {
        Self {
            brands: Vec::new(),
            status: CatalogStatus::NotLoaded,
            search_term: String::new(),
            sort_key: SortKey::Followers,
            sort_direction: SortDirection::Desc,
            visible: PAGE_SIZE,
            max_followers: 1.0,
            max_total_ads: 1.0,
            top_tier: top_tier.to_string(),
            samples: Carousel::new(SAMPLE_WINDOW),
        }
    }

    #[must_use]
    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    #[must_use]
    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn sort(&self) -> (SortKey, SortDirection) {
        (self.sort_key, self.sort_direction)
    }

    #[must_use]
    pub fn sort_label(&self) -> &'static str {
        sort_label(self.sort_key, self.sort_direction)
    }

    /// Marks a load as in flight.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Busy`] if a load is already outstanding.
    pub fn begin_load(&mut self) -> Result<(), FlowError> {
        if self.status == CatalogStatus::Loading {
            return Err(FlowError::Busy("brand catalog"));
        }
        self.status = CatalogStatus::Loading;
        Ok(())
    }

    /// Applies the outcome of a catalog fetch.
    ///
    /// A failure replaces the catalog with an error state; there is no
    /// automatic retry.
    pub fn finish_load(&mut self, outcome: Result<Vec<RawBrand>, FlowError>) {
        match outcome {
            Ok(records) => {
                self.brands = records.into_iter().map(Brand::from_raw).collect();
                self.status = CatalogStatus::Ready;
                tracing::info!(count = self.brands.len(), "brand catalog loaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, "brand catalog failed to load");
                self.brands.clear();
                self.status = CatalogStatus::Failed(
                    "Failed to load brands. Please try again later.".to_string(),
                );
            }
        }
        self.max_followers = Self::compute_max(&self.brands, MetricField::Followers);
        self.max_total_ads = Self::compute_max(&self.brands, MetricField::TotalAds);
        self.samples.reset();
        self.visible = PAGE_SIZE;
    }

    /// Sets the search term and resets paging.
    pub fn set_search(&mut self, term: &str) {
        term.clone_into(&mut self.search_term);
        self.visible = PAGE_SIZE;
    }

    /// Sets the sort order and resets paging.
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort_key = key;
        self.sort_direction = direction;
        self.visible = PAGE_SIZE;
    }

    /// Grows the page by [`PAGE_SIZE`] rows.
    pub fn load_more(&mut self) {
        self.visible += PAGE_SIZE;
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// The full filtered and sorted view.
    #[must_use]
    pub fn view(&self) -> Vec<&Brand> {
        let mut view = filter_brands(&self.brands, &self.search_term);
        sort_brands(&mut view, self.sort_key, self.sort_direction);
        view
    }

    /// The first `visible_count` rows of [`CatalogStore::view`].
    #[must_use]
    pub fn page(&self) -> Vec<&Brand> {
        let mut view = self.view();
        view.truncate(self.visible);
        view
    }

    /// Whether the filtered view has rows beyond the current page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.view().len() > self.visible
    }

    /// Maximum raw value of `field` across the loaded catalog, never below 1.
    #[must_use]
    pub fn max_of(&self, field: MetricField) -> f64 {
        match field {
            MetricField::Followers => self.max_followers,
            MetricField::TotalAds => self.max_total_ads,
        }
    }

    fn compute_max(brands: &[Brand], field: MetricField) -> f64 {
        brands
            .iter()
            .map(|b| match field {
                MetricField::Followers => b.followers.raw,
                MetricField::TotalAds => b.total_ads.raw,
            })
            .fold(1.0, f64::max)
    }

    /// Brands whose quality tier equals the configured top tier.
    #[must_use]
    pub fn sample_set(&self) -> Vec<&Brand> {
        self.brands
            .iter()
            .filter(|b| b.quality == self.top_tier)
            .collect()
    }

    #[must_use]
    pub fn sample_carousel(&self) -> &Carousel {
        &self.samples
    }

    pub fn next_sample(&mut self) {
        let len = self.sample_set().len();
        self.samples.next(len);
    }

    pub fn prev_sample(&mut self) {
        self.samples.prev();
    }

    pub fn jump_sample(&mut self, index: usize) {
        let len = self.sample_set().len();
        self.samples.jump(index, len);
    }

    /// Featured brands currently inside the carousel window.
    #[must_use]
    pub fn visible_samples(&self) -> Vec<&Brand> {
        let samples = self.sample_set();
        self.samples.visible(&samples).to_vec()
    }

    /// Looks up a brand by its id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == id)
    }
}

/// Width of a magnitude bar as a percentage of `max`, capped at 100.
#[must_use]
pub fn bar_percentage(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value / max * 100.0).min(100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
