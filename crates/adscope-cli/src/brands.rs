//! Leaderboard and featured-brand command handlers.

use adscope_client::{load_catalog, AdsClient};
use adscope_core::{AppConfig, CatalogStore, SortDirection, SortKey};
use clap::ValueEnum;

use crate::render;

/// Sort choices accepted on the command line and in `explore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    NameAsc,
    NameDesc,
    FollowersDesc,
    FollowersAsc,
    AdsDesc,
    AdsAsc,
}

impl SortArg {
    pub(crate) fn key_direction(self) -> (SortKey, SortDirection) {
        match self {
            Self::NameAsc => (SortKey::Name, SortDirection::Asc),
            Self::NameDesc => (SortKey::Name, SortDirection::Desc),
            Self::FollowersDesc => (SortKey::Followers, SortDirection::Desc),
            Self::FollowersAsc => (SortKey::Followers, SortDirection::Asc),
            Self::AdsDesc => (SortKey::TotalAds, SortDirection::Desc),
            Self::AdsAsc => (SortKey::TotalAds, SortDirection::Asc),
        }
    }
}

/// Fetches the catalog, printing the failure message if it cannot load.
///
/// # Errors
///
/// Returns the load error after printing the user-facing message.
pub(crate) async fn load_or_report(
    client: &AdsClient,
    config: &AppConfig,
) -> anyhow::Result<CatalogStore> {
    let mut catalog = CatalogStore::new(&config.top_tier);
    if let Err(e) = load_catalog(client, &mut catalog).await {
        print!("{}", render::leaderboard(&catalog));
        return Err(e.into());
    }
    Ok(catalog)
}

/// Print the brand leaderboard.
///
/// `pages` counts how many pages of rows to show, as if `more` had been
/// used `pages - 1` times.
///
/// # Errors
///
/// Returns an error if the catalog fails to load or JSON output fails.
pub(crate) async fn run_brands(
    client: &AdsClient,
    config: &AppConfig,
    search: Option<&str>,
    sort: SortArg,
    pages: u32,
    json: bool,
) -> anyhow::Result<()> {
    let mut catalog = load_or_report(client, config).await?;
    if let Some(term) = search {
        catalog.set_search(term);
    }
    let (key, direction) = sort.key_direction();
    catalog.set_sort(key, direction);
    for _ in 1..pages {
        catalog.load_more();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.page())?);
        return Ok(());
    }
    print!("{}", render::leaderboard(&catalog));
    Ok(())
}

/// Print the featured carousel starting at `position`.
///
/// # Errors
///
/// Returns an error if the catalog fails to load.
pub(crate) async fn run_featured(
    client: &AdsClient,
    config: &AppConfig,
    position: usize,
) -> anyhow::Result<()> {
    let mut catalog = load_or_report(client, config).await?;
    catalog.jump_sample(position);
    print!("{}", render::featured(&catalog));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sort_arg_maps_to_a_labelled_option() {
        for arg in SortArg::value_variants() {
            let (key, direction) = arg.key_direction();
            assert_ne!(adscope_core::catalog::sort_label(key, direction), "Default");
        }
    }

    #[test]
    fn sort_arg_parses_kebab_case() {
        assert_eq!(
            SortArg::from_str("ads-desc", true),
            Ok(SortArg::AdsDesc)
        );
        assert!(SortArg::from_str("popularity", true).is_err());
    }
}
