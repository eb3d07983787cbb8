use crate::brand::Brand;
use crate::catalog::CatalogStore;
use crate::error::FlowError;
use crate::selection::{SelectionFlow, SelectionState};
use crate::session::ReportSession;

/// The whole leaderboard-to-report flow for one user.
///
/// Owns the catalog, the selection state machine and the per-selection
/// [`ReportSession`]. A brand only reaches the session once it is
/// confirmed; that hand-off is the one place the session is reset.
#[derive(Debug, Clone, Default)]
pub struct Explorer {
    catalog: CatalogStore,
    selection: SelectionFlow,
    session: ReportSession,
}

impl Explorer {
    #[must_use]
    pub fn new(catalog: CatalogStore) -> Self {
        Self {
            catalog,
            selection: SelectionFlow::new(),
            session: ReportSession::new(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogStore {
        &mut self.catalog
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    #[must_use]
    pub fn session(&self) -> &ReportSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ReportSession {
        &mut self.session
    }

    fn lookup(&self, id: &str) -> Result<Brand, FlowError> {
        self.catalog
            .find(id)
            .cloned()
            .ok_or_else(|| FlowError::InvalidTransition(format!("unknown brand '{id}'")))
    }

    /// Stages a leaderboard row for confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] for an unknown id or when a
    /// brand is already confirmed.
    pub fn select(&mut self, id: &str) -> Result<(), FlowError> {
        let brand = self.lookup(id)?;
        self.selection.select(brand)
    }

    /// Confirms the staged brand and hands it to the report session.
    ///
    /// Returns whether the session was reset and needs a report fetch.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] when nothing is staged.
    pub fn confirm(&mut self) -> Result<bool, FlowError> {
        let brand = self.selection.confirm()?;
        Ok(self.session.activate(brand))
    }

    /// Returns a staged brand to the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] when nothing is staged.
    pub fn change_selection(&mut self) -> Result<(), FlowError> {
        self.selection.change_selection()
    }

    /// Picks a featured brand, skipping confirmation.
    ///
    /// Returns whether the session was reset and needs a report fetch.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] when `id` is not in the
    /// featured set.
    pub fn select_sample(&mut self, id: &str) -> Result<bool, FlowError> {
        let brand = self
            .catalog
            .sample_set()
            .into_iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| FlowError::InvalidTransition(format!("'{id}' is not a featured brand")))?;
        let brand = self.selection.select_sample(brand);
        Ok(self.session.activate(brand))
    }

    /// Leaves the report and returns to the leaderboard.
    pub fn back_to_selection(&mut self) {
        self.selection.back_to_browsing();
        self.session.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::RawBrand;

    fn explorer() -> Explorer {
        let mut catalog = CatalogStore::default();
        catalog.begin_load().unwrap();
        catalog.finish_load(Ok(vec![
            RawBrand {
                brand: "Top Brand".into(),
                quality: Some("Superb".into()),
                ..RawBrand::default()
            },
            RawBrand {
                brand: "Plain Brand".into(),
                quality: Some("Good".into()),
                ..RawBrand::default()
            },
        ]));
        Explorer::new(catalog)
    }

    #[test]
    fn list_pick_waits_for_confirmation() {
        let mut e = explorer();
        e.select("plain-brand").unwrap();
        assert!(e.session().active().is_none());

        assert!(e.confirm().unwrap());
        assert_eq!(e.session().active().map(|b| b.id.as_str()), Some("plain-brand"));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let mut e = explorer();
        assert!(matches!(
            e.select("nobody"),
            Err(FlowError::InvalidTransition(_))
        ));
    }

    #[test]
    fn sample_pick_requires_featured_brand() {
        let mut e = explorer();
        assert!(e.select_sample("plain-brand").is_err());
        assert!(e.select_sample("top-brand").unwrap());
        assert!(matches!(e.selection(), SelectionState::Confirmed(b) if b.id == "top-brand"));
    }

    #[test]
    fn back_to_selection_clears_session() {
        let mut e = explorer();
        e.select_sample("top-brand").unwrap();
        e.back_to_selection();
        assert_eq!(e.selection(), &SelectionState::Browsing);
        assert!(e.session().active().is_none());
    }
}
