//! Leaderboard selection state machine.
//!
//! Picking a row from the list only stages the brand; the outer flow is not
//! told until the user confirms. Picking from the featured carousel counts
//! as already confirmed.

use crate::brand::Brand;
use crate::error::FlowError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Browsing,
    PendingConfirmation(Brand),
    Confirmed(Brand),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionFlow {
    state: SelectionState,
}

impl SelectionFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The brand staged for confirmation, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&Brand> {
        match &self.state {
            SelectionState::PendingConfirmation(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn confirmed(&self) -> Option<&Brand> {
        match &self.state {
            SelectionState::Confirmed(b) => Some(b),
            _ => None,
        }
    }

    /// Stages a list row for confirmation. Selecting another row while one
    /// is pending replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] once a brand is confirmed.
    pub fn select(&mut self, brand: Brand) -> Result<(), FlowError> {
        if let SelectionState::Confirmed(current) = &self.state {
            return Err(FlowError::InvalidTransition(format!(
                "{} is already selected; go back to the leaderboard first",
                current.name
            )));
        }
        self.state = SelectionState::PendingConfirmation(brand);
        Ok(())
    }

    /// Confirms the staged brand and returns it for the outer flow.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] when nothing is pending.
    pub fn confirm(&mut self) -> Result<Brand, FlowError> {
        match std::mem::take(&mut self.state) {
            SelectionState::PendingConfirmation(brand) => {
                self.state = SelectionState::Confirmed(brand.clone());
                Ok(brand)
            }
            other => {
                self.state = other;
                Err(FlowError::InvalidTransition(
                    "no brand is waiting for confirmation".to_string(),
                ))
            }
        }
    }

    /// Drops the staged brand and returns to browsing.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] when nothing is pending.
    pub fn change_selection(&mut self) -> Result<(), FlowError> {
        if matches!(self.state, SelectionState::PendingConfirmation(_)) {
            self.state = SelectionState::Browsing;
            Ok(())
        } else {
            Err(FlowError::InvalidTransition(
                "no brand is waiting for confirmation".to_string(),
            ))
        }
    }

    /// Selects a featured brand, skipping the confirmation step.
    ///
    /// Featured picks replace any current choice, confirmed or not.
    pub fn select_sample(&mut self, brand: Brand) -> Brand {
        self.state = SelectionState::Confirmed(brand.clone());
        brand
    }

    /// Returns to browsing from any state.
    pub fn back_to_browsing(&mut self) {
        self.state = SelectionState::Browsing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::RawBrand;

    fn brand(name: &str) -> Brand {
        Brand::from_raw(RawBrand {
            brand: name.to_owned(),
            ..RawBrand::default()
        })
    }

    #[test]
    fn select_stages_without_confirming() {
        let mut flow = SelectionFlow::new();
        flow.select(brand("Acme")).unwrap();
        assert_eq!(flow.pending().map(|b| b.name.as_str()), Some("Acme"));
        assert!(flow.confirmed().is_none());
    }

    #[test]
    fn confirm_emits_the_pending_brand() {
        let mut flow = SelectionFlow::new();
        flow.select(brand("Acme")).unwrap();
        let chosen = flow.confirm().unwrap();
        assert_eq!(chosen.name, "Acme");
        assert!(matches!(flow.state(), SelectionState::Confirmed(b) if b.name == "Acme"));
    }

    #[test]
    fn confirm_without_pending_is_rejected() {
        let mut flow = SelectionFlow::new();
        assert!(matches!(
            flow.confirm(),
            Err(FlowError::InvalidTransition(_))
        ));
        assert_eq!(flow.state(), &SelectionState::Browsing);
    }

    #[test]
    fn change_selection_returns_to_browsing() {
        let mut flow = SelectionFlow::new();
        flow.select(brand("Acme")).unwrap();
        flow.change_selection().unwrap();
        assert_eq!(flow.state(), &SelectionState::Browsing);
        assert!(flow.change_selection().is_err());
    }

    #[test]
    fn reselecting_replaces_pending_brand() {
        let mut flow = SelectionFlow::new();
        flow.select(brand("Acme")).unwrap();
        flow.select(brand("Bolt")).unwrap();
        assert_eq!(flow.pending().map(|b| b.name.as_str()), Some("Bolt"));
    }

    #[test]
    fn sample_pick_bypasses_confirmation() {
        let mut flow = SelectionFlow::new();
        flow.select(brand("Acme")).unwrap();
        let chosen = flow.select_sample(brand("Featured"));
        assert_eq!(chosen.name, "Featured");
        assert_eq!(flow.confirmed().map(|b| b.name.as_str()), Some("Featured"));
    }

    #[test]
    fn list_select_after_confirm_requires_going_back() {
        let mut flow = SelectionFlow::new();
        flow.select_sample(brand("Featured"));
        assert!(flow.select(brand("Acme")).is_err());
        flow.back_to_browsing();
        assert!(flow.select(brand("Acme")).is_ok());
    }
}
