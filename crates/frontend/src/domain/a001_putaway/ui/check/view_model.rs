//! ViewModel for the put-away check page
//!
//! Owns the screen state and talks to the outside world only through two ports.

use super::columns::Column;
use super::row_tree::{ExpandedState, RowNode};
use super::state::{CheckStage, PutAwayCheckState, ResumeParams};
use async_trait::async_trait;
use contracts::domain::a001_putaway::PutAway;
use std::cell::{Cell, RefCell};

pub const COMPLETED_MESSAGE: &str = "Put-Away was successfully completed!";

/// Remote put-away service
#[async_trait(?Send)]
pub trait PutAwayApi {
    /// Posts `put_away` for the given location and returns the put-away stored by the server
    async fn complete_put_away(
        &self,
        location_id: &str,
        put_away: &PutAway,
    ) -> Result<PutAway, String>;
}

/// Side effects the page asks the host for
pub trait CheckPageEffects {
    fn show_spinner(&self);
    fn hide_spinner(&self);
    fn notify_success(&self, message: &str);
    /// Back to the put-away list
    fn first_page(&self);
    /// Back to the previous workflow step
    fn prev_page(&self, params: ResumeParams);
    /// Screen state changed and must be re-rendered
    fn state_changed(&self) {}
}

pub struct PutAwayCheckVm<A, E> {
    state: RefCell<PutAwayCheckState>,
    api: A,
    effects: E,
    location_id: String,
    in_flight: Cell<bool>,
}

impl<A: PutAwayApi, E: CheckPageEffects> PutAwayCheckVm<A, E> {
    pub fn new(
        put_away: PutAway,
        pivot_by: Vec<String>,
        expanded: ExpandedState,
        location_id: String,
        api: A,
        effects: E,
    ) -> Self {
        Self {
            state: RefCell::new(PutAwayCheckState::new(put_away, pivot_by, expanded)),
            api,
            effects,
            location_id,
            in_flight: Cell::new(false),
        }
    }

    /// Read access to the current state
    pub fn with_state<R>(&self, f: impl FnOnce(&PutAwayCheckState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn stage(&self) -> CheckStage {
        self.state.borrow().stage()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.get()
    }

    pub fn visible_rows(&self) -> Vec<RowNode> {
        self.state.borrow().visible_rows()
    }

    pub fn toggle_grouping(&self) {
        self.state.borrow_mut().toggle_grouping();
        log::debug!(
            "put-away check: grouping toggled, pivot_by={:?}",
            self.state.borrow().pivot_by()
        );
        self.effects.state_changed();
    }

    pub fn set_filter(&self, column: Column, text: String) {
        self.state.borrow_mut().set_filter(column, text);
        self.effects.state_changed();
    }

    /// Expander click: stores the new map and recounts rows of the expanded groups
    pub fn on_expanded_change(&self, expanded: ExpandedState) {
        self.state.borrow_mut().set_expanded(expanded);
        log::debug!(
            "put-away check: {} rows in expanded groups",
            self.state.borrow().expanded_rows_count()
        );
        self.effects.state_changed();
    }

    /// Same as `on_expanded_change` for a single top-level group
    pub fn toggle_group(&self, index: usize) {
        let mut expanded = self.state.borrow().expanded().clone();
        let entry = expanded.entry(index.to_string()).or_insert(false);
        *entry = !*entry;
        self.on_expanded_change(expanded);
    }

    pub fn edit(&self) {
        let params = self.state.borrow().resume_params();
        self.effects.prev_page(params);
    }

    pub fn go_to_first_page(&self) {
        self.effects.first_page();
    }

    /// Submits the put-away as completed.
    ///
    /// The spinner is shown once and hidden once whatever the outcome. A failure leaves the
    /// screen in review without telling the user beyond the missing success message.
    pub async fn complete(&self) {
        if self.in_flight.get() || self.state.borrow().is_completed() {
            log::warn!("put-away check: completion already submitted, ignoring");
            return;
        }
        self.in_flight.set(true);

        self.effects.show_spinner();
        let payload = self.state.borrow().completion_payload();

        let result = self
            .api
            .complete_put_away(&self.location_id, &payload)
            .await;

        match result {
            Ok(put_away) => {
                log::info!(
                    "put-away {} completed ({} items)",
                    put_away.putaway_number,
                    put_away.putaway_items.len()
                );
                self.state.borrow_mut().apply_completed(put_away);
                self.effects.hide_spinner();
                self.effects.notify_success(COMPLETED_MESSAGE);
                self.effects.state_changed();
            }
            Err(e) => {
                log::warn!("put-away completion failed: {}", e);
                self.effects.hide_spinner();
            }
        }

        self.in_flight.set(false);
    }
}
