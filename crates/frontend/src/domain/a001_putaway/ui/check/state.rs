use super::columns::{Column, ColumnFilters};
use super::row_tree::{build_view_rows, track_expansion, ExpandedState, RowNode};
use contracts::domain::a001_putaway::{expand_split_lines, PutAway};
use serde::{Deserialize, Serialize};

/// Pivot used by the grouped view
pub const STOCK_MOVEMENT_PIVOT: &str = "stockMovement.name";

/// The table never shows fewer rows than this; missing ones are padded
pub const MIN_ROWS: usize = 10;

pub fn default_pivot_by() -> Vec<String> {
    vec![STOCK_MOVEMENT_PIVOT.to_string()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStage {
    Reviewing,
    Completed,
}

/// What the previous workflow step needs to restore the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeParams {
    pub put_away: PutAway,
    pub pivot_by: Vec<String>,
    pub expanded: ExpandedState,
}

#[derive(Debug, Clone)]
pub struct PutAwayCheckState {
    // Исходный документ (без разбивки строк), именно он уходит на сервер
    original: PutAway,
    // Рабочая копия с развёрнутыми split-строками
    put_away: PutAway,
    stage: CheckStage,
    pivot_by: Vec<String>,
    expanded: ExpandedState,
    expanded_rows_count: usize,
    filters: ColumnFilters,
}

impl PutAwayCheckState {
    pub fn new(put_away: PutAway, pivot_by: Vec<String>, expanded: ExpandedState) -> Self {
        let mut items = put_away.putaway_items.clone();
        for item in items.iter_mut().filter(|item| item.row_id.is_none()) {
            item.row_id = Some(new_row_id());
        }
        let working = PutAway {
            putaway_items: expand_split_lines(&items),
            ..put_away.clone()
        };
        Self {
            original: put_away,
            put_away: working,
            stage: CheckStage::Reviewing,
            pivot_by,
            expanded,
            expanded_rows_count: 0,
            filters: ColumnFilters::default(),
        }
    }

    pub fn put_away(&self) -> &PutAway {
        &self.put_away
    }

    pub fn stage(&self) -> CheckStage {
        self.stage
    }

    pub fn is_completed(&self) -> bool {
        self.stage == CheckStage::Completed
    }

    pub fn pivot_by(&self) -> &[String] {
        &self.pivot_by
    }

    pub fn is_grouped(&self) -> bool {
        !self.pivot_by.is_empty()
    }

    pub fn expanded(&self) -> &ExpandedState {
        &self.expanded
    }

    pub fn expanded_rows_count(&self) -> usize {
        self.expanded_rows_count
    }

    pub fn filters(&self) -> &ColumnFilters {
        &self.filters
    }

    pub fn title(&self) -> String {
        format!("Put Away - {}", self.put_away.putaway_number)
    }

    /// Label of the "Show by" toggle
    pub fn grouping_label(&self) -> &'static str {
        if self.is_grouped() {
            "Stock Movement"
        } else {
            "Product"
        }
    }

    /// Flips between the flat and the stock movement view; expansion is reset either way
    pub fn toggle_grouping(&mut self) {
        self.pivot_by = if self.is_grouped() {
            Vec::new()
        } else {
            default_pivot_by()
        };
        self.expanded = ExpandedState::new();
        self.expanded_rows_count = 0;
    }

    pub fn set_filter(&mut self, column: Column, text: impl Into<String>) {
        self.filters.set(column, text);
    }

    /// Rows as currently shown: filtered, sorted and grouped
    pub fn visible_rows(&self) -> Vec<RowNode> {
        let rows = self.filters.apply(&self.put_away.putaway_items);
        build_view_rows(&rows, &self.pivot_by)
    }

    pub fn set_expanded(&mut self, expanded: ExpandedState) {
        let visible = self.visible_rows();
        let (expanded, leaf_count) = track_expansion(expanded, &visible);
        self.expanded = expanded;
        self.expanded_rows_count = leaf_count;
    }

    /// Minimum table rows: fewer when expanded groups already fill the table
    pub fn min_rows(&self) -> usize {
        if self.is_grouped() {
            MIN_ROWS.saturating_sub(self.expanded_rows_count)
        } else {
            MIN_ROWS
        }
    }

    pub fn resume_params(&self) -> ResumeParams {
        ResumeParams {
            put_away: self.original.clone(),
            pivot_by: self.pivot_by.clone(),
            expanded: self.expanded.clone(),
        }
    }

    /// Body of the completion request: the unsplit items with status COMPLETED
    pub fn completion_payload(&self) -> PutAway {
        self.original.completed()
    }

    /// Takes the put-away returned by the server; every item gets a fresh row id before its
    /// split lines are expanded.
    pub fn apply_completed(&mut self, mut put_away: PutAway) {
        for item in &mut put_away.putaway_items {
            item.row_id = Some(new_row_id());
        }
        self.put_away = PutAway {
            putaway_items: expand_split_lines(&put_away.putaway_items),
            ..put_away.clone()
        };
        self.original = put_away;
        self.stage = CheckStage::Completed;
    }
}

fn new_row_id() -> String {
    format!("item_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_putaway::{NamedRef, PutAwayItem, PutAwayStatus, SplitItem};

    fn item(movement: &str, quantity: f64) -> PutAwayItem {
        PutAwayItem {
            quantity: Some(quantity),
            stock_movement: Some(NamedRef::new(movement, movement)),
            ..Default::default()
        }
    }

    fn put_away() -> PutAway {
        let mut split = item("SM-1", 10.0);
        split.split_items = vec![
            SplitItem {
                quantity: Some(3.0),
                ..Default::default()
            },
            SplitItem {
                quantity: Some(7.0),
                ..Default::default()
            },
        ];
        PutAway {
            putaway_number: "PA-9".to_string(),
            putaway_items: vec![split, item("SM-2", 4.0)],
            ..Default::default()
        }
    }

    fn state() -> PutAwayCheckState {
        PutAwayCheckState::new(put_away(), default_pivot_by(), ExpandedState::new())
    }

    #[test]
    fn test_new_expands_split_lines() {
        let s = state();

        assert_eq!(s.stage(), CheckStage::Reviewing);
        assert_eq!(s.put_away().putaway_items.len(), 3);
        assert_eq!(s.title(), "Put Away - PA-9");
        assert_eq!(s.min_rows(), MIN_ROWS);
    }

    #[test]
    fn test_every_row_has_a_unique_row_id() {
        let s = state();

        let mut ids: Vec<_> = s
            .put_away()
            .putaway_items
            .iter()
            .filter_map(|row| row.row_id.clone())
            .collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 3);
        // ids stay on the client
        assert!(s.resume_params().put_away.putaway_items.iter().all(|i| i.row_id.is_none()));
        assert!(s.completion_payload().putaway_items.iter().all(|i| i.row_id.is_none()));
    }

    #[test]
    fn test_toggle_grouping_resets_expansion() {
        let mut s = state();
        s.set_expanded(ExpandedState::from([("0".to_string(), true)]));
        assert_eq!(s.expanded_rows_count(), 2);
        assert_eq!(s.min_rows(), 8);

        s.toggle_grouping();
        assert!(!s.is_grouped());
        assert_eq!(s.grouping_label(), "Product");
        assert!(s.expanded().is_empty());
        assert_eq!(s.expanded_rows_count(), 0);

        s.set_expanded(ExpandedState::from([("1".to_string(), true)]));
        s.toggle_grouping();
        assert_eq!(s.pivot_by(), default_pivot_by().as_slice());
        assert_eq!(s.grouping_label(), "Stock Movement");
        assert!(s.expanded().is_empty());
        assert_eq!(s.expanded_rows_count(), 0);
    }

    #[test]
    fn test_leaf_count_follows_filters() {
        let mut s = state();
        s.set_filter(Column::Quantity, "7");

        s.set_expanded(ExpandedState::from([("0".to_string(), true)]));

        assert_eq!(s.visible_rows().len(), 1);
        assert_eq!(s.expanded_rows_count(), 1);
    }

    #[test]
    fn test_min_rows_never_underflows() {
        let many: Vec<_> = (0..12).map(|i| item("SM-1", i as f64)).collect();
        let mut s = PutAwayCheckState::new(
            PutAway {
                putaway_items: many,
                ..Default::default()
            },
            default_pivot_by(),
            ExpandedState::new(),
        );

        s.set_expanded(ExpandedState::from([("0".to_string(), true)]));

        assert_eq!(s.expanded_rows_count(), 12);
        assert_eq!(s.min_rows(), 0);
    }

    #[test]
    fn test_completion_payload_uses_unsplit_items() {
        let s = state();

        let payload = s.completion_payload();

        assert_eq!(payload.putaway_status, PutAwayStatus::Completed);
        assert_eq!(payload.putaway_items.len(), 2);
        assert_eq!(payload.putaway_items[0].split_items.len(), 2);
    }

    #[test]
    fn test_resume_params_carry_original_and_view_state() {
        let mut s = state();
        s.set_expanded(ExpandedState::from([("1".to_string(), true)]));

        let params = s.resume_params();

        assert_eq!(params.put_away, put_away());
        assert_eq!(params.pivot_by, default_pivot_by());
        assert_eq!(params.expanded.get("1"), Some(&true));
    }

    #[test]
    fn test_apply_completed_assigns_ids_and_reexpands() {
        let mut s = state();
        let mut returned = put_away().completed();
        returned.putaway_items[0].split_items.clear();

        s.apply_completed(returned);

        assert!(s.is_completed());
        let items = &s.put_away().putaway_items;
        assert_eq!(items.len(), 2);
        let ids: Vec<_> = items.iter().filter_map(|i| i.row_id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| id.starts_with("item_")));
        assert_eq!(s.put_away().putaway_status, PutAwayStatus::Completed);
    }
}
