//! Rows of the check table as a tree: flat list, or groups by pivot columns.

use super::columns::Column;
use contracts::domain::a001_putaway::DisplayRow;
use std::collections::BTreeMap;

/// Expanded/collapsed flag per row key; top-level groups are keyed by their position
/// ("0", "1", ...)
pub type ExpandedState = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq)]
pub struct RowNode {
    /// Pivot value for groups, position within the parent for leaves
    pub key: String,
    /// Set on leaves only
    pub row: Option<DisplayRow>,
    /// Set on groups only
    pub sub_rows: Option<Vec<RowNode>>,
}

impl RowNode {
    fn leaf(key: String, row: DisplayRow) -> Self {
        Self {
            key,
            row: Some(row),
            sub_rows: None,
        }
    }

    fn group(key: String, sub_rows: Vec<RowNode>) -> Self {
        Self {
            key,
            row: None,
            sub_rows: Some(sub_rows),
        }
    }

    pub fn is_group(&self) -> bool {
        self.sub_rows.is_some()
    }
}

/// Default table order: stable by stock movement name, rows without one first
pub fn sort_rows(rows: &[DisplayRow]) -> Vec<DisplayRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_cached_key(|row| Column::StockMovement.value(row));
    sorted
}

/// Builds the rows the table shows: sorted leaves when `pivot_by` is empty, otherwise one
/// level of groups per pivot column, groups ordered by their value.
pub fn build_view_rows(rows: &[DisplayRow], pivot_by: &[String]) -> Vec<RowNode> {
    build_level(&sort_rows(rows), pivot_by)
}

fn build_level(rows: &[DisplayRow], pivot_by: &[String]) -> Vec<RowNode> {
    let Some((pivot, rest)) = pivot_by.split_first() else {
        return rows
            .iter()
            .enumerate()
            .map(|(i, row)| RowNode::leaf(i.to_string(), row.clone()))
            .collect();
    };

    let Some(column) = Column::from_id(pivot) else {
        log::warn!("unknown pivot column '{}' ignored", pivot);
        return build_level(rows, rest);
    };

    let mut groups: BTreeMap<String, Vec<DisplayRow>> = BTreeMap::new();
    for row in rows {
        let key = column.value(row).unwrap_or_default();
        groups.entry(key).or_default().push(row.clone());
    }

    groups
        .into_iter()
        .map(|(key, group_rows)| RowNode::group(key, build_level(&group_rows, rest)))
        .collect()
}

/// Number of leaf rows under `nodes`, at any depth
pub fn count_leaves(nodes: &[RowNode]) -> usize {
    nodes
        .iter()
        .map(|node| match &node.sub_rows {
            Some(children) => count_leaves(children),
            None => 1,
        })
        .sum()
}

/// Handles an expander click: passes the new expansion map through and counts the leaf rows
/// of every expanded top-level group in `visible`.
///
/// Keys that are not a top-level position, or point past the end of `visible` (stale state
/// after a reload), count as zero.
pub fn track_expansion(expanded: ExpandedState, visible: &[RowNode]) -> (ExpandedState, usize) {
    let leaf_count = expanded
        .iter()
        .filter(|(_, is_open)| **is_open)
        .filter_map(|(key, _)| key.parse::<usize>().ok())
        .filter_map(|index| visible.get(index))
        .map(|node| count_leaves(std::slice::from_ref(node)))
        .sum();

    (expanded, leaf_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_putaway::{NamedRef, ProductRef};

    const SM: &str = "stockMovement.name";

    fn row(code: &str, movement: Option<&str>) -> DisplayRow {
        DisplayRow {
            product: Some(ProductRef {
                product_code: Some(code.to_string()),
                ..Default::default()
            }),
            stock_movement: movement.map(|m| NamedRef::new(m, m)),
            quantity: Some(1.0),
            ..Default::default()
        }
    }

    fn codes(nodes: &[RowNode]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|n| n.row.as_ref())
            .filter_map(|r| Column::ProductCode.value(r))
            .collect()
    }

    fn expanded(keys: &[(&str, bool)]) -> ExpandedState {
        keys.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn sample() -> Vec<DisplayRow> {
        vec![
            row("A", Some("SM-2")),
            row("B", Some("SM-1")),
            row("C", Some("SM-2")),
            row("D", None),
            row("E", Some("SM-1")),
        ]
    }

    #[test]
    fn test_flat_view_sorts_by_stock_movement() {
        let nodes = build_view_rows(&sample(), &[]);

        assert!(nodes.iter().all(|n| !n.is_group()));
        assert_eq!(codes(&nodes), vec!["D", "B", "E", "A", "C"]);
    }

    #[test]
    fn test_grouped_view_by_stock_movement() {
        let nodes = build_view_rows(&sample(), &[SM.to_string()]);

        let keys: Vec<_> = nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["", "SM-1", "SM-2"]);
        assert_eq!(codes(nodes[1].sub_rows.as_ref().unwrap()), vec!["B", "E"]);
        assert_eq!(codes(nodes[2].sub_rows.as_ref().unwrap()), vec!["A", "C"]);
        assert_eq!(count_leaves(&nodes), 5);
    }

    #[test]
    fn test_unknown_pivot_is_ignored() {
        let nodes = build_view_rows(&sample(), &["name".to_string()]);
        assert_eq!(nodes.len(), 5);
    }

    #[test]
    fn test_count_leaves_recurses_into_nested_groups() {
        let pivot_by = [SM.to_string(), "product.productCode".to_string()];
        let nodes = build_view_rows(&sample(), &pivot_by);

        assert_eq!(nodes[2].sub_rows.as_ref().unwrap().len(), 2);
        assert!(nodes[2].sub_rows.as_ref().unwrap()[0].is_group());
        assert_eq!(count_leaves(&nodes), 5);
        assert_eq!(count_leaves(std::slice::from_ref(&nodes[2])), 2);
    }

    #[test]
    fn test_track_expansion_counts_expanded_groups_only() {
        let nodes = build_view_rows(&sample(), &[SM.to_string()]);
        let state = expanded(&[("1", true), ("2", true), ("0", false)]);

        let (returned, leaf_count) = track_expansion(state.clone(), &nodes);

        assert_eq!(returned, state);
        assert_eq!(leaf_count, 4);
    }

    #[test]
    fn test_track_expansion_tolerates_stale_and_foreign_keys() {
        let nodes = build_view_rows(&sample(), &[SM.to_string()]);
        let state = expanded(&[("0", true), ("7", true), ("1.0", true), ("abc", true)]);

        let (_, leaf_count) = track_expansion(state, &nodes);

        assert_eq!(leaf_count, 1);
    }

    #[test]
    fn test_track_expansion_on_empty_view() {
        let (_, leaf_count) = track_expansion(expanded(&[("0", true)]), &[]);
        assert_eq!(leaf_count, 0);
    }
}
