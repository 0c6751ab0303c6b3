use super::aggregate::{DisplayRow, PutAwayItem};

/// Flattens split put-away items into one row per split.
///
/// A split row is a copy of its parent with `quantity`, `putaway_facility` and
/// `putaway_location` taken from the split and `split_items` emptied, so running the expansion
/// again changes nothing. Items without splits are passed through. Input order is kept and the
/// rows of one item stay contiguous, in split order.
///
/// A split row of an item with a `row_id` gets `{row_id}_{n}`, `n` being the split's position.
pub fn expand_split_lines(items: &[PutAwayItem]) -> Vec<DisplayRow> {
    let mut rows = Vec::with_capacity(items.len());

    for item in items {
        if item.split_items.is_empty() {
            rows.push(item.clone());
            continue;
        }

        for (n, split) in item.split_items.iter().enumerate() {
            rows.push(DisplayRow {
                row_id: item.row_id.as_ref().map(|id| format!("{id}_{n}")),
                quantity: split.quantity,
                putaway_facility: split.putaway_facility.clone(),
                putaway_location: split.putaway_location.clone(),
                split_items: Vec::new(),
                ..item.clone()
            });
        }
    }

    rows
}

/// Quantity an item actually puts away: the sum of its splits, or its own quantity.
/// A missing quantity counts as zero.
pub fn effective_quantity(item: &PutAwayItem) -> f64 {
    if item.split_items.is_empty() {
        item.quantity.unwrap_or_default()
    } else {
        item.split_items.iter().filter_map(|s| s.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_putaway::aggregate::{NamedRef, ProductRef, SplitItem};

    fn item(code: &str, quantity: f64) -> PutAwayItem {
        PutAwayItem {
            product: Some(ProductRef {
                product_code: Some(code.to_string()),
                name: Some(format!("Product {code}")),
                ..Default::default()
            }),
            recipient: Some(NamedRef::new("r1", "Ward 3")),
            quantity: Some(quantity),
            putaway_location: Some(NamedRef::new("bin-0", "RECEIVING")),
            stock_movement: Some(NamedRef::new("sm-1", "SM-100")),
            ..Default::default()
        }
    }

    fn split(quantity: f64, bin: &str) -> SplitItem {
        SplitItem {
            quantity: Some(quantity),
            putaway_facility: Some(NamedRef::new("f1", "Main")),
            putaway_location: Some(NamedRef::new(bin, bin)),
            ..Default::default()
        }
    }

    #[test]
    fn test_split_item_becomes_one_row_per_split() {
        let mut parent = item("A1", 10.0);
        parent.split_items = vec![split(3.0, "B-01"), split(7.0, "B-02")];

        let rows = expand_split_lines(&[parent.clone()]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quantity, Some(3.0));
        assert_eq!(rows[1].quantity, Some(7.0));
        assert_eq!(rows[0].putaway_location, Some(NamedRef::new("B-01", "B-01")));
        assert_eq!(rows[1].putaway_location, Some(NamedRef::new("B-02", "B-02")));
        for row in &rows {
            assert_eq!(row.product, parent.product);
            assert_eq!(row.recipient, parent.recipient);
            assert_eq!(row.putaway_facility, Some(NamedRef::new("f1", "Main")));
            assert!(row.split_items.is_empty());
        }
        // input untouched
        assert_eq!(parent.split_items.len(), 2);
        assert_eq!(parent.quantity, Some(10.0));
    }

    #[test]
    fn test_order_is_preserved_and_splits_stay_contiguous() {
        let mut second = item("B", 5.0);
        second.split_items = vec![split(2.0, "X"), split(3.0, "Y")];
        let items = vec![item("A", 1.0), second, item("C", 4.0)];

        let codes: Vec<_> = expand_split_lines(&items)
            .iter()
            .map(|r| {
                let code = r.product.as_ref().and_then(|p| p.product_code.clone());
                (code.unwrap_or_default(), r.quantity.unwrap_or_default())
            })
            .collect();

        assert_eq!(
            codes,
            vec![
                ("A".to_string(), 1.0),
                ("B".to_string(), 2.0),
                ("B".to_string(), 3.0),
                ("C".to_string(), 4.0),
            ]
        );
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let mut split_parent = item("A", 9.0);
        split_parent.split_items = vec![split(4.0, "X"), split(5.0, "Y")];
        let items = vec![split_parent, item("B", 2.0)];

        let once = expand_split_lines(&items);
        let twice = expand_split_lines(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_total_quantity_is_preserved() {
        let mut split_parent = item("A", 100.0);
        split_parent.split_items = vec![split(4.0, "X"), split(5.5, "Y")];
        let items = vec![split_parent, item("B", 2.0), item("C", 0.0)];

        let expected: f64 = items.iter().map(effective_quantity).sum();
        let actual: f64 = expand_split_lines(&items).iter().map(effective_quantity).sum();

        assert_eq!(expected, 11.5);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_split_rows_get_distinct_row_ids() {
        let mut parent = item("A", 10.0);
        parent.row_id = Some("item_a".to_string());
        parent.split_items = vec![split(3.0, "X"), split(7.0, "Y")];
        let mut plain = item("B", 1.0);
        plain.row_id = Some("item_b".to_string());

        let ids: Vec<_> = expand_split_lines(&[parent, plain, item("C", 2.0)])
            .into_iter()
            .map(|r| r.row_id)
            .collect();

        assert_eq!(
            ids,
            vec![
                Some("item_a_0".to_string()),
                Some("item_a_1".to_string()),
                Some("item_b".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(expand_split_lines(&[]).is_empty());
    }
}
