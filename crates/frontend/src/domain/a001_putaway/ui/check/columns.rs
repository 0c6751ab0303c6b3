//! Колонки таблицы проверки размещения и их фильтры

use crate::shared::components::table::format_quantity;
use crate::shared::list_utils::matches_filter;
use contracts::domain::a001_putaway::DisplayRow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    ProductCode,
    ProductName,
    LotNumber,
    ExpirationDate,
    Recipient,
    Quantity,
    CurrentBins,
    PutawayLocation,
    StockMovement,
}

impl Column {
    /// Display order
    pub const ALL: [Column; 9] = [
        Column::ProductCode,
        Column::ProductName,
        Column::LotNumber,
        Column::ExpirationDate,
        Column::Recipient,
        Column::Quantity,
        Column::CurrentBins,
        Column::PutawayLocation,
        Column::StockMovement,
    ];

    /// Field path of the column in the put-away item JSON; also used as pivot key
    pub fn id(self) -> &'static str {
        match self {
            Column::ProductCode => "product.productCode",
            Column::ProductName => "product.name",
            Column::LotNumber => "inventoryItem.lotNumber",
            Column::ExpirationDate => "inventoryItem.expirationDate",
            Column::Recipient => "recipient.name",
            Column::Quantity => "quantity",
            Column::CurrentBins => "currentBins",
            Column::PutawayLocation => "putawayLocation.name",
            Column::StockMovement => "stockMovement.name",
        }
    }

    pub fn from_id(id: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::ProductCode => "Code",
            Column::ProductName => "Name",
            Column::LotNumber => "Lot/Serial No.",
            Column::ExpirationDate => "Expiry",
            Column::Recipient => "Recipient",
            Column::Quantity => "QTY",
            Column::CurrentBins => "Current bin",
            Column::PutawayLocation => "Put Away Bin",
            Column::StockMovement => "Stock Movement",
        }
    }

    /// Raw cell value; `None` when the row has no such field
    pub fn value(self, row: &DisplayRow) -> Option<String> {
        match self {
            Column::ProductCode => row.product.as_ref()?.product_code.clone(),
            Column::ProductName => row.product.as_ref()?.name.clone(),
            Column::LotNumber => row.inventory_item.as_ref()?.lot_number.clone(),
            Column::ExpirationDate => row.inventory_item.as_ref()?.expiration_date.clone(),
            Column::Recipient => row.recipient.as_ref()?.name.clone(),
            Column::Quantity => row.quantity.map(|q| q.to_string()),
            Column::CurrentBins => row.current_bins.clone(),
            Column::PutawayLocation => row.putaway_location.as_ref()?.name.clone(),
            Column::StockMovement => row.stock_movement.as_ref()?.name.clone(),
        }
    }

    /// Text shown in the cell
    pub fn display(self, row: &DisplayRow) -> String {
        match self {
            Column::Quantity => row.quantity.map(format_quantity).unwrap_or_default(),
            _ => self.value(row).unwrap_or_default(),
        }
    }
}

/// Active column filters; a row is visible only if it passes every one of them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFilters(BTreeMap<Column, String>);

impl ColumnFilters {
    /// Sets the filter text of a column; empty text clears the filter
    pub fn set(&mut self, column: Column, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.0.remove(&column);
        } else {
            self.0.insert(column, text);
        }
    }

    pub fn get(&self, column: Column) -> &str {
        self.0.get(&column).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn accepts(&self, row: &DisplayRow) -> bool {
        self.0
            .iter()
            .all(|(column, text)| matches_filter(column.value(row).as_deref(), text))
    }

    pub fn apply(&self, rows: &[DisplayRow]) -> Vec<DisplayRow> {
        rows.iter().filter(|row| self.accepts(row)).cloned().collect()
    }
}
