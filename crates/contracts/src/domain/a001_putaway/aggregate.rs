//! Put-away aggregate as exchanged with the put-away API.
//!
//! Field names follow the server JSON (camelCase). Fields the screen does not read are kept in
//! `extra` so that posting a put-away back never drops server data.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Lifecycle status of a put-away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PutAwayStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Canceled,
}

/// Reference to a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to an inventory item (lot)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    /// As sent by the server, e.g. "03/15/2025"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to any entity displayed by name: recipient, bin location, facility, stock movement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            extra: Map::new(),
        }
    }
}

/// Part of a put-away item's quantity sent to its own destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "quantity_as_number"
    )]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub putaway_facility: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub putaway_location: Option<NamedRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One allocation of inventory to a destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutAwayItem {
    /// Client-side row identity keying table rows, never sent to the server
    #[serde(skip)]
    pub row_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item: Option<InventoryItemRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<NamedRef>,
    /// Absent on lines the server sent without a quantity; posted back the same way
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "quantity_as_number"
    )]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bins: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub putaway_facility: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub putaway_location: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_movement: Option<NamedRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub split_items: Vec<SplitItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A flattened table line; same shape as the item it came from, never split further
pub type DisplayRow = PutAwayItem;

/// Put-away document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutAway {
    #[serde(default, deserialize_with = "null_as_default")]
    pub putaway_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub putaway_status: PutAwayStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub putaway_items: Vec<PutAwayItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PutAway {
    /// Same put-away with the status forced to COMPLETED, as posted on completion
    pub fn completed(&self) -> PutAway {
        PutAway {
            putaway_status: PutAwayStatus::Completed,
            ..self.clone()
        }
    }
}

/// Whole quantities go back as JSON integers (`2`, not `2.0`).
fn quantity_as_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    match value {
        Some(q) if q.fract() == 0.0 && q.abs() <= MAX_EXACT => {
            serializer.serialize_i64(*q as i64)
        }
        Some(q) => serializer.serialize_f64(*q),
        None => serializer.serialize_none(),
    }
}

/// Treats an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
