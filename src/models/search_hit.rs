use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier as sent by the backend, either numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Number),
            Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Number(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// Product columns of a hit. Known columns are typed when their value fits;
/// anything else, including known columns of an unexpected shape, stays in
/// `extra` as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for Product {
    fn from(mut columns: Map<String, Value>) -> Self {
        Self {
            product_id: take_column(&mut columns, "product_id", RecordId::from_value),
            product_name: take_column(&mut columns, "product_name", text),
            price: take_column(&mut columns, "price", price),
            category: take_column(&mut columns, "category", text),
            product_type: take_column(&mut columns, "type", text),
            extra: columns,
        }
    }
}

/// Image columns of a hit; presence of `id` and `image_path` is checked on validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Image {
    pub id: Option<RecordId>,
    pub image_path: Option<String>,
    pub is_primary: bool,
}

impl From<Map<String, Value>> for Image {
    fn from(mut columns: Map<String, Value>) -> Self {
        Self {
            id: take_column(&mut columns, "id", RecordId::from_value),
            image_path: take_column(&mut columns, "image_path", text),
            is_primary: take_column(&mut columns, "is_primary", flag).unwrap_or_default(),
        }
    }
}

/// A validated image reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: RecordId,
    pub image_path: String,
    pub is_primary: bool,
}

/// One element of the backend's `data` array, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHit {
    pub product: Option<Value>,
    pub image: Option<Value>,
    pub distance: Option<Value>,
}

/// Response envelope of the search endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Option<Vec<RawHit>>,
}

impl SearchResponse {
    pub fn into_hits(self) -> Vec<RawHit> {
        self.data.unwrap_or_default()
    }
}

/// A validated hit: one image of one product and its distance to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub product_id: RecordId,
    pub product: Product,
    pub image: ImageRef,
    pub distance: f64,
}

/// Removes `key` when it is null or converts; leaves it in place otherwise.
fn take_column<T>(
    columns: &mut Map<String, Value>,
    key: &str,
    convert: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = columns.get(key)?;
    let converted = convert(value);
    if converted.is_some() || value.is_null() {
        columns.remove(key);
    }
    converted
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    }
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}
