use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{ImageRef, RecordId, SearchHit};

/// Keys the normalized record sets itself; product columns with these names are dropped
const RESERVED_KEYS: [&str; 4] = ["image_path", "is_primary", "distance", "images"];

/// A product ready for rendering, carrying the image that matched the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayProduct {
    pub product_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    pub image_path: String,
    pub is_primary: bool,
    pub distance: f64,
    pub images: Vec<ImageRef>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<SearchHit> for DisplayProduct {
    fn from(hit: SearchHit) -> Self {
        let SearchHit {
            product_id,
            product,
            image,
            distance,
        } = hit;

        let mut extra = product.extra;
        for key in RESERVED_KEYS {
            extra.remove(key);
        }

        Self {
            product_id,
            product_name: product.product_name,
            price: product.price,
            category: product.category,
            product_type: product.product_type,
            image_path: image.image_path.clone(),
            is_primary: image.is_primary,
            distance,
            images: vec![image],
            extra,
        }
    }
}

impl DisplayProduct {
    pub fn name(&self) -> &str {
        self.product_name.as_deref().unwrap_or("Unnamed product")
    }
}
