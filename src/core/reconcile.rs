use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Result, SearchError},
    models::{DisplayProduct, Image, ImageRef, Product, RawHit, RecordId, SearchHit},
};

/// Check every raw hit for a product (with id), an image (with id and path)
/// and a rankable distance.
pub fn validate(raw: Vec<RawHit>) -> Result<Vec<SearchHit>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, hit)| validate_hit(index, hit))
        .collect()
}

fn validate_hit(index: usize, hit: RawHit) -> Result<SearchHit> {
    let malformed = |field| SearchError::MalformedHit { index, field };

    let product: Product = hit
        .product
        .and_then(|value| serde_json::from_value(value).ok())
        .ok_or_else(|| malformed("product"))?;
    let product_id = product
        .product_id
        .clone()
        .ok_or_else(|| malformed("product_id"))?;

    let image: Image = hit
        .image
        .and_then(|value| serde_json::from_value(value).ok())
        .ok_or_else(|| malformed("image"))?;
    let image = ImageRef {
        id: image.id.ok_or_else(|| malformed("image.id"))?,
        image_path: image.image_path.ok_or_else(|| malformed("image_path"))?,
        is_primary: image.is_primary,
    };

    let distance = hit
        .distance
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or_else(|| malformed("distance"))?;

    if !distance.is_finite() || distance < 0.0 {
        return Err(SearchError::InvalidDistance { index, distance });
    }

    Ok(SearchHit {
        product_id,
        product,
        image,
        distance,
    })
}

/// Collapse image hits into one product each, best match first.
///
/// For every product the hit with the lowest distance is kept; on a tie the
/// earlier hit stays. Products are then ordered by ascending distance, keeping
/// first-seen order between equal distances.
pub fn reconcile(hits: Vec<SearchHit>) -> Vec<DisplayProduct> {
    let mut positions: HashMap<RecordId, usize> = HashMap::with_capacity(hits.len());
    let mut best: Vec<DisplayProduct> = Vec::with_capacity(hits.len());

    for hit in hits {
        match positions.get(&hit.product_id) {
            Some(&pos) => {
                if hit.distance < best[pos].distance {
                    best[pos] = DisplayProduct::from(hit);
                }
            }
            None => {
                positions.insert(hit.product_id.clone(), best.len());
                best.push(DisplayProduct::from(hit));
            }
        }
    }

    // sort_by is stable
    best.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    best
}

pub fn reconcile_raw(raw: Vec<RawHit>) -> Result<Vec<DisplayProduct>> {
    Ok(reconcile(validate(raw)?))
}

/// Post-reconciliation narrowing applied by callers, e.g. a category page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub product_type: Option<String>,
    pub max_distance: Option<f64>,
    pub limit: Option<usize>,
}

impl SearchFilter {
    pub fn apply(&self, products: Vec<DisplayProduct>) -> Vec<DisplayProduct> {
        let filtered = products.into_iter().filter(|product| {
            let type_matches = match (&self.product_type, &product.product_type) {
                (None, _) => true,
                (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
                (Some(_), None) => false,
            };
            let close_enough = self
                .max_distance
                .is_none_or(|max_distance| product.distance <= max_distance);

            type_matches && close_enough
        });

        match self.limit {
            Some(limit) => filtered.take(limit).collect(),
            None => filtered.collect(),
        }
    }
}
