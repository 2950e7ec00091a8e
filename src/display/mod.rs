use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::models::DisplayProduct;

pub const NO_RESULTS: &str = "No matching products found.";

#[derive(
    strum_macros::Display,
    clap::ValueEnum,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(products: &[DisplayProduct], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(text(products)),
        OutputFormat::Json => serde_json::to_string_pretty(products),
    }
}

fn text(products: &[DisplayProduct]) -> String {
    if products.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut ret = String::new();
    for (rank, product) in products.iter().enumerate() {
        let _ = write!(ret, "{}. {}", rank + 1, product.name());
        if let Some(product_type) = &product.product_type {
            let _ = write!(ret, " [{product_type}]");
        }
        if let Some(price) = product.price {
            let _ = write!(ret, " {price:.2}");
        }
        let _ = writeln!(
            ret,
            " | distance {:.4} | {}",
            product.distance, product.image_path
        );
    }

    ret.trim_end().to_string()
}
