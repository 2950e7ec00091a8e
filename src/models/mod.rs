pub mod display_product;
pub mod search_hit;

pub use display_product::DisplayProduct;
pub use search_hit::{Image, ImageRef, Product, RawHit, RecordId, SearchHit, SearchResponse};
