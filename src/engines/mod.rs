use async_trait::async_trait;

use crate::{
    core::reconcile::{SearchFilter, reconcile_raw},
    error::Result,
    files::ImageUpload,
    models::{DisplayProduct, RawHit},
};

pub mod healthlink;

pub use healthlink::HealthLink;

#[async_trait]
pub trait ImageSearchEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw hits exactly as the backend returned them
    async fn search(&self, upload: &ImageUpload) -> Result<Vec<RawHit>>;

    async fn reconciled_search(
        &self,
        upload: &ImageUpload,
        filter: &SearchFilter,
    ) -> Result<Vec<DisplayProduct>> {
        let raw = self.search(upload).await?;
        log::info!("Reconciling {} hits from {}", raw.len(), self.name());

        let products = reconcile_raw(raw)?;

        log::debug!(
            "Distances: {}",
            products
                .iter()
                .map(|product| format!("{}={}", product.product_id, product.distance))
                .collect::<Vec<String>>()
                .join(", ")
        );

        let total = products.len();
        let products = filter.apply(products);

        log::info!(
            "{} of {} products left after filtering {} results",
            products.len(),
            total,
            self.name()
        );

        Ok(products)
    }
}
