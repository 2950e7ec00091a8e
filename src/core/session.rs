use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::{
    core::reconcile::SearchFilter,
    engines::ImageSearchEngine,
    error::Result,
    files::ImageUpload,
    models::DisplayProduct,
};

/// Handed out when a search starts; only the newest ticket may publish results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(strum_macros::Display, Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Searching {
        seq: u64,
    },
    Searched {
        seq: u64,
        products: Vec<DisplayProduct>,
    },
    Failed {
        seq: u64,
        message: String,
    },
}

/// Holds the outcome of the most recent search of one search widget.
#[derive(Debug, Default)]
pub struct SearchSession {
    dispatched: AtomicU64,
    state: RwLock<SearchState>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self) -> Ticket {
        let mut state = self.state.write().await;
        let seq = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        *state = SearchState::Searching { seq };
        Ticket(seq)
    }

    /// Publish the result for `ticket`. Returns false when a newer search
    /// was started (or the session reset) in the meantime.
    pub async fn complete(&self, ticket: Ticket, result: Result<Vec<DisplayProduct>>) -> bool {
        let mut state = self.state.write().await;

        let latest = self.dispatched.load(Ordering::SeqCst);
        if ticket.0 != latest {
            log::warn!(
                "Discarding result of search #{} (latest is #{})",
                ticket.0,
                latest
            );
            return false;
        }

        *state = match result {
            Ok(products) => {
                log::info!("Search #{} found {} products", ticket.0, products.len());
                SearchState::Searched {
                    seq: ticket.0,
                    products,
                }
            }
            Err(err) => {
                log::error!("Search #{} failed: {}", ticket.0, err);
                SearchState::Failed {
                    seq: ticket.0,
                    message: err.to_string(),
                }
            }
        };

        true
    }

    /// Back to idle; results of searches still in flight will be dropped.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        *state = SearchState::Idle;
    }

    pub async fn state(&self) -> SearchState {
        self.state.read().await.clone()
    }

    /// Search, reconcile, filter and publish in one go. Returns the published
    /// state, or `None` when the result was superseded.
    pub async fn run<E>(
        &self,
        engine: &E,
        upload: &ImageUpload,
        filter: &SearchFilter,
    ) -> Option<SearchState>
    where
        E: ImageSearchEngine + Send + Sync + ?Sized,
    {
        let ticket = self.begin().await;
        log::info!("Search #{} started with {}", ticket.0, engine.name());

        let result = engine.reconciled_search(upload, filter).await;

        if self.complete(ticket, result).await {
            Some(self.state().await)
        } else {
            None
        }
    }
}
