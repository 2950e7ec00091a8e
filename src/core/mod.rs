pub mod reconcile;
pub mod session;

pub use reconcile::{SearchFilter, reconcile, reconcile_raw, validate};
pub use session::{SearchSession, SearchState, Ticket};
