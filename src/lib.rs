pub mod cli;
pub mod config;
pub mod core;
pub mod display;
pub mod engines;
pub mod error;
pub mod files;
pub mod models;

pub use crate::core::{SearchFilter, SearchSession, SearchState, reconcile};
pub use error::{Result, SearchError};
