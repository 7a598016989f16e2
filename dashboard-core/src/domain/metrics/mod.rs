//! Metrics domain

pub mod entities;
pub mod repositories;

pub use entities::*;
pub use repositories::*;
