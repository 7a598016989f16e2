//! Federation domain: groups, applications, versions and what they expose or consume

pub mod entities;
pub mod repositories;
pub mod validation;

pub use entities::*;
pub use repositories::*;
