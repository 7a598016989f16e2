//! Authentication domain

pub mod errors;
pub mod value_objects;

pub use errors::AuthError;
pub use value_objects::{SessionClaims, SessionUser};
