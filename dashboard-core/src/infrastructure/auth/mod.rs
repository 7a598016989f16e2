//! Authentication primitives

pub mod internal_token;
pub mod session_service;
pub mod token_matcher;

pub use internal_token::InternalToken;
pub use session_service::SessionService;
pub use token_matcher::TokenMatcher;
