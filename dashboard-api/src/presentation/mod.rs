//! Presentation layer

pub mod auth;
pub mod controllers;
pub mod graphql;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
