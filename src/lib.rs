//! Movie recommendations by collaborative filtering over a user x item
//! rating matrix.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
