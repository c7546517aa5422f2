pub mod analysis;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod middleware;
pub mod monitors;
pub mod openapi;
pub mod passwords;
pub mod processor;
pub mod repositories;
pub mod routes;
pub mod telemetry;

#[cfg(test)]
mod test_support;
