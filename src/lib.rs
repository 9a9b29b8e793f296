//! Client library for the Harbor AI API platform's dashboard.
//!
//! Fetches usage and site content from the platform backend, aggregates usage
//! into chart series, and produces chart configurations and page views.

pub mod analytics;
pub mod charts;
pub mod config;
pub mod local_store;
pub mod models;
#[cfg(feature = "cli")]
pub mod observability;
pub mod pages;
pub mod render;
pub mod services;
