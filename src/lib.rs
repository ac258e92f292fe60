//! Search and exclusion-analysis front end for the literature backend.
//!
//! - [`client`] - one async operation per backend endpoint
//! - [`routes`] - page route table and navigator
//! - [`ui`] - components and page views rendered to HTML
//! - [`web`] - axum router serving pages and form submissions
//! - [`app`] - the application context built at startup

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod routes;
pub mod theme;
pub mod ui;
pub mod web;
