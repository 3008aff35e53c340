//! Incident tracker service.
//!
//! A REST API over a store of operational incidents. Listing supports exact
//! filters on status, severity and service, a free-text search over title
//! and summary, a validated sort field with a stable `id` tie-break, and
//! page/limit pagination whose count and page come from one snapshot.
//!
//! The store is chosen at startup (`sled` on disk, or in memory) and injected
//! into [`service::IncidentService`], which the axum router in [`api`]
//! wraps.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod query;
pub mod service;
pub mod state;
pub mod validation;

pub use error::{AppError, Result};
