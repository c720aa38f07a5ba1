//! Core types for the CMS core.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (ContentId, SchemaId, etc.)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Relay selection, query, and observability settings

mod config;
mod errors;
mod ids;

pub use config::{Config, ObservabilityConfig, QueryConfig, RelayConfig, CLIENT};
pub use errors::{Error, Result};
pub use ids::{ContentId, EventId, PublicKey, SchemaId, SiteId};
