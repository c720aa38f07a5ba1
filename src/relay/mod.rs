//! Relay pool seam.
//!
//! The CMS core never speaks the relay wire protocol itself; it issues
//! queries and publishes through the [`RelayPool`] trait. Production
//! deployments wrap a real websocket client behind it. [`MemoryRelayPool`]
//! is the in-process implementation used by tests and local development.

use crate::event::{Event, Filter};
use crate::types::Result;
use async_trait::async_trait;
use std::fmt;

mod memory;

pub use memory::MemoryRelayPool;

/// Outcome of a best-effort fan-out publish.
///
/// Publishing is not transactional: each relay accepts or rejects the event
/// independently. Callers treat a publish as failed only when every relay
/// rejected it.
#[derive(Debug, Clone, Default)]
pub struct PublishReceipt {
    /// Relays that accepted the event.
    pub accepted: Vec<String>,

    /// Relays that rejected the event, with the rejection reason.
    pub failed: Vec<(String, String)>,
}

impl PublishReceipt {
    pub fn record_ok(&mut self, relay: &str) {
        self.accepted.push(relay.to_string());
    }

    pub fn record_err(&mut self, relay: &str, reason: impl Into<String>) {
        self.failed.push((relay.to_string(), reason.into()));
    }

    /// No relay accepted the event.
    pub fn is_total_failure(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Connection pool over a set of relays.
///
/// Implementations own connection management, retries, and subscription
/// plumbing. Results from `list` are newest-first and deduplicated by
/// event id across relays.
#[async_trait]
pub trait RelayPool: Send + Sync + fmt::Debug {
    /// Fetch all stored events matching any of the filters.
    async fn list(&self, relays: &[String], filters: &[Filter]) -> Result<Vec<Event>>;

    /// Fetch the single newest event matching the filter.
    async fn get(&self, relays: &[String], filter: Filter) -> Result<Option<Event>> {
        let events = self.list(relays, &[filter.limit(1)]).await?;
        Ok(events.into_iter().next())
    }

    /// Publish an event to every relay, best-effort.
    async fn publish(&self, relays: &[String], event: Event) -> Result<PublishReceipt>;
}
