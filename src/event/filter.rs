//! Relay query filters.
//!
//! A [`Filter`] mirrors the NIP-01 subscription filter: every present
//! constraint must hold for an event to match. Tag constraints are keyed
//! without the wire `#` prefix (`d`, `s`, `h`).

use crate::event::Event;
use crate::types::{EventId, PublicKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query filter applied by relays (and by the in-memory pool).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<EventId>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<PublicKey>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u32>>,

    /// Inclusive lower bound on `created_at`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<i64>,

    /// Inclusive upper bound on `created_at`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Tag constraints: key → accepted values (any value matches).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, Vec<String>>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u32>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    pub fn authors(mut self, authors: impl IntoIterator<Item = PublicKey>) -> Self {
        self.authors = Some(authors.into_iter().collect());
        self
    }

    pub fn ids(mut self, ids: impl IntoIterator<Item = EventId>) -> Self {
        self.ids = Some(ids.into_iter().collect());
        self
    }

    pub fn tag(mut self, key: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        self.tags.insert(key.into(), values.into_iter().collect());
        self
    }

    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: i64) -> Self {
        self.until = Some(until);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether the event satisfies every present constraint. `limit` is a
    /// result-set bound, not a per-event predicate, and is ignored here.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&event.id) {
                return false;
            }
        }

        if let Some(authors) = &self.authors {
            if !authors.contains(&event.pubkey) {
                return false;
            }
        }

        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }

        if let Some(since) = self.since {
            if event.created_at < since {
                return false;
            }
        }

        if let Some(until) = self.until {
            if event.created_at > until {
                return false;
            }
        }

        for (key, accepted) in &self.tags {
            let hit = event.tags.iter().any(|tag| {
                tag.key() == key && tag.values().iter().any(|v| accepted.contains(v))
            });
            if !hit {
                return false;
            }
        }

        true
    }
}
