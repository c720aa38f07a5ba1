//! In-memory relay pool.
//!
//! Models the relay behaviors the CMS depends on, per relay name:
//!   - filter matching with newest-first ordering and per-filter limits
//!   - parameterized-replaceable kinds (30000..40000): a newer event from
//!     the same author with the same kind and `d` tag replaces the old one
//!   - deletion requests (kind 5): referenced event ids are dropped

use crate::event::{kind, Event, Filter};
use crate::relay::{PublishReceipt, RelayPool};
use crate::types::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

fn is_parameterized_replaceable(event_kind: u32) -> bool {
    (30_000..40_000).contains(&event_kind)
}

/// In-process relay pool for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryRelayPool {
    stores: RwLock<HashMap<String, Vec<Event>>>,
}

impl MemoryRelayPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events currently held by one relay, unfiltered. Test helper.
    pub async fn stored(&self, relay: &str) -> Vec<Event> {
        self.stores
            .read()
            .await
            .get(relay)
            .cloned()
            .unwrap_or_default()
    }

    fn store_event(store: &mut Vec<Event>, event: &Event) {
        if event.kind == kind::DELETION {
            let targets: Vec<&str> = event
                .tags
                .iter()
                .filter(|t| t.key() == "e")
                .filter_map(|t| t.value())
                .collect();
            store.retain(|existing| !targets.contains(&existing.id.as_str()));
        } else if is_parameterized_replaceable(event.kind) {
            let d = event.d_tag().unwrap_or("");
            store.retain(|existing| {
                !(existing.kind == event.kind
                    && existing.pubkey == event.pubkey
                    && existing.d_tag().unwrap_or("") == d
                    && existing.created_at <= event.created_at)
            });
        }

        store.push(event.clone());
    }
}

#[async_trait]
impl RelayPool for MemoryRelayPool {
    async fn list(&self, relays: &[String], filters: &[Filter]) -> Result<Vec<Event>> {
        let stores = self.stores.read().await;

        let mut results: Vec<Event> = Vec::new();
        for filter in filters {
            let mut matched: Vec<Event> = relays
                .iter()
                .filter_map(|relay| stores.get(relay))
                .flatten()
                .filter(|event| filter.matches(event))
                .cloned()
                .collect();

            matched.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| a.id.as_str().cmp(b.id.as_str()))
            });
            matched.dedup_by(|a, b| a.id == b.id);

            if let Some(limit) = filter.limit {
                matched.truncate(limit);
            }
            results.extend(matched);
        }

        // Dedup across filters, keep newest-first ordering.
        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        results.dedup_by(|a, b| a.id == b.id);

        Ok(results)
    }

    async fn publish(&self, relays: &[String], event: Event) -> Result<PublishReceipt> {
        let mut stores = self.stores.write().await;

        let mut receipt = PublishReceipt::default();
        for relay in relays {
            let store = stores.entry(relay.clone()).or_default();
            Self::store_event(store, &event);
            receipt.record_ok(relay);
        }

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Tag;
    use crate::types::{EventId, PublicKey};

    fn relays() -> Vec<String> {
        vec!["ws://a".to_string(), "ws://b".to_string()]
    }

    fn event(id: &str, created_at: i64, event_kind: u32, tags: Vec<Tag>) -> Event {
        Event {
            id: EventId::from_string(id.to_string()).unwrap(),
            pubkey: PublicKey::from_string("a".repeat(64)).unwrap(),
            created_at,
            kind: event_kind,
            tags,
            content: String::new(),
            sig: String::new(),
        }
    }

    #[tokio::test]
    async fn test_list_dedups_across_relays() {
        let pool = MemoryRelayPool::new();
        let ev = event("ev-1", 100, kind::LONG_FORM, vec![Tag::pair("d", "c1")]);
        pool.publish(&relays(), ev).await.unwrap();

        let listed = pool.list(&relays(), &[Filter::new()]).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_limits() {
        let pool = MemoryRelayPool::new();
        for (id, ts) in [("ev-1", 100), ("ev-2", 300), ("ev-3", 200)] {
            let ev = event(id, ts, kind::LONG_FORM, vec![Tag::pair("d", id)]);
            pool.publish(&relays(), ev).await.unwrap();
        }

        let listed = pool
            .list(&relays(), &[Filter::new().limit(2)])
            .await
            .unwrap();
        let ids: Vec<&str> = listed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["ev-2", "ev-3"]);
    }

    #[tokio::test]
    async fn test_replaceable_event_replaced_by_newer() {
        let pool = MemoryRelayPool::new();
        let old = event("ev-old", 100, kind::APP_DATA, vec![Tag::pair("d", "table")]);
        let new = event("ev-new", 200, kind::APP_DATA, vec![Tag::pair("d", "table")]);
        pool.publish(&relays(), old).await.unwrap();
        pool.publish(&relays(), new).await.unwrap();

        let listed = pool.list(&relays(), &[Filter::new()]).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_str(), "ev-new");
    }

    #[tokio::test]
    async fn test_different_d_tags_coexist() {
        let pool = MemoryRelayPool::new();
        let a = event("ev-a", 100, kind::APP_DATA, vec![Tag::pair("d", "t1")]);
        let b = event("ev-b", 100, kind::APP_DATA, vec![Tag::pair("d", "t2")]);
        pool.publish(&relays(), a).await.unwrap();
        pool.publish(&relays(), b).await.unwrap();

        let listed = pool.list(&relays(), &[Filter::new()]).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_deletion_removes_referenced_event() {
        let pool = MemoryRelayPool::new();
        let ev = event("ev-1", 100, kind::LONG_FORM, vec![Tag::pair("d", "c1")]);
        pool.publish(&relays(), ev).await.unwrap();

        let deletion = event("ev-del", 200, kind::DELETION, vec![Tag::pair("e", "ev-1")]);
        pool.publish(&relays(), deletion).await.unwrap();

        let listed = pool
            .list(&relays(), &[Filter::new().kinds([kind::LONG_FORM])])
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_get_returns_newest_match() {
        let pool = MemoryRelayPool::new();
        let a = event("ev-a", 100, kind::LONG_FORM, vec![Tag::pair("d", "c1")]);
        let b = event("ev-b", 200, kind::LONG_FORM, vec![Tag::pair("d", "c2")]);
        pool.publish(&relays(), a).await.unwrap();
        pool.publish(&relays(), b).await.unwrap();

        let got = pool.get(&relays(), Filter::new()).await.unwrap();
        assert_eq!(got.unwrap().id.as_str(), "ev-b");
    }
}
