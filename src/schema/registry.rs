//! Schema registry — schemas stored as rows of a key-value table event.
//!
//! All of a user's schemas live in one replaceable kind-30078 event on the
//! app-data relays. Its `d` tag is `{client}/schemas`; every non-reserved
//! tag is a row `[schema_id, json]`. Updates are read-modify-write: fetch
//! the current table, replace the row, sign, republish.

use crate::event::{kind, Event, Filter, Tag, UnsignedEvent};
use crate::relay::RelayPool;
use crate::schema::{builtin, Schema};
use crate::signer::Signer;
use crate::types::{Config, Error, PublicKey, Result, SchemaId, CLIENT};
use std::sync::Arc;
use tracing::{debug, warn};

/// Tags of the table event that are never schema rows.
pub const RESERVED_SCHEMA_TAGS: &[&str] = &["d", "title", "t", SchemaId::ARTICLES];

/// Human-readable title stored on the schema table event.
pub const SCHEMA_TABLE_TITLE: &str = "Nostr CMS Schema";

fn table_key() -> String {
    format!("{CLIENT}/schemas")
}

/// Reads and writes the per-user schema table.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    pool: Arc<dyn RelayPool>,
    signer: Arc<dyn Signer>,
    config: Config,
}

impl SchemaRegistry {
    pub fn new(pool: Arc<dyn RelayPool>, signer: Arc<dyn Signer>, config: Config) -> Self {
        Self {
            pool,
            signer,
            config,
        }
    }

    /// All schemas of the signing user, optionally filtered by
    /// `schema_type` include/exclude lists.
    pub async fn schemas(&self, types: &[String], ignore_types: &[String]) -> Result<Vec<Schema>> {
        let Some(table) = self.fetch_table().await? else {
            return Ok(Vec::new());
        };

        let Some(mut schemas) = decode_table(&table) else {
            // A single corrupt row invalidates the table; treat as absent.
            warn!(table = %table.id, "schema table has undecodable rows, ignoring");
            return Ok(Vec::new());
        };

        if !types.is_empty() {
            schemas.retain(|s| types.contains(&s.schema_type));
        }
        if !ignore_types.is_empty() {
            schemas.retain(|s| !ignore_types.contains(&s.schema_type));
        }

        Ok(schemas)
    }

    /// Schemas whose contents appear in content listings (site schemas,
    /// `schema_type == "h"`, are managed elsewhere).
    pub async fn content_schemas(&self) -> Result<Vec<Schema>> {
        self.schemas(&[], &["h".to_string()]).await
    }

    /// Look up one schema. The builtin `articles` schema is served from
    /// code and never touches the relays.
    pub async fn schema(&self, id: &SchemaId) -> Result<Schema> {
        if id.is_articles() {
            return Ok(builtin::articles());
        }

        let table = self
            .fetch_table()
            .await?
            .ok_or_else(|| Error::not_found(format!("schema {id} does not exist")))?;

        let row = table
            .tags
            .iter()
            .find(|t| t.key() == id.as_str())
            .and_then(Tag::value)
            .ok_or_else(|| Error::not_found(format!("schema {id} does not exist")))?;

        Schema::from_row(id.clone(), Some(table.pubkey.clone()), row)
    }

    /// Insert or replace one schema row, preserving all other rows and the
    /// table's reserved tags.
    pub async fn upsert(&self, schema: &Schema) -> Result<()> {
        if schema.id.is_articles() {
            return Err(Error::validation("the articles schema is builtin and read-only"));
        }

        let pubkey = self.signer.public_key().await?;
        let existing = self.fetch_table_for(&pubkey).await?;

        let mut tags = vec![
            Tag::pair("d", table_key()),
            Tag::pair("title", SCHEMA_TABLE_TITLE),
        ];

        if let Some(table) = &existing {
            for tag in &table.tags {
                let key = tag.key();
                if key == "d" || key == "title" || key == schema.id.as_str() {
                    continue;
                }
                tags.push(tag.clone());
            }
        }
        tags.push(Tag::pair(schema.id.as_str(), schema.row_value()?));

        let mut event = UnsignedEvent::now(kind::APP_DATA, pubkey);
        event.tags = tags;

        let signed = self.signer.sign(event).await?;
        let receipt = self
            .pool
            .publish(&self.config.relays.app_data, signed)
            .await?;
        if receipt.is_total_failure() {
            return Err(Error::relay("no app-data relay accepted the schema table"));
        }

        debug!(schema = %schema.id, "schema table updated");
        Ok(())
    }

    async fn fetch_table(&self) -> Result<Option<Event>> {
        let pubkey = self.signer.public_key().await?;
        self.fetch_table_for(&pubkey).await
    }

    async fn fetch_table_for(&self, pubkey: &PublicKey) -> Result<Option<Event>> {
        let filter = Filter::new()
            .kinds([kind::APP_DATA])
            .authors([pubkey.clone()])
            .tag("d", vec![table_key()]);

        self.pool.get(&self.config.relays.app_data, filter).await
    }
}

/// Decode every row of a table event; `None` if any row is undecodable.
fn decode_table(table: &Event) -> Option<Vec<Schema>> {
    let mut schemas = Vec::new();

    for tag in &table.tags {
        let key = tag.key();
        if RESERVED_SCHEMA_TAGS.contains(&key) {
            continue;
        }

        let id = SchemaId::from_string(key.to_string()).ok()?;
        let raw = tag.value()?;
        match Schema::from_row(id, Some(table.pubkey.clone()), raw) {
            Ok(schema) => schemas.push(schema),
            Err(err) => {
                debug!(row = key, %err, "schema row decode failed");
                return None;
            }
        }
    }

    Some(schemas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventId;

    fn table_event(rows: Vec<(&str, &str)>) -> Event {
        let mut tags = vec![
            Tag::pair("d", table_key()),
            Tag::pair("title", SCHEMA_TABLE_TITLE),
        ];
        for (key, value) in rows {
            tags.push(Tag::pair(key, value));
        }

        Event {
            id: EventId::from_string("e".repeat(64)).unwrap(),
            pubkey: PublicKey::from_string("a".repeat(64)).unwrap(),
            created_at: 1_700_000_000,
            kind: kind::APP_DATA,
            tags,
            content: String::new(),
            sig: String::new(),
        }
    }

    const ROW: &str = r#"{"label":"Recipes","type":"food","fields":[],"writeRule":{"rule":"all"}}"#;

    #[test]
    fn test_decode_table_skips_reserved_tags() {
        let table = table_event(vec![("recipes", ROW)]);
        let schemas = decode_table(&table).unwrap();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].id.as_str(), "recipes");
        assert_eq!(schemas[0].pubkey.as_ref().unwrap().as_str(), "a".repeat(64));
    }

    #[test]
    fn test_decode_table_all_or_nothing() {
        let table = table_event(vec![("recipes", ROW), ("broken", "not json")]);
        assert!(decode_table(&table).is_none());
    }
}
