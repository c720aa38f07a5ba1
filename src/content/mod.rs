//! Content items.
//!
//! A content is the decoded form of a long-form event (kind 30023, or 30024
//! for drafts): schema-defined fields flattened into tags, a free-text body,
//! and the sites it is assigned to. Contents are transient — always derived
//! from relay query results, never stored locally.
//!
//! - [`codec`]: event ↔ content translation
//! - [`pagination`]: opaque cursors over descending `created_at` pages
//! - [`ContentService`]: list/get/publish/remove over the basic relays

use crate::event::Event;
use crate::types::{ContentId, PublicKey, SchemaId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod codec;
mod pagination;
mod service;

pub use pagination::{ContentPage, Cursor};
pub use service::{ContentService, ContentTarget};

/// Wildcard site assignment: the content belongs to every site.
pub const ALL_SITES: &str = "*";

/// Field values keyed by field key. Values are always string arrays;
/// typing happens at the form-mapping boundary using the schema.
pub type ContentFields = BTreeMap<String, Vec<String>>;

/// A decoded content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub fields: ContentFields,

    /// Free-text (markdown) body.
    pub content: String,

    pub is_draft: bool,

    /// The event this content was decoded from.
    pub event: Event,

    pub pubkey: PublicKey,

    /// Schema the content was authored under; `None` for plain articles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<SchemaId>,

    /// Assigned site ids; never empty (defaults to `["*"]`).
    pub sites: Vec<String>,
}

/// Author-side content data, before signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInput {
    pub id: ContentId,
    pub fields: ContentFields,
    pub content: String,
    pub is_draft: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<SchemaId>,

    pub sites: Vec<String>,
}

impl ContentInput {
    /// Fresh input with a generated id and no data.
    pub fn new() -> Self {
        Self {
            id: ContentId::new(),
            fields: ContentFields::new(),
            content: String::new(),
            is_draft: false,
            schema_id: None,
            sites: Vec::new(),
        }
    }
}

impl Default for ContentInput {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Content> for ContentInput {
    fn from(content: Content) -> Self {
        Self {
            id: content.id,
            fields: content.fields,
            content: content.content,
            is_draft: content.is_draft,
            schema_id: content.schema_id,
            sites: content.sites,
        }
    }
}
