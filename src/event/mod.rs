//! Nostr event model.
//!
//! Typed representation of the protocol's signed data records:
//! - **Tags**: flat string arrays with a key in position zero
//! - **UnsignedEvent / Event**: the pre- and post-signing forms
//! - **Kinds**: the event kind numbers this crate reads and writes
//! - **Ids**: NIP-01 event id hashing (sha256 over the canonical array)
//!
//! Transport (websocket subscriptions, relay handshakes) is out of scope;
//! see [`crate::relay::RelayPool`].

use crate::types::{EventId, PublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

mod filter;

pub use filter::Filter;

/// Event kind numbers used by the CMS.
pub mod kind {
    /// Long-form published content (NIP-23).
    pub const LONG_FORM: u32 = 30023;
    /// Long-form draft content (NIP-23).
    pub const LONG_FORM_DRAFT: u32 = 30024;
    /// Deletion request (NIP-09).
    pub const DELETION: u32 = 5;
    /// Arbitrary application data (NIP-78): schema tables, site settings.
    pub const APP_DATA: u32 = 30078;
}

// =============================================================================
// Tags
// =============================================================================

/// A single event tag: a non-empty string array whose first element is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(Vec<String>);

impl Tag {
    /// Build a tag from a key and its values.
    pub fn new(key: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        let mut parts = vec![key.into()];
        parts.extend(values);
        Self(parts)
    }

    /// Build a single-value tag.
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![key.into(), value.into()])
    }

    pub fn key(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    /// First value after the key, if any.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    /// All values after the key.
    pub fn values(&self) -> &[String] {
        if self.0.is_empty() {
            &[]
        } else {
            &self.0[1..]
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Tag {
    fn from(parts: Vec<String>) -> Self {
        Self(parts)
    }
}

// =============================================================================
// Events
// =============================================================================

/// An event before signing. Produced by the codec layers, consumed by a
/// [`crate::signer::Signer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    pub pubkey: PublicKey,
    pub created_at: i64,
    pub kind: u32,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl UnsignedEvent {
    /// Create an event with the current timestamp and no tags.
    pub fn now(kind: u32, pubkey: PublicKey) -> Self {
        Self {
            pubkey,
            created_at: chrono::Utc::now().timestamp(),
            kind,
            tags: Vec::new(),
            content: String::new(),
        }
    }

    /// First tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key() == key)
    }

    /// NIP-01 event id: lowercase hex sha256 of the canonical serialization
    /// `[0, pubkey, created_at, kind, tags, content]`.
    pub fn id(&self) -> crate::types::Result<EventId> {
        let canonical = serde_json::to_string(&serde_json::json!([
            0,
            self.pubkey.as_str(),
            self.created_at,
            self.kind,
            self.tags,
            self.content,
        ]))?;

        let digest = Sha256::digest(canonical.as_bytes());
        EventId::from_string(hex::encode(digest)).map_err(crate::types::Error::validation)
    }
}

/// A signed event as stored on relays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub pubkey: PublicKey,
    pub created_at: i64,
    pub kind: u32,
    pub tags: Vec<Tag>,
    pub content: String,
    pub sig: String,
}

impl Event {
    /// First tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key() == key)
    }

    /// First value of the first tag with the given key.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tag(key).and_then(Tag::value)
    }

    /// The `d` tag value identifying a replaceable event within its kind.
    pub fn d_tag(&self) -> Option<&str> {
        self.tag_value("d")
    }

    /// Strip the signature, recovering the unsigned form.
    pub fn unsigned(&self) -> UnsignedEvent {
        UnsignedEvent {
            pubkey: self.pubkey.clone(),
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags.clone(),
            content: self.content.clone(),
        }
    }
}
