//! Event ↔ content translation.
//!
//! Decoding rules:
//!   - kind must be 30023 (published) or 30024 (draft)
//!   - the `d` tag is mandatory and becomes the content id
//!   - `s` → schema id, `h` → site assignments (defaulting to `["*"]`)
//!   - every other non-reserved tag becomes a field, all values kept
//!   - a field value equal to [`CREATED_AT_PLACEHOLDER`] is substituted
//!     with the event timestamp
//!
//! Encoding emits `d`, `client`, `s`, `h`, then one tag per field carrying
//! every value, so decode(encode(x)) preserves fields exactly.

use crate::content::{Content, ContentInput, ALL_SITES};
use crate::event::{kind, Event, Tag, UnsignedEvent};
use crate::types::{ContentId, Error, PublicKey, Result, SchemaId, CLIENT};

/// Content tags carrying structure rather than field data.
pub const RESERVED_CONTENT_TAGS: &[&str] = &["d", "s", "o", "h"];

/// Tag value substituted with the event's `created_at` on decode. Lets a
/// field track "last saved at" without the author filling it in.
pub const CREATED_AT_PLACEHOLDER: &str = "$created_at";

impl Content {
    /// Decode a long-form event. Errors on wrong kind or a missing `d` tag.
    pub fn from_event(event: Event) -> Result<Self> {
        if event.kind != kind::LONG_FORM && event.kind != kind::LONG_FORM_DRAFT {
            return Err(Error::invalid_event(format!(
                "kind {} is not long-form content",
                event.kind
            )));
        }

        let d_tag = event
            .d_tag()
            .ok_or_else(|| Error::invalid_event("content id (d tag) is not found"))?;
        let id = ContentId::from_string(d_tag.to_string()).map_err(Error::invalid_event)?;

        let schema_id = event
            .tag_value("s")
            .and_then(|s| SchemaId::from_string(s.to_string()).ok());

        let mut sites: Vec<String> = event
            .tag("h")
            .map(|t| t.values().to_vec())
            .unwrap_or_default();
        if sites.is_empty() {
            sites = vec![ALL_SITES.to_string()];
        }

        let mut fields = crate::content::ContentFields::new();
        for tag in &event.tags {
            let key = tag.key();
            if RESERVED_CONTENT_TAGS.contains(&key) {
                continue;
            }

            if tag.value() == Some(CREATED_AT_PLACEHOLDER) {
                fields.insert(key.to_string(), vec![event.created_at.to_string()]);
                continue;
            }

            fields.insert(key.to_string(), tag.values().to_vec());
        }

        Ok(Self {
            id,
            fields,
            content: event.content.clone(),
            is_draft: event.kind == kind::LONG_FORM_DRAFT,
            pubkey: event.pubkey.clone(),
            schema_id,
            sites,
            event,
        })
    }

    /// Lenient decode: relays serve foreign events of the right kinds, and
    /// a malformed one must not poison a listing.
    pub fn from_event_opt(event: Event) -> Option<Self> {
        Self::from_event(event).ok()
    }
}

impl ContentInput {
    /// Encode into an unsigned long-form event authored by `pubkey`.
    pub fn to_event(&self, pubkey: PublicKey) -> UnsignedEvent {
        let mut tags = vec![
            Tag::pair("d", self.id.as_str()),
            Tag::pair("client", CLIENT),
        ];

        if let Some(schema_id) = &self.schema_id {
            tags.push(Tag::pair("s", schema_id.as_str()));
        }

        if !self.sites.is_empty() {
            tags.push(Tag::new("h", self.sites.iter().cloned()));
        }

        for (key, values) in &self.fields {
            tags.push(Tag::new(key.clone(), values.iter().cloned()));
        }

        let event_kind = if self.is_draft {
            kind::LONG_FORM_DRAFT
        } else {
            kind::LONG_FORM
        };

        let mut event = UnsignedEvent::now(event_kind, pubkey);
        event.tags = tags;
        event.content = self.content.clone();
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventId;
    use pretty_assertions::assert_eq;

    fn pubkey() -> PublicKey {
        PublicKey::from_string("a".repeat(64)).unwrap()
    }

    fn signed(event: UnsignedEvent) -> Event {
        Event {
            id: EventId::from_string("e".repeat(64)).unwrap(),
            pubkey: event.pubkey,
            created_at: event.created_at,
            kind: event.kind,
            tags: event.tags,
            content: event.content,
            sig: String::new(),
        }
    }

    fn sample_input() -> ContentInput {
        let mut input = ContentInput::new();
        input.fields.insert("title".to_string(), vec!["Soup".to_string()]);
        input.fields.insert(
            "tags".to_string(),
            vec!["starter".to_string(), "vegan".to_string()],
        );
        input.content = "Boil water.".to_string();
        input.schema_id = Some(SchemaId::from_string("recipes".to_string()).unwrap());
        input.sites = vec!["site-1".to_string()];
        input
    }

    #[test]
    fn test_encode_emits_reserved_tags_first() {
        let input = sample_input();
        let event = input.to_event(pubkey());

        assert_eq!(event.kind, kind::LONG_FORM);
        assert_eq!(event.tags[0].key(), "d");
        assert_eq!(event.tags[0].value(), Some(input.id.as_str()));
        assert_eq!(event.tag("client").unwrap().value(), Some(CLIENT));
        assert_eq!(event.tag("s").unwrap().value(), Some("recipes"));
        assert_eq!(event.tag("h").unwrap().values(), ["site-1".to_string()]);
    }

    #[test]
    fn test_draft_flag_selects_kind() {
        let mut input = sample_input();
        input.is_draft = true;
        assert_eq!(input.to_event(pubkey()).kind, kind::LONG_FORM_DRAFT);
    }

    #[test]
    fn test_decode_roundtrip_preserves_content() {
        let input = sample_input();
        let content = Content::from_event(signed(input.to_event(pubkey()))).unwrap();

        assert_eq!(content.id, input.id);
        assert_eq!(content.fields, input.fields);
        assert_eq!(content.content, input.content);
        assert_eq!(content.schema_id, input.schema_id);
        assert_eq!(content.sites, input.sites);
        assert!(!content.is_draft);
    }

    #[test]
    fn test_decode_rejects_wrong_kind() {
        let mut event = UnsignedEvent::now(kind::APP_DATA, pubkey());
        event.tags.push(Tag::pair("d", "content-1"));
        assert!(Content::from_event(signed(event)).is_err());
        assert!(Content::from_event_opt(signed(UnsignedEvent::now(kind::DELETION, pubkey()))).is_none());
    }

    #[test]
    fn test_decode_requires_d_tag() {
        let event = UnsignedEvent::now(kind::LONG_FORM, pubkey());
        let err = Content::from_event(signed(event)).unwrap_err();
        assert!(err.to_string().contains("d tag"));
    }

    #[test]
    fn test_decode_defaults_sites_to_wildcard() {
        let mut event = UnsignedEvent::now(kind::LONG_FORM, pubkey());
        event.tags.push(Tag::pair("d", "content-1"));
        let content = Content::from_event(signed(event)).unwrap();
        assert_eq!(content.sites, vec![ALL_SITES.to_string()]);

        // An empty h tag counts as unassigned too.
        let mut event = UnsignedEvent::now(kind::LONG_FORM, pubkey());
        event.tags.push(Tag::pair("d", "content-1"));
        event.tags.push(Tag::new("h", Vec::new()));
        let content = Content::from_event(signed(event)).unwrap();
        assert_eq!(content.sites, vec![ALL_SITES.to_string()]);
    }

    #[test]
    fn test_decode_substitutes_created_at_placeholder() {
        let mut event = UnsignedEvent::now(kind::LONG_FORM, pubkey());
        event.created_at = 1_700_000_000;
        event.tags.push(Tag::pair("d", "content-1"));
        event.tags.push(Tag::pair("updated_at", CREATED_AT_PLACEHOLDER));

        let content = Content::from_event(signed(event)).unwrap();
        assert_eq!(content.fields["updated_at"], vec!["1700000000".to_string()]);
    }

    #[test]
    fn test_decode_keeps_client_tag_as_field() {
        // The builtin articles schema displays the client tag as a field.
        let mut event = UnsignedEvent::now(kind::LONG_FORM, pubkey());
        event.tags.push(Tag::pair("d", "content-1"));
        event.tags.push(Tag::pair("client", CLIENT));
        event.tags.push(Tag::new("h", vec!["site-1".to_string()]));

        let content = Content::from_event(signed(event)).unwrap();
        assert_eq!(content.fields["client"], vec![CLIENT.to_string()]);
        // ...but structural tags stay out of the fields.
        assert!(!content.fields.contains_key("h"));
        assert!(!content.fields.contains_key("d"));
    }
}
