//! Site settings.
//!
//! A "site" is a published rendering of assigned contents. Its settings are
//! one replaceable kind-30078 event per site on the app-data relays, with
//! the `d` tag `site-settings.{id}` and one tag per setting.

use crate::event::{kind, Event, Tag, UnsignedEvent};
use crate::types::{Error, PublicKey, Result, SiteId};
use serde::{Deserialize, Serialize};

mod service;

pub use service::SiteService;

/// Prefix of the `d` tag of site settings events.
pub const SITE_SETTINGS_PREFIX: &str = "site-settings.";

fn site_d_tag(id: &SiteId) -> String {
    format!("{SITE_SETTINGS_PREFIX}{id}")
}

/// Settings of one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub id: SiteId,
    pub title: String,
    pub description: String,

    /// Icon image URL.
    pub icon: String,

    /// Hide contents carrying only the wildcard site assignment.
    pub display_only_assigned_contents: bool,

    /// Theme address (naddr).
    pub theme: String,
}

impl SiteSettings {
    /// Fresh settings with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SiteId::new(),
            title: title.into(),
            description: String::new(),
            icon: String::new(),
            display_only_assigned_contents: false,
            theme: String::new(),
        }
    }

    /// Encode into an unsigned settings event authored by `pubkey`.
    pub fn to_event(&self, pubkey: PublicKey) -> UnsignedEvent {
        let mut event = UnsignedEvent::now(kind::APP_DATA, pubkey);
        event.tags = vec![
            Tag::pair("d", site_d_tag(&self.id)),
            Tag::pair("title", self.title.as_str()),
            Tag::pair("description", self.description.as_str()),
            Tag::pair("icon", self.icon.as_str()),
            Tag::pair("theme", self.theme.as_str()),
            Tag::pair(
                "display_only_assigned_contents",
                self.display_only_assigned_contents.to_string(),
            ),
        ];
        event
    }

    /// Decode a settings event. Errors when the `d` tag is missing the
    /// site prefix; absent setting tags default to empty.
    pub fn from_event(event: &Event) -> Result<Self> {
        let d_tag = event
            .d_tag()
            .ok_or_else(|| Error::invalid_event("site settings without d tag"))?;
        let raw_id = d_tag
            .strip_prefix(SITE_SETTINGS_PREFIX)
            .ok_or_else(|| Error::invalid_event(format!("{d_tag} is not a site settings tag")))?;
        let id = SiteId::from_string(raw_id.to_string()).map_err(Error::invalid_event)?;

        let text = |key: &str| event.tag_value(key).unwrap_or_default().to_string();

        Ok(Self {
            id,
            title: text("title"),
            description: text("description"),
            icon: text("icon"),
            theme: text("theme"),
            display_only_assigned_contents: event
                .tag_value("display_only_assigned_contents")
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventId;

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

    #[test]
    fn test_settings_event_roundtrip() {
        let mut settings = SiteSettings::new("My Blog");
        settings.description = "Notes and recipes".to_string();
        settings.display_only_assigned_contents = true;

        let event = settings.to_event(pubkey());
        assert_eq!(event.kind, kind::APP_DATA);
        assert!(event
            .tag("d")
            .unwrap()
            .value()
            .unwrap()
            .starts_with(SITE_SETTINGS_PREFIX));

        let back = SiteSettings::from_event(&signed(event)).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_from_event_rejects_foreign_d_tag() {
        let mut event = UnsignedEvent::now(kind::APP_DATA, pubkey());
        event.tags.push(Tag::pair("d", "something-else"));
        assert!(SiteSettings::from_event(&signed(event)).is_err());
    }

    #[test]
    fn test_missing_setting_tags_default() {
        let mut event = UnsignedEvent::now(kind::APP_DATA, pubkey());
        event.tags.push(Tag::pair("d", "site-settings.s1"));
        let settings = SiteSettings::from_event(&signed(event)).unwrap();

        assert_eq!(settings.id.as_str(), "s1");
        assert_eq!(settings.title, "");
        assert!(!settings.display_only_assigned_contents);
    }
}
