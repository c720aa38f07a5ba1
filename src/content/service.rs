//! Content service — queries and publishes content events.

use crate::content::{Content, ContentInput, ContentPage, Cursor};
use crate::event::{kind, Filter, Tag, UnsignedEvent};
use crate::relay::RelayPool;
use crate::schema::Schema;
use crate::signer::Signer;
use crate::types::{Config, ContentId, Error, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Which publication states a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentTarget {
    Draft,
    Published,
    #[default]
    All,
}

impl ContentTarget {
    fn kinds(self) -> Vec<u32> {
        match self {
            Self::Published => vec![kind::LONG_FORM],
            Self::Draft => vec![kind::LONG_FORM_DRAFT],
            Self::All => vec![kind::LONG_FORM, kind::LONG_FORM_DRAFT],
        }
    }
}

/// CRUD over content events on the basic relays.
#[derive(Debug, Clone)]
pub struct ContentService {
    pool: Arc<dyn RelayPool>,
    signer: Arc<dyn Signer>,
    config: Config,
}

impl ContentService {
    pub fn new(pool: Arc<dyn RelayPool>, signer: Arc<dyn Signer>, config: Config) -> Self {
        Self {
            pool,
            signer,
            config,
        }
    }

    /// One page of contents authored under `schema`, newest first.
    ///
    /// The schema shapes the query: its write rule restricts authors, and
    /// its id becomes the `#s` constraint (except the builtin articles
    /// schema, whose contents carry no `s` tag). Events that fail to decode
    /// are skipped, not fatal.
    pub async fn list(
        &self,
        schema: &Schema,
        target: ContentTarget,
        cursor: Option<Cursor>,
    ) -> Result<ContentPage> {
        let pubkey = self.signer.public_key().await?;
        let page_size = self.config.query.page_size;

        let mut filter = Filter::new().kinds(target.kinds()).limit(page_size);
        if let Some(authors) = schema.write_rule.author_filter(&pubkey) {
            filter = filter.authors(authors);
        }
        if !schema.id.is_articles() {
            filter = filter.tag("s", vec![schema.id.to_string()]);
        }
        if let Some(cursor) = cursor {
            filter = filter.until(cursor.until);
        }

        let events = self
            .pool
            .list(&self.config.relays.basic, &[filter])
            .await?;

        let full_page = events.len() == page_size;
        let next = if full_page {
            events.last().map(|oldest| Cursor::before(oldest.created_at))
        } else {
            None
        };

        let contents: Vec<Content> = events
            .into_iter()
            .filter_map(Content::from_event_opt)
            .collect();

        debug!(
            schema = %schema.id,
            count = contents.len(),
            has_next = next.is_some(),
            "listed contents"
        );

        Ok(ContentPage { contents, next })
    }

    /// Look up one content by id across drafts and published events.
    pub async fn get(&self, id: &ContentId) -> Result<Option<Content>> {
        let filter = Filter::new()
            .kinds([kind::LONG_FORM, kind::LONG_FORM_DRAFT])
            .tag("d", vec![id.to_string()]);

        let event = self.pool.get(&self.config.relays.basic, filter).await?;
        Ok(event.and_then(Content::from_event_opt))
    }

    /// Sign and publish a content to every basic relay, best-effort.
    pub async fn publish(&self, input: &ContentInput) -> Result<Content> {
        crate::validation::validate_non_empty(input.id.as_str(), "content id")?;
        crate::validation::validate_relays(&self.config.relays.basic)?;

        let pubkey = self.signer.public_key().await?;
        let signed = self.signer.sign(input.to_event(pubkey)).await?;

        let receipt = self
            .pool
            .publish(&self.config.relays.basic, signed.clone())
            .await?;
        if receipt.is_total_failure() {
            return Err(Error::relay("no relay accepted the content"));
        }

        info!(
            content = %input.id,
            draft = input.is_draft,
            relays = receipt.accepted.len(),
            "content published"
        );

        Content::from_event(signed)
    }

    /// Request deletion of a content's underlying event (NIP-09).
    pub async fn remove(&self, content: &Content) -> Result<()> {
        let pubkey = self.signer.public_key().await?;

        let mut event = UnsignedEvent::now(kind::DELETION, pubkey);
        event.tags.push(Tag::pair("e", content.event.id.as_str()));

        let signed = self.signer.sign(event).await?;
        let receipt = self
            .pool
            .publish(&self.config.relays.basic, signed)
            .await?;
        if receipt.is_total_failure() {
            return Err(Error::relay("no relay accepted the deletion"));
        }

        info!(content = %content.id, "content removed");
        Ok(())
    }
}
