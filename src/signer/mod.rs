//! Signer seam (NIP-07).
//!
//! In the browser the user's keys live inside an extension that exposes
//! `getPublicKey` and `signEvent`; the page never sees the private key.
//! [`Signer`] is that boundary. Signature verification is the relays'
//! concern and never happens in this crate.

use crate::event::{Event, UnsignedEvent};
use crate::types::{PublicKey, Result};
use async_trait::async_trait;
use std::fmt;

/// Signing capability provider.
#[async_trait]
pub trait Signer: Send + Sync + fmt::Debug {
    /// Public key of the authoring user.
    async fn public_key(&self) -> Result<PublicKey>;

    /// Sign an event, producing its id and signature.
    async fn sign(&self, event: UnsignedEvent) -> Result<Event>;
}

/// Signer with a fixed public key, for tests and local development.
///
/// Computes the real NIP-01 event id but attaches a placeholder signature;
/// nothing downstream of this crate verifies signatures, relays do.
#[derive(Debug, Clone)]
pub struct StaticSigner {
    pubkey: PublicKey,
}

impl StaticSigner {
    pub fn new(pubkey: PublicKey) -> Self {
        Self { pubkey }
    }
}

#[async_trait]
impl Signer for StaticSigner {
    async fn public_key(&self) -> Result<PublicKey> {
        Ok(self.pubkey.clone())
    }

    async fn sign(&self, mut event: UnsignedEvent) -> Result<Event> {
        event.pubkey = self.pubkey.clone();
        let id = event.id()?;

        Ok(Event {
            id,
            pubkey: event.pubkey,
            created_at: event.created_at,
            kind: event.kind,
            tags: event.tags,
            content: event.content,
            sig: "0".repeat(128),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{kind, Tag};

    fn signer() -> StaticSigner {
        StaticSigner::new(PublicKey::from_string("a".repeat(64)).unwrap())
    }

    #[tokio::test]
    async fn test_sign_fills_id_and_author() {
        let mut unsigned = UnsignedEvent::now(kind::LONG_FORM, PublicKey::from_string("b".repeat(64)).unwrap());
        unsigned.tags.push(Tag::pair("d", "content-1"));

        let signed = signer().sign(unsigned).await.unwrap();
        assert_eq!(signed.pubkey.as_str(), "a".repeat(64));
        assert_eq!(signed.id.as_str().len(), 64);
        assert_eq!(signed.tag_value("d"), Some("content-1"));
    }
}
