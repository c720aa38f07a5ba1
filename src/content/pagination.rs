//! Cursor pagination over content listings.
//!
//! Pages descend by `created_at`. The cursor is an opaque base64 token
//! wrapping the `until` watermark of the next page, so UI clients can hold
//! it without knowing the scheme. Each next cursor strictly lowers the
//! watermark, which guarantees page iteration terminates.

use crate::content::Content;
use crate::types::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Opaque position in a content listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Inclusive upper bound on `created_at` for the next page.
    pub(crate) until: i64,
}

impl Cursor {
    /// Cursor for the page following events down to `oldest_created_at`.
    ///
    /// The next watermark excludes the boundary timestamp entirely: events
    /// sharing `created_at` with the page's oldest entry but cut off by the
    /// page limit are not returned by later pages.
    pub(crate) fn before(oldest_created_at: i64) -> Self {
        Self {
            until: oldest_created_at - 1,
        }
    }

    /// Encode into the opaque token handed to clients.
    pub fn encode(&self) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(self)?))
    }

    /// Decode a client-held token.
    pub fn decode(token: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| Error::validation(format!("malformed cursor: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::validation(format!("malformed cursor: {e}")))
    }
}

/// One page of a content listing.
#[derive(Debug, Clone)]
pub struct ContentPage {
    pub contents: Vec<Content>,

    /// Cursor for the next (older) page; `None` when this page was not full.
    pub next: Option<Cursor>,
}

impl ContentPage {
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}
