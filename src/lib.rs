//! # Noscms Core - Headless CMS over Nostr
//!
//! Rust implementation of the CMS core providing:
//! - Schema-driven content/event mapping (fields ⇄ event tags)
//! - Schema registry stored as a key-value table event on app-data relays
//! - Content querying with cursor pagination over relay results
//! - Site settings encode/decode and services
//! - Trait seams for the relay pool transport and the NIP-07 signer
//!
//! ## Architecture
//!
//! Services are thin async coordinators over two seams:
//! ```text
//!   ContentService ─┬─► RelayPool (list / get / publish)
//!   SchemaRegistry ─┤
//!   SiteService ────┴─► Signer (public_key / sign)
//! ```
//! Everything between the seams is pure data transformation: schema rows,
//! form schemas, tag codecs, cursors. The UI, the websocket transport, and
//! the signing extension live outside this crate.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod content;
pub mod event;
pub mod relay;
pub mod schema;
pub mod signer;
pub mod site;
pub mod types;

// Internal utilities
pub mod observability;
pub mod validation;

pub use types::{Config, Error, Result};
