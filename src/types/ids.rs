//! Strongly-typed identifiers.
//!
//! All IDs are validated at construction time and implement common traits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to define a strongly-typed ID newtype wrapper.
///
/// Generates: struct, `from_string()`, `as_str()`, Display, Serialize, Deserialize.
/// Optionally generates `new()` (UUID v4) and `Default` if `uuid` flag is passed.
macro_rules! define_id {
    ($name:ident, uuid) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn from_string(s: String) -> Result<Self, &'static str> {
                if s.is_empty() {
                    return Err(concat!(stringify!($name), " cannot be empty"));
                }
                Ok(Self(s))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn from_string(s: String) -> Result<Self, &'static str> {
                if s.is_empty() {
                    return Err(concat!(stringify!($name), " cannot be empty"));
                }
                Ok(Self(s))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(ContentId, uuid);
define_id!(SiteId, uuid);
define_id!(SchemaId);
define_id!(EventId);
define_id!(PublicKey);

impl SchemaId {
    /// Reserved id of the builtin long-form articles schema. Contents of
    /// this schema are stored without an `s` tag.
    pub const ARTICLES: &'static str = "articles";

    pub fn is_articles(&self) -> bool {
        self.0 == Self::ARTICLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_rejected() {
        assert!(SchemaId::from_string(String::new()).is_err());
        assert!(PublicKey::from_string(String::new()).is_err());
    }

    #[test]
    fn test_content_id_generated_unique() {
        assert_ne!(ContentId::new(), ContentId::new());
    }

    #[test]
    fn test_articles_schema_id() {
        let id = SchemaId::from_string("articles".to_string()).unwrap();
        assert!(id.is_articles());
        let other = SchemaId::from_string("recipes".to_string()).unwrap();
        assert!(!other.is_articles());
    }
}
