//! Content schemas.
//!
//! A schema describes one content type: its editable fields, whether it
//! carries a free-text body, and who may write it. Schemas drive both the
//! rendered editing form ([`form`]) and the decoding of stored events
//! ([`crate::content`]). They are persisted as rows of a key-value table
//! event on the app-data relays ([`registry`]).

use crate::types::{Error, PublicKey, Result, SchemaId};
use serde::{Deserialize, Serialize};

pub mod builtin;
pub mod form;
mod registry;

pub use registry::{SchemaRegistry, RESERVED_SCHEMA_TAGS, SCHEMA_TABLE_TITLE};

// =============================================================================
// Field model
// =============================================================================

/// Whether a field holds one value or a list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldUnit {
    Single,
    Array,
}

/// The primitive rendered and stored for a field.
///
/// Wire names are camelCase (`updatedAt`, `selectText`, ...) to stay
/// readable alongside the rows already published under the shared table
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldPrimitive {
    Text,
    Number,
    Boolean,
    Date,
    Time,
    Url,
    Image,
    /// Auto-populated with the event timestamp on every save.
    UpdatedAt,
    SelectText,
    SelectImageWithText,
}

/// One option of a select-style field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Field type: unit, primitive, and (for selects) the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    pub unit: FieldUnit,
    pub primitive: FieldPrimitive,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectable: Option<Vec<SelectOption>>,
}

impl FieldType {
    pub fn single(primitive: FieldPrimitive) -> Self {
        Self {
            unit: FieldUnit::Single,
            primitive,
            selectable: None,
        }
    }

    pub fn array(primitive: FieldPrimitive) -> Self {
        Self {
            unit: FieldUnit::Array,
            primitive,
            selectable: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One editable field of a content type. The key doubles as the event tag
/// name, so it must avoid the reserved content tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default = "default_true")]
    pub user_editable: bool,

    #[serde(default)]
    pub optional: bool,
}

impl SchemaField {
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: None,
            field_type,
            user_editable: true,
            optional: false,
        }
    }

    /// Human-readable label, falling back to the key.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

// =============================================================================
// Write rules and content rule
// =============================================================================

/// Who may author contents of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteRuleKind {
    OnlyAuthor,
    AllowList,
    All,
}

/// Write rule plus the allow list it may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRule {
    pub rule: WriteRuleKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubkeys: Option<Vec<PublicKey>>,
}

impl WriteRule {
    pub fn only_author() -> Self {
        Self {
            rule: WriteRuleKind::OnlyAuthor,
            pubkeys: None,
        }
    }

    pub fn allow_list(pubkeys: Vec<PublicKey>) -> Self {
        Self {
            rule: WriteRuleKind::AllowList,
            pubkeys: Some(pubkeys),
        }
    }

    pub fn all() -> Self {
        Self {
            rule: WriteRuleKind::All,
            pubkeys: None,
        }
    }

    /// Author constraint for content queries: `None` means unrestricted.
    pub fn author_filter(&self, own: &PublicKey) -> Option<Vec<PublicKey>> {
        match self.rule {
            WriteRuleKind::OnlyAuthor => Some(vec![own.clone()]),
            WriteRuleKind::AllowList => Some(self.pubkeys.clone().unwrap_or_default()),
            WriteRuleKind::All => None,
        }
    }
}

/// Whether contents of a schema carry a free-text body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentRule {
    Required,
    #[default]
    Optional,
    Never,
}

// =============================================================================
// Schema
// =============================================================================

/// Stored row value of a schema (everything except id and author, which
/// come from the table row key and the table event). Row JSON is wire
/// data shared with other clients; names are camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaRecord {
    label: String,

    #[serde(rename = "type")]
    schema_type: String,

    fields: Vec<SchemaField>,

    #[serde(default)]
    content: ContentRule,

    write_rule: WriteRule,
}

/// A content type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub id: SchemaId,

    /// Author of the schema table row, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<PublicKey>,

    pub label: String,

    /// Free-form grouping tag; `"h"` marks site schemas, which content
    /// listings exclude.
    #[serde(rename = "type")]
    pub schema_type: String,

    pub fields: Vec<SchemaField>,

    #[serde(default)]
    pub content: ContentRule,

    pub write_rule: WriteRule,
}

impl Schema {
    /// Decode a schema from its table row.
    pub fn from_row(id: SchemaId, pubkey: Option<PublicKey>, raw: &str) -> Result<Self> {
        let record: SchemaRecord = serde_json::from_str(raw).map_err(|e| {
            Error::invalid_event(format!("schema row {id} is not decodable: {e}"))
        })?;

        Ok(Self {
            id,
            pubkey,
            label: record.label,
            schema_type: record.schema_type,
            fields: record.fields,
            content: record.content,
            write_rule: record.write_rule,
        })
    }

    /// Encode the row value stored in the schema table (id and author are
    /// carried by the row key and the event).
    pub fn row_value(&self) -> Result<String> {
        let record = SchemaRecord {
            label: self.label.clone(),
            schema_type: self.schema_type.clone(),
            fields: self.fields.clone(),
            content: self.content,
            write_rule: self.write_rule.clone(),
        };
        Ok(serde_json::to_string(&record)?)
    }

    pub fn field(&self, key: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> &'static str {
        r#"{
            "label": "Recipes",
            "type": "food",
            "fields": [
                {"key": "title", "type": {"unit": "single", "primitive": "text"}},
                {
                    "key": "difficulty",
                    "label": "Difficulty",
                    "type": {
                        "unit": "single",
                        "primitive": "selectText",
                        "selectable": [{"value": "easy"}, {"value": "hard", "label": "Hard"}]
                    },
                    "optional": true
                }
            ],
            "writeRule": {"rule": "onlyAuthor"}
        }"#
    }

    #[test]
    fn test_from_row_applies_defaults() {
        let id = SchemaId::from_string("recipes".to_string()).unwrap();
        let schema = Schema::from_row(id, None, sample_row()).unwrap();

        assert_eq!(schema.label, "Recipes");
        assert_eq!(schema.content, ContentRule::Optional);

        let title = schema.field("title").unwrap();
        assert!(title.user_editable);
        assert!(!title.optional);
        assert_eq!(title.display_label(), "title");

        let difficulty = schema.field("difficulty").unwrap();
        assert!(difficulty.optional);
        assert_eq!(difficulty.display_label(), "Difficulty");
    }

    #[test]
    fn test_from_row_rejects_unknown_rule() {
        let id = SchemaId::from_string("bad".to_string()).unwrap();
        let raw = r#"{"label": "x", "type": "", "fields": [], "writeRule": {"rule": "anyone"}}"#;
        assert!(Schema::from_row(id, None, raw).is_err());
    }

    // Rows published by other clients of the shared table use these exact
    // names; they must keep decoding.
    #[test]
    fn test_from_row_decodes_published_wire_names() {
        let raw = r#"{
            "label": "Gigs",
            "type": "music",
            "fields": [
                {
                    "key": "poster",
                    "type": {
                        "unit": "single",
                        "primitive": "selectImageWithText",
                        "selectable": [{"value": "club", "image": "https://x/club.png"}]
                    }
                },
                {
                    "key": "updated_at",
                    "type": {"unit": "single", "primitive": "updatedAt"},
                    "userEditable": false
                }
            ],
            "content": "never",
            "writeRule": {
                "rule": "allowList",
                "pubkeys": ["bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"]
            }
        }"#;

        let id = SchemaId::from_string("gigs".to_string()).unwrap();
        let schema = Schema::from_row(id, None, raw).unwrap();

        assert_eq!(
            schema.field("poster").unwrap().field_type.primitive,
            FieldPrimitive::SelectImageWithText
        );
        assert!(!schema.field("updated_at").unwrap().user_editable);
        assert_eq!(schema.content, ContentRule::Never);
        assert_eq!(schema.write_rule.rule, WriteRuleKind::AllowList);
    }

    #[test]
    fn test_row_value_emits_wire_names() {
        let field = SchemaField {
            user_editable: false,
            ..SchemaField::new("updated_at", FieldType::single(FieldPrimitive::UpdatedAt))
        };
        let schema = Schema {
            id: SchemaId::from_string("gigs".to_string()).unwrap(),
            pubkey: None,
            label: "Gigs".to_string(),
            schema_type: "music".to_string(),
            fields: vec![field],
            content: ContentRule::Optional,
            write_rule: WriteRule::only_author(),
        };

        let row: serde_json::Value = serde_json::from_str(&schema.row_value().unwrap()).unwrap();
        assert_eq!(row["writeRule"]["rule"], "onlyAuthor");
        assert_eq!(row["fields"][0]["userEditable"], false);
        assert_eq!(row["fields"][0]["type"]["primitive"], "updatedAt");
    }

    #[test]
    fn test_row_value_roundtrip() {
        let id = SchemaId::from_string("recipes".to_string()).unwrap();
        let schema = Schema::from_row(id.clone(), None, sample_row()).unwrap();

        let row = schema.row_value().unwrap();
        let back = Schema::from_row(id, None, &row).unwrap();
        assert_eq!(schema, back);
    }

    #[test]
    fn test_author_filter_variants() {
        let own = PublicKey::from_string("a".repeat(64)).unwrap();
        let member = PublicKey::from_string("b".repeat(64)).unwrap();

        assert_eq!(
            WriteRule::only_author().author_filter(&own),
            Some(vec![own.clone()])
        );
        assert_eq!(
            WriteRule::allow_list(vec![member.clone()]).author_filter(&own),
            Some(vec![member])
        );
        assert_eq!(WriteRule::all().author_filter(&own), None);
    }
}
