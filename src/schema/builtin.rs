//! Builtin schemas.
//!
//! The long-form `articles` schema ships with the application and is never
//! persisted to a schema table. Its contents are plain NIP-23 articles, so
//! they are stored without an `s` tag and queried without one.

use crate::schema::{
    ContentRule, FieldPrimitive, FieldType, Schema, SchemaField, WriteRule,
};
use crate::types::SchemaId;

/// The builtin articles schema.
pub fn articles() -> Schema {
    #[allow(clippy::unwrap_used)] // const non-empty id
    let id = SchemaId::from_string(SchemaId::ARTICLES.to_string()).unwrap();

    Schema {
        id,
        pubkey: None,
        label: "Articles".to_string(),
        schema_type: String::new(),
        fields: vec![
            SchemaField {
                label: Some("Image".to_string()),
                ..SchemaField::new("image", FieldType::single(FieldPrimitive::Image))
            },
            SchemaField {
                label: Some("Title".to_string()),
                ..SchemaField::new("title", FieldType::single(FieldPrimitive::Text))
            },
            SchemaField {
                label: Some("Published".to_string()),
                user_editable: false,
                ..SchemaField::new("published_at", FieldType::single(FieldPrimitive::Date))
            },
            SchemaField {
                label: Some("Client".to_string()),
                user_editable: false,
                ..SchemaField::new("client", FieldType::single(FieldPrimitive::Url))
            },
        ],
        content: ContentRule::Optional,
        write_rule: WriteRule::only_author(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_articles_schema_shape() {
        let schema = articles();
        assert!(schema.id.is_articles());
        assert_eq!(schema.fields.len(), 4);
        assert!(schema.field("title").unwrap().user_editable);
        assert!(!schema.field("published_at").unwrap().user_editable);
    }
}
