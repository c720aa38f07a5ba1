//! Schema → form mapping.
//!
//! The editing UI renders a form straight from a JSON-Schema document. This
//! module owns that translation:
//!   - [`form_schema`]: schema → JSON-Schema with `input_mode` widget hints
//!   - [`auto_populate`]: initial form data (zero values + auto fields)
//!   - [`content_form_value`]: stored content → form data for editing
//!   - [`validate`]: submitted form data against the compiled JSON-Schema
//!
//! Widget hints understood by the renderer: `markdown`, `image_upload`,
//! `textarea`, `hidden`, `auto_populated_updated_at`, `auto_populated_client`.

use crate::content::Content;
use crate::schema::{ContentRule, FieldPrimitive, FieldUnit, Schema, SchemaField};
use crate::types::{Error, Result, CLIENT};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Build the JSON-Schema document describing the editing form of a schema.
pub fn form_schema(schema: &Schema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &schema.fields {
        let mut property = primitive_schema(field);

        if field.field_type.unit == FieldUnit::Array {
            property = json!({
                "type": "array",
                "title": field.display_label(),
                "items": property,
            });
        } else if let Value::Object(map) = &mut property {
            map.insert("title".to_string(), json!(field.display_label()));
        }

        if !field.user_editable && !has_auto_mode(&property) {
            if let Value::Object(map) = &mut property {
                map.insert("input_mode".to_string(), json!("hidden"));
            }
        }

        if !field.optional && field.user_editable {
            required.push(field.key.clone());
        }
        properties.insert(field.key.clone(), property);
    }

    match schema.content {
        ContentRule::Never => {}
        rule => {
            properties.insert(
                "content".to_string(),
                json!({"type": "string", "title": "Content", "input_mode": "markdown"}),
            );
            if rule == ContentRule::Required {
                required.push("content".to_string());
            }
        }
    }

    json!({
        "type": "object",
        "title": schema.label,
        "properties": properties,
        "required": required,
    })
}

fn has_auto_mode(property: &Value) -> bool {
    property
        .get("input_mode")
        .and_then(Value::as_str)
        .is_some_and(|mode| mode.starts_with("auto_populated"))
}

fn primitive_schema(field: &SchemaField) -> Value {
    match field.field_type.primitive {
        FieldPrimitive::Text => json!({"type": "string"}),
        FieldPrimitive::Number => json!({"type": "number"}),
        FieldPrimitive::Boolean => json!({"type": "boolean"}),
        FieldPrimitive::Date => json!({"type": "string", "format": "date"}),
        FieldPrimitive::Time => json!({"type": "string", "format": "time"}),
        FieldPrimitive::Url => json!({"type": "string", "format": "uri"}),
        FieldPrimitive::Image => {
            json!({"type": "string", "format": "uri", "input_mode": "image_upload"})
        }
        FieldPrimitive::UpdatedAt => {
            json!({"type": "integer", "input_mode": "auto_populated_updated_at"})
        }
        FieldPrimitive::SelectText | FieldPrimitive::SelectImageWithText => {
            let options = field.field_type.selectable.as_deref().unwrap_or(&[]);
            let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
            let names: Vec<&str> = options
                .iter()
                .map(|o| o.label.as_deref().unwrap_or(o.value.as_str()))
                .collect();
            json!({"type": "string", "enum": values, "enumNames": names})
        }
    }
}

/// Initial form data derived from a form schema: auto-populated fields get
/// their live values, everything else a type-appropriate zero value.
/// Nested object properties are flattened with dotted keys.
pub fn auto_populate(form_schema: &Value) -> Value {
    let mut data = Map::new();

    if let Some(properties) = form_schema.get("properties").and_then(Value::as_object) {
        populate_properties(properties, "", &mut data);
    }

    Value::Object(data)
}

fn populate_properties(properties: &Map<String, Value>, base: &str, data: &mut Map<String, Value>) {
    for (key, item) in properties {
        let data_key = if base.is_empty() {
            key.clone()
        } else {
            format!("{base}.{key}")
        };

        let value = match item.get("input_mode").and_then(Value::as_str) {
            Some("auto_populated_updated_at") => Some(json!(chrono::Utc::now().timestamp())),
            Some("auto_populated_client") => Some(json!(CLIENT)),
            _ => {
                if item.get("format").is_some() {
                    // Formatted inputs (date, uri, ...) start empty.
                    None
                } else {
                    Some(zero_value(item.get("type").and_then(Value::as_str)))
                }
            }
        };

        if let Some(value) = value {
            data.insert(data_key, value);
        }

        if let Some(nested) = item.get("properties").and_then(Value::as_object) {
            populate_properties(nested, key, data);
        }
    }
}

fn zero_value(type_name: Option<&str>) -> Value {
    match type_name {
        Some("array") => json!([]),
        Some("object") => json!({}),
        Some("integer") | Some("number") => json!(0),
        Some("boolean") => json!(false),
        Some("null") => Value::Null,
        _ => json!(""),
    }
}

/// Project a stored content into form data, typing the flat tag values
/// through the schema fields.
pub fn content_form_value(content: &Content, schema: &Schema) -> Value {
    let mut data = Map::new();

    for field in &schema.fields {
        let Some(values) = content.fields.get(&field.key) else {
            continue;
        };

        let value = match field.field_type.unit {
            // Each element carries the primitive type, matching the `items`
            // schema the form document declares.
            FieldUnit::Array => {
                let typed: Vec<Value> = values
                    .iter()
                    .filter_map(|raw| typed_value(field.field_type.primitive, raw))
                    .collect();
                json!(typed)
            }
            FieldUnit::Single => {
                let first = values.first().map(String::as_str).unwrap_or("");
                match typed_value(field.field_type.primitive, first) {
                    Some(value) => value,
                    None => {
                        debug!(field = %field.key, value = first, "untypable value skipped");
                        continue;
                    }
                }
            }
        };

        data.insert(field.key.clone(), value);
    }

    if !content.content.is_empty() {
        data.insert("content".to_string(), json!(content.content));
    }

    Value::Object(data)
}

fn typed_value(primitive: FieldPrimitive, raw: &str) -> Option<Value> {
    match primitive {
        FieldPrimitive::Number => raw.parse::<f64>().ok().map(|n| json!(n)),
        FieldPrimitive::UpdatedAt => raw.parse::<i64>().ok().map(|n| json!(n)),
        FieldPrimitive::Boolean => Some(json!(raw.eq_ignore_ascii_case("true"))),
        _ => Some(json!(raw)),
    }
}

/// Validate submitted form data against the schema's form description.
pub fn validate(schema: &Schema, data: &Value) -> Result<()> {
    let document = form_schema(schema);
    let validator = jsonschema::validator_for(&document)
        .map_err(|e| Error::schema_violation(format!("schema {} is not compilable: {e}", schema.id)))?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| format!("{}: {e}", e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::schema_violation(errors.join("; ")))
    }
}
