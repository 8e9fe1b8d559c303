//! Field schema parsing and validation.
//!
//! Converts the declarative YAML field list into a validated [`FieldSchema`].
//! Validation is fail-fast and per field in input order: the type check runs
//! before label normalization, which runs before the duplicate check, and
//! the first violation aborts the whole schema.

pub mod label;

use std::collections::HashSet;

use portal_types::error::SchemaError;
use portal_types::field::{Field, FieldSchema, FieldType, RawFieldSchema};

pub use label::normalize_label;

/// Parse and validate a YAML field list with a top-level `fields` sequence.
pub fn validate(raw: &str) -> Result<FieldSchema, SchemaError> {
    if raw.trim().is_empty() {
        tracing::error!("No fields provided");
        return Err(SchemaError::NoFieldsProvided);
    }

    let parsed: Option<RawFieldSchema> = serde_yaml_ng::from_str(raw).map_err(|e| {
        tracing::error!(error = %e, "Unmarshalling field(s) failed");
        SchemaError::MalformedFieldsInputDataProvided(e.to_string())
    })?;

    let raw_fields = parsed.and_then(|p| p.fields).unwrap_or_default();
    if raw_fields.is_empty() {
        tracing::error!("No fields provided");
        return Err(SchemaError::NoFieldsProvided);
    }

    let mut seen_labels: HashSet<String> = HashSet::with_capacity(raw_fields.len());
    let mut fields = Vec::with_capacity(raw_fields.len());

    for raw_field in raw_fields {
        let field_type = raw_field
            .properties
            .field_type
            .parse::<FieldType>()
            .map_err(|_| {
                tracing::error!(
                    label = %raw_field.label,
                    provided = %raw_field.properties.field_type,
                    "Invalid field type provided"
                );
                SchemaError::InvalidFieldType {
                    label: raw_field.label.clone(),
                    provided: raw_field.properties.field_type.clone(),
                    valid: FieldType::supported_list(),
                }
            })?;

        let label = normalize_label(&raw_field.label).ok_or_else(|| {
            tracing::error!(label = %raw_field.label, "Invalid label provided");
            SchemaError::InvalidLabel(raw_field.label.clone())
        })?;

        if !seen_labels.insert(label.clone()) {
            tracing::error!(label = %label, "Duplicate field label detected");
            return Err(SchemaError::DuplicateFieldLabel(label));
        }

        if field_type.uses_choices() && raw_field.properties.choices.is_empty() {
            tracing::warn!(label = %label, field_type = %field_type, "Field declares no choices");
        }

        fields.push(Field {
            label,
            properties: raw_field.properties.into_properties(field_type),
        });
    }

    Ok(FieldSchema::from_validated(fields))
}
