use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Input types a portal field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Boolean,
    Select,
    Multiselect,
    File,
    Multifile,
}

impl FieldType {
    /// Every supported type, in documentation order.
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::File,
        FieldType::Multifile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::File => "file",
            FieldType::Multifile => "multifile",
        }
    }

    /// Whether values for this type are uploaded files held in a cache directory.
    pub fn is_file_backed(&self) -> bool {
        matches!(self, FieldType::File | FieldType::Multifile)
    }

    /// Whether this type renders from a `choices` list.
    pub fn uses_choices(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }

    /// Comma separated list of all type names, used in error messages.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    /// Case-insensitive; surrounding whitespace and repeated inner spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let standardised = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == standardised)
            .ok_or_else(|| format!("invalid field type: '{s}'"))
    }
}

/// Validated display and validation rules for a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldProperties {
    pub display: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub description: String,
    pub choices: Vec<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    pub placeholder: String,
    #[serde(rename = "minNumber", skip_serializing_if = "Option::is_none")]
    pub min_number: Option<f64>,
    #[serde(rename = "maxNumber", skip_serializing_if = "Option::is_none")]
    pub max_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub read_only: bool,
    pub disable_auto_copy_selection: bool,
    pub accepted_file_types: Vec<String>,
}

/// A single declared input slot with its normalized label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub properties: FieldProperties,
}

impl Field {
    pub fn field_type(&self) -> FieldType {
        self.properties.field_type
    }

    /// Human-facing name: `display` when set, otherwise the label.
    pub fn display_name(&self) -> &str {
        if self.properties.display.trim().is_empty() {
            &self.label
        } else {
            &self.properties.display
        }
    }
}

/// Ordered, validated list of fields.
///
/// Labels are unique and kebab-cased and the list is never empty. Built once
/// by the schema validator in `portal-core` and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    fields: Vec<Field>,
}

impl FieldSchema {
    /// Wrap fields that have already passed validation.
    pub fn from_validated(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.label == label)
    }

    /// Fields whose values are uploaded files (`file` / `multifile`).
    pub fn file_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.field_type().is_file_backed())
    }
}

// ---------------------------------------------------------------------------
// Raw (unvalidated) input shape
// ---------------------------------------------------------------------------

/// Top-level shape of the declarative field list before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldSchema {
    #[serde(default)]
    pub fields: Option<Vec<RawField>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawField {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub properties: RawFieldProperties,
}

/// Field properties exactly as written by the user.
///
/// `type` is kept as free text so an unknown type surfaces as a validation
/// error rather than a parse error. Choices and default values accept any
/// scalar and are stringified.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFieldProperties {
    pub display: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub description: String,
    pub choices: Vec<serde_json::Value>,
    pub required: bool,
    pub max_length: Option<u32>,
    pub placeholder: String,
    #[serde(rename = "minNumber")]
    pub min_number: Option<f64>,
    #[serde(rename = "maxNumber")]
    pub max_number: Option<f64>,
    pub default_value: Option<serde_json::Value>,
    pub read_only: bool,
    pub disable_auto_copy_selection: bool,
    pub accepted_file_types: Vec<String>,
}

impl RawFieldProperties {
    /// Convert into validated properties once the type has been resolved.
    pub fn into_properties(self, field_type: FieldType) -> FieldProperties {
        FieldProperties {
            display: self.display,
            field_type,
            description: self.description,
            choices: self.choices.iter().map(scalar_to_string).collect(),
            required: self.required,
            max_length: self.max_length,
            placeholder: self.placeholder,
            min_number: self.min_number,
            max_number: self.max_number,
            default_value: self.default_value.as_ref().and_then(|v| match v {
                serde_json::Value::Null => None,
                other => Some(scalar_to_string(other)),
            }),
            read_only: self.read_only,
            disable_auto_copy_selection: self.disable_auto_copy_selection,
            accepted_file_types: self.accepted_file_types,
        }
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parse_is_case_insensitive() {
        assert_eq!("SELECT".parse::<FieldType>().unwrap(), FieldType::Select);
        assert_eq!("  MultiFile ".parse::<FieldType>().unwrap(), FieldType::Multifile);
        assert!("dropdown".parse::<FieldType>().is_err());
        assert!("".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_type_roundtrip_display() {
        for t in FieldType::ALL {
            assert_eq!(t.to_string().parse::<FieldType>().unwrap(), t);
        }
    }

    #[test]
    fn test_file_backed_types() {
        let backed: Vec<_> = FieldType::ALL.into_iter().filter(|t| t.is_file_backed()).collect();
        assert_eq!(backed, vec![FieldType::File, FieldType::Multifile]);
    }

    #[test]
    fn test_raw_properties_stringify_scalars() {
        let raw: RawField = serde_yaml_ng::from_str(
            "label: size\nproperties:\n  type: select\n  choices: [1, two, true]\n  defaultValue: 3\n  maxNumber: 10\n",
        )
        .unwrap();
        let props = raw.properties.into_properties(FieldType::Select);
        assert_eq!(props.choices, vec!["1", "two", "true"]);
        assert_eq!(props.default_value.as_deref(), Some("3"));
        assert_eq!(props.max_number, Some(10.0));
    }

    #[test]
    fn test_display_name_falls_back_to_label() {
        let field = Field {
            label: "release-notes".to_string(),
            properties: RawFieldProperties::default().into_properties(FieldType::Textarea),
        };
        assert_eq!(field.display_name(), "release-notes");
    }
}
