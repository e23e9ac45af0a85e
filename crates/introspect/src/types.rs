//! Raw descriptors of a GraphQL introspection result.
//!
//! These types mirror the JSON shape of the `__schema` object returned by the
//! introspection query. They are an intermediate form only: the builder turns
//! them into a [`SchemaDocument`](crate::SchemaDocument), which is what the
//! printer consumes.

use serde::{Deserialize, Serialize};

/// The `data` object of an introspection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

/// Complete GraphQL schema information from introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub description: Option<String>,
    pub query_type: IntrospectionRootType,
    #[serde(default)]
    pub mutation_type: Option<IntrospectionRootType>,
    #[serde(default)]
    pub subscription_type: Option<IntrospectionRootType>,
    pub types: Vec<IntrospectionType>,
    #[serde(default)]
    pub directives: Option<Vec<IntrospectionDirective>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionRootType {
    pub name: String,
}

/// A type descriptor from the top-level `types` array.
///
/// Every kind shares this one shape; which of the collections are meaningful
/// depends on `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub interfaces: Option<Vec<IntrospectionTypeRef>>,
    #[serde(default)]
    pub possible_types: Option<Vec<IntrospectionTypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    #[serde(default)]
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default, rename = "specifiedByURL")]
    pub specified_by_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<IntrospectionInputValue>>,
    #[serde(rename = "type")]
    pub type_ref: IntrospectionTypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// An argument or an input object field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: IntrospectionTypeRef,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionDirective {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    pub is_repeatable: bool,
}

/// A possibly wrapped type reference (`type`, `interfaces`, `possibleTypes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionTypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<IntrospectionTypeRef>>,
}

/// The `kind` discriminant of a type descriptor.
///
/// Tags outside the closed set deserialize into [`TypeKind::Other`] so that
/// the builder can report them instead of failing inside serde.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
    #[serde(untagged)]
    Other(String),
}

impl TypeKind {
    /// Every kind tag the introspection format defines.
    pub const TAGS: [&'static str; 8] = [
        "SCALAR",
        "OBJECT",
        "INTERFACE",
        "UNION",
        "ENUM",
        "INPUT_OBJECT",
        "LIST",
        "NON_NULL",
    ];

    /// Parses a kind tag, returning `None` for tags outside [`TypeKind::TAGS`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "SCALAR" => Self::Scalar,
            "OBJECT" => Self::Object,
            "INTERFACE" => Self::Interface,
            "UNION" => Self::Union,
            "ENUM" => Self::Enum,
            "INPUT_OBJECT" => Self::InputObject,
            "LIST" => Self::List,
            "NON_NULL" => Self::NonNull,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
            Self::Other(tag) => tag,
        }
    }

    /// `LIST` and `NON_NULL` wrap another reference and carry no name.
    #[must_use]
    pub const fn is_wrapper(&self) -> bool {
        matches!(self, Self::List | Self::NonNull)
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_kind_deserializes_known_tags() {
        for tag in TypeKind::TAGS {
            let kind: TypeKind = serde_json::from_value(serde_json::json!(tag)).unwrap();
            assert_eq!(kind.as_tag(), tag);
            assert_eq!(TypeKind::from_tag(tag), Some(kind));
        }
    }

    #[test]
    fn test_type_kind_keeps_unknown_tags() {
        let kind: TypeKind = serde_json::from_value(serde_json::json!("DIRECTIVE")).unwrap();
        assert_eq!(kind, TypeKind::Other("DIRECTIVE".to_string()));
        assert_eq!(TypeKind::from_tag("DIRECTIVE"), None);
    }

    #[test]
    fn test_type_ref_nests_of_type() {
        let type_ref: IntrospectionTypeRef = serde_json::from_value(serde_json::json!({
            "kind": "NON_NULL",
            "name": null,
            "ofType": { "kind": "SCALAR", "name": "ID", "ofType": null }
        }))
        .unwrap();

        assert_eq!(type_ref.kind, TypeKind::NonNull);
        let inner = type_ref.of_type.unwrap();
        assert_eq!(inner.kind, TypeKind::Scalar);
        assert_eq!(inner.name.as_deref(), Some("ID"));
    }

    #[test]
    fn test_type_descriptor_tolerates_null_collections() {
        let ty: IntrospectionType = serde_json::from_value(serde_json::json!({
            "kind": "SCALAR",
            "name": "Date",
            "description": null,
            "fields": null,
            "inputFields": null,
            "interfaces": null,
            "enumValues": null,
            "possibleTypes": null,
            "specifiedByURL": "https://example.com/date"
        }))
        .unwrap();

        assert!(ty.fields.is_none());
        assert_eq!(ty.specified_by_url.as_deref(), Some("https://example.com/date"));
    }
}
