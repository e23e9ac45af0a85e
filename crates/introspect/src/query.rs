//! The introspection query text.

use std::sync::LazyLock;

/// Standard GraphQL introspection query.
///
/// Fetches root operation types, every type with its fields, arguments,
/// input fields, interfaces, enum values and possible types (including
/// deprecated members), and every directive. Type references nest seven
/// levels deep, enough for wrappers like `[[[String!]!]!]`.
///
/// Older servers reject queries asking for `specifiedByURL`, `isRepeatable`
/// or a schema `description`, so none of them is requested here. Use
/// [`introspection_query`] to opt in.
pub static INTROSPECTION_QUERY: LazyLock<String> =
    LazyLock::new(|| introspection_query(&IntrospectionQueryOptions::default()));

/// Optional parts of the introspection query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntrospectionQueryOptions {
    /// Request `specifiedByURL` on scalar types.
    pub specified_by_url: bool,
    /// Request `isRepeatable` on directives.
    pub directive_is_repeatable: bool,
    /// Request the schema's own `description`.
    pub schema_description: bool,
}

impl IntrospectionQueryOptions {
    /// Every optional field enabled, for servers on the October 2021 GraphQL release.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            specified_by_url: true,
            directive_is_repeatable: true,
            schema_description: true,
        }
    }
}

/// Builds the introspection query with the given optional fields.
#[must_use]
pub fn introspection_query(options: &IntrospectionQueryOptions) -> String {
    let specified_by_url = if options.specified_by_url {
        "\n  specifiedByURL"
    } else {
        ""
    };
    let schema_description = if options.schema_description {
        "\n    description"
    } else {
        ""
    };
    let is_repeatable = if options.directive_is_repeatable {
        "\n      isRepeatable"
    } else {
        ""
    };

    format!(
        r"
query IntrospectionQuery {{
  __schema {{{schema_description}
    queryType {{ name }}
    mutationType {{ name }}
    subscriptionType {{ name }}
    types {{
      ...FullType
    }}
    directives {{
      name
      description{is_repeatable}
      locations
      args {{
        ...InputValue
      }}
    }}
  }}
}}

fragment FullType on __Type {{
  kind
  name
  description{specified_by_url}
  fields(includeDeprecated: true) {{
    name
    description
    args {{
      ...InputValue
    }}
    type {{
      ...TypeRef
    }}
    isDeprecated
    deprecationReason
  }}
  inputFields {{
    ...InputValue
  }}
  interfaces {{
    ...TypeRef
  }}
  enumValues(includeDeprecated: true) {{
    name
    description
    isDeprecated
    deprecationReason
  }}
  possibleTypes {{
    ...TypeRef
  }}
}}

fragment InputValue on __InputValue {{
  name
  description
  type {{
    ...TypeRef
  }}
  defaultValue
}}

fragment TypeRef on __Type {{
  kind
  name
  ofType {{
    kind
    name
    ofType {{
      kind
      name
      ofType {{
        kind
        name
        ofType {{
          kind
          name
          ofType {{
            kind
            name
            ofType {{
              kind
              name
              ofType {{
                kind
                name
                ofType {{
                  kind
                  name
                }}
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_omits_optional_fields() {
        assert!(INTROSPECTION_QUERY.contains("__schema"));
        assert!(INTROSPECTION_QUERY.contains("fields(includeDeprecated: true)"));
        assert!(INTROSPECTION_QUERY.contains("enumValues(includeDeprecated: true)"));
        assert!(!INTROSPECTION_QUERY.contains("specifiedByURL"));
        assert!(!INTROSPECTION_QUERY.contains("isRepeatable"));
    }

    #[test]
    fn test_optional_fields() {
        let query = introspection_query(&IntrospectionQueryOptions {
            specified_by_url: true,
            directive_is_repeatable: false,
            schema_description: false,
        });
        assert!(query.contains("specifiedByURL"));
        assert!(!query.contains("isRepeatable"));

        let query = introspection_query(&IntrospectionQueryOptions::all());
        assert!(query.contains("specifiedByURL"));
        assert!(query.contains("isRepeatable"));
        assert!(query.contains("__schema {\n    description"));
    }

    #[test]
    fn test_type_ref_nesting_depth() {
        let fragment = INTROSPECTION_QUERY
            .split("fragment TypeRef")
            .nth(1)
            .unwrap();
        assert_eq!(fragment.matches("ofType").count(), 7);
    }

    #[test]
    fn test_braces_are_balanced() {
        let query = introspection_query(&IntrospectionQueryOptions::all());
        assert_eq!(query.matches('{').count(), query.matches('}').count());
    }
}
