//! The in-memory schema graph.
//!
//! A [`SchemaDocument`] owns every [`TypeDefinition`] in one insertion-ordered
//! map. Relationships between types (field types, implemented interfaces,
//! union members, root operation types) are stored as names and resolved by
//! lookup, so self-referential and mutually referential types need no shared
//! ownership.

use indexmap::IndexMap;
use std::fmt;

/// Reason substituted when something is deprecated without an explicit reason.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Scalars every GraphQL schema has implicitly.
pub const SPECIFIED_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Directives every GraphQL schema has implicitly.
pub const SPECIFIED_DIRECTIVES: [&str; 4] = ["skip", "include", "deprecated", "specifiedBy"];

/// A complete schema rebuilt from one introspection result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    pub(crate) description: Option<String>,
    pub(crate) types: IndexMap<String, TypeDefinition>,
    pub(crate) query_type: Option<String>,
    pub(crate) mutation_type: Option<String>,
    pub(crate) subscription_type: Option<String>,
    pub(crate) directives: Vec<DirectiveDefinition>,
}

impl SchemaDocument {
    /// Builds a document from the `data` object of an introspection result.
    ///
    /// See [`build_schema`](crate::build_schema).
    pub fn from_introspection(data: &serde_json::Value) -> crate::Result<Self> {
        crate::build::build_schema(data)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Type definitions in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn query_type(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    #[must_use]
    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    #[must_use]
    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    #[must_use]
    pub fn directives(&self) -> &[DirectiveDefinition] {
        &self.directives
    }
}

/// A named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub kind: TypeDefinitionKind,
}

impl TypeDefinition {
    /// Whether this is one of the `__`-prefixed introspection meta types.
    #[must_use]
    pub fn is_introspection_type(&self) -> bool {
        is_introspection_name(&self.name)
    }

    /// Whether this is one of the scalars every schema defines implicitly.
    #[must_use]
    pub fn is_specified_scalar(&self) -> bool {
        matches!(self.kind, TypeDefinitionKind::Scalar { .. })
            && SPECIFIED_SCALARS.contains(&self.name.as_str())
    }
}

/// Kind-specific members of a [`TypeDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinitionKind {
    Scalar {
        specified_by_url: Option<String>,
    },
    Object {
        fields: Vec<FieldDefinition>,
        interfaces: Vec<String>,
    },
    Interface {
        fields: Vec<FieldDefinition>,
        interfaces: Vec<String>,
        /// Implementing types known to the server.
        possible_types: Vec<String>,
    },
    Union {
        members: Vec<String>,
    },
    Enum {
        values: Vec<EnumValueDefinition>,
    },
    InputObject {
        fields: Vec<InputValueDefinition>,
    },
}

impl TypeDefinitionKind {
    /// The SDL keyword that introduces a definition of this kind.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Scalar { .. } => "scalar",
            Self::Object { .. } => "type",
            Self::Interface { .. } => "interface",
            Self::Union { .. } => "union",
            Self::Enum { .. } => "enum",
            Self::InputObject { .. } => "input",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: TypeReference,
    pub deprecation: DeprecationState,
}

/// An argument of a field or directive, or a field of an input object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeReference,
    /// Default value as GraphQL literal text, exactly as introspection reported it.
    pub default_value: Option<String>,
    pub deprecation: DeprecationState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: DeprecationState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub is_repeatable: bool,
    pub locations: Vec<String>,
}

impl DirectiveDefinition {
    #[must_use]
    pub fn is_specified(&self) -> bool {
        SPECIFIED_DIRECTIVES.contains(&self.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeprecationState {
    #[default]
    NotDeprecated,
    Deprecated(Option<String>),
}

impl DeprecationState {
    #[must_use]
    pub fn from_introspection(is_deprecated: bool, reason: Option<&str>) -> Self {
        if is_deprecated {
            Self::Deprecated(reason.map(str::to_string))
        } else {
            Self::NotDeprecated
        }
    }

    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        matches!(self, Self::Deprecated(_))
    }

    /// The reason to print, falling back to [`DEFAULT_DEPRECATION_REASON`].
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::NotDeprecated => None,
            Self::Deprecated(reason) => {
                Some(reason.as_deref().unwrap_or(DEFAULT_DEPRECATION_REASON))
            }
        }
    }
}

/// A reference to a named type, possibly wrapped in list and non-null markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    Named(String),
    List(Box<TypeReference>),
    NonNull(Box<TypeReference>),
}

impl TypeReference {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    #[must_use]
    pub fn non_null(inner: Self) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// The name at the bottom of the wrapper chain.
    #[must_use]
    pub fn named_type(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

pub(crate) fn is_introspection_name(name: &str) -> bool {
    name.starts_with("__")
}
