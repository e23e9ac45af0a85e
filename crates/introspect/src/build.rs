//! Two-pass construction of a [`SchemaDocument`] from introspection JSON.
//!
//! Type descriptors reference each other by name, forwards and in cycles, so
//! every name is registered (with its kind) before any member is populated.
//! Population then resolves each named reference against that registry.

use crate::document::{
    is_introspection_name, DeprecationState, DirectiveDefinition, EnumValueDefinition,
    FieldDefinition, InputValueDefinition, SchemaDocument, TypeDefinition, TypeDefinitionKind,
    TypeReference,
};
use crate::types::{
    IntrospectionData, IntrospectionDirective, IntrospectionEnumValue, IntrospectionField,
    IntrospectionInputValue, IntrospectionSchema, IntrospectionType, IntrospectionTypeRef,
    TypeKind,
};
use crate::{IntrospectionError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Kind of a registered type. Wrapper kinds never name a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl NamedKind {
    /// The named kind a tag stands for, `None` for wrappers and unknown tags.
    const fn from_type_kind(kind: &TypeKind) -> Option<Self> {
        match kind {
            TypeKind::Scalar => Some(Self::Scalar),
            TypeKind::Object => Some(Self::Object),
            TypeKind::Interface => Some(Self::Interface),
            TypeKind::Union => Some(Self::Union),
            TypeKind::Enum => Some(Self::Enum),
            TypeKind::InputObject => Some(Self::InputObject),
            TypeKind::List | TypeKind::NonNull | TypeKind::Other(_) => None,
        }
    }

    const fn describe(self) -> &'static str {
        match self {
            Self::Scalar => "a scalar",
            Self::Object => "an object type",
            Self::Interface => "an interface",
            Self::Union => "a union",
            Self::Enum => "an enum",
            Self::InputObject => "an input object",
        }
    }
}

/// Builds a [`SchemaDocument`] from the `data` object of an introspection
/// result (the object holding `__schema`).
///
/// # Errors
///
/// - [`IntrospectionError::Validation`] when the payload cannot be read as
///   introspection descriptors, or when the rebuilt graph breaks a schema
///   invariant (duplicate type, empty enum, union member that is not an object
///   type, implemented name that is not an interface, non-object root type).
/// - [`IntrospectionError::UnsupportedKind`] for a kind tag outside the known set.
/// - [`IntrospectionError::DanglingReference`] when a named reference points at
///   a type missing from `types`.
#[tracing::instrument(skip(data))]
pub fn build_schema(data: &Value) -> Result<SchemaDocument> {
    if data.get("__schema").is_none() {
        return Err(IntrospectionError::validation("__schema", "missing field"));
    }
    let raw = IntrospectionData::deserialize(data)
        .map_err(|e| IntrospectionError::validation("__schema", e.to_string()))?
        .schema;

    SchemaBuilder::register(&raw)?.populate()
}

struct SchemaBuilder<'a> {
    raw: &'a IntrospectionSchema,
    registry: IndexMap<&'a str, NamedKind>,
}

impl<'a> SchemaBuilder<'a> {
    /// Registration pass: record every type name and kind in payload order.
    fn register(raw: &'a IntrospectionSchema) -> Result<Self> {
        let mut registry = IndexMap::with_capacity(raw.types.len());

        for (index, ty) in raw.types.iter().enumerate() {
            let path = format!("__schema.types[{index}]");
            let kind = match (NamedKind::from_type_kind(&ty.kind), &ty.kind) {
                (Some(kind), _) => kind,
                (None, TypeKind::Other(tag)) => {
                    return Err(IntrospectionError::UnsupportedKind {
                        kind: tag.clone(),
                        path: format!("{path}.kind"),
                    })
                }
                (None, _) => {
                    return Err(IntrospectionError::validation(
                        format!("{path}.kind"),
                        format!("{} is a wrapper and cannot define a named type", ty.kind),
                    ))
                }
            };

            let name = ty.name.as_deref().ok_or_else(|| {
                IntrospectionError::validation(format!("{path}.name"), "missing type name")
            })?;

            if registry.insert(name, kind).is_some() {
                return Err(IntrospectionError::validation(
                    format!("{path}.name"),
                    format!("type `{name}` is defined more than once"),
                ));
            }
        }

        tracing::debug!(types = registry.len(), "Registered type names");
        Ok(Self { raw, registry })
    }

    /// Population pass: fill in the members of every registered type.
    fn populate(self) -> Result<SchemaDocument> {
        let mut types = IndexMap::with_capacity(self.registry.len());
        for ty in &self.raw.types {
            let definition = self.type_definition(ty)?;
            types.insert(definition.name.clone(), definition);
        }

        let directives = self
            .raw
            .directives
            .iter()
            .flatten()
            .map(|directive| self.directive_definition(directive))
            .collect::<Result<Vec<_>>>()?;

        let query_type = self.root_type("query", Some(self.raw.query_type.name.as_str()))?;
        let mutation_type = self.root_type(
            "mutation",
            self.raw.mutation_type.as_ref().map(|root| root.name.as_str()),
        )?;
        let subscription_type = self.root_type(
            "subscription",
            self.raw
                .subscription_type
                .as_ref()
                .map(|root| root.name.as_str()),
        )?;

        tracing::debug!(
            types = types.len(),
            directives = directives.len(),
            "Populated schema document"
        );

        Ok(SchemaDocument {
            description: self.raw.description.clone(),
            types,
            query_type,
            mutation_type,
            subscription_type,
            directives,
        })
    }

    fn type_definition(&self, ty: &IntrospectionType) -> Result<TypeDefinition> {
        // Registration already rejected nameless descriptors.
        let name = ty.name.as_deref().unwrap_or_default();

        let kind = match &ty.kind {
            TypeKind::Scalar => TypeDefinitionKind::Scalar {
                specified_by_url: ty.specified_by_url.clone(),
            },
            TypeKind::Object => TypeDefinitionKind::Object {
                fields: self.fields(name, ty.fields.as_deref())?,
                interfaces: self.named_list(
                    ty.interfaces.as_deref(),
                    &format!("type {name} implements"),
                    &[NamedKind::Interface],
                )?,
            },
            TypeKind::Interface => TypeDefinitionKind::Interface {
                fields: self.fields(name, ty.fields.as_deref())?,
                interfaces: self.named_list(
                    ty.interfaces.as_deref(),
                    &format!("interface {name} implements"),
                    &[NamedKind::Interface],
                )?,
                possible_types: self.named_list(
                    ty.possible_types.as_deref(),
                    &format!("possible types of interface {name}"),
                    &[NamedKind::Object, NamedKind::Interface],
                )?,
            },
            TypeKind::Union => TypeDefinitionKind::Union {
                members: self.named_list(
                    ty.possible_types.as_deref(),
                    &format!("union {name}"),
                    &[NamedKind::Object],
                )?,
            },
            TypeKind::Enum => {
                let values = ty
                    .enum_values
                    .iter()
                    .flatten()
                    .map(enum_value_definition)
                    .collect::<Vec<_>>();
                if values.is_empty() {
                    return Err(IntrospectionError::validation(
                        format!("{name}.enumValues"),
                        format!("enum `{name}` must declare at least one value"),
                    ));
                }
                TypeDefinitionKind::Enum { values }
            }
            TypeKind::InputObject => TypeDefinitionKind::InputObject {
                fields: ty
                    .input_fields
                    .iter()
                    .flatten()
                    .map(|field| {
                        self.input_value(field, &format!("{name}.{}", field.name))
                    })
                    .collect::<Result<Vec<_>>>()?,
            },
            TypeKind::List | TypeKind::NonNull | TypeKind::Other(_) => {
                return Err(IntrospectionError::validation(
                    name,
                    format!("{} cannot define a named type", ty.kind),
                ))
            }
        };

        Ok(TypeDefinition {
            name: name.to_string(),
            description: ty.description.clone(),
            kind,
        })
    }

    fn fields(
        &self,
        type_name: &str,
        fields: Option<&[IntrospectionField]>,
    ) -> Result<Vec<FieldDefinition>> {
        fields
            .unwrap_or_default()
            .iter()
            .map(|field| self.field(type_name, field))
            .collect()
    }

    fn field(&self, type_name: &str, field: &IntrospectionField) -> Result<FieldDefinition> {
        let referrer = format!("{type_name}.{}", field.name);

        let arguments = field
            .args
            .iter()
            .flatten()
            .map(|arg| self.input_value(arg, &format!("{referrer}({}:)", arg.name)))
            .collect::<Result<Vec<_>>>()?;

        Ok(FieldDefinition {
            name: field.name.clone(),
            description: field.description.clone(),
            arguments,
            ty: self.type_reference(&field.type_ref, &referrer)?,
            deprecation: DeprecationState::from_introspection(
                field.is_deprecated,
                field.deprecation_reason.as_deref(),
            ),
        })
    }

    fn input_value(
        &self,
        value: &IntrospectionInputValue,
        referrer: &str,
    ) -> Result<InputValueDefinition> {
        Ok(InputValueDefinition {
            name: value.name.clone(),
            description: value.description.clone(),
            ty: self.type_reference(&value.type_ref, referrer)?,
            default_value: value.default_value.clone(),
            deprecation: DeprecationState::from_introspection(
                value.is_deprecated,
                value.deprecation_reason.as_deref(),
            ),
        })
    }

    fn directive_definition(&self, directive: &IntrospectionDirective) -> Result<DirectiveDefinition> {
        let arguments = directive
            .args
            .iter()
            .flatten()
            .map(|arg| self.input_value(arg, &format!("@{}({}:)", directive.name, arg.name)))
            .collect::<Result<Vec<_>>>()?;

        Ok(DirectiveDefinition {
            name: directive.name.clone(),
            description: directive.description.clone(),
            arguments,
            is_repeatable: directive.is_repeatable,
            locations: directive.locations.clone(),
        })
    }

    /// Unwraps the `ofType` chain into a [`TypeReference`].
    fn type_reference(
        &self,
        type_ref: &IntrospectionTypeRef,
        referrer: &str,
    ) -> Result<TypeReference> {
        match &type_ref.kind {
            TypeKind::List => Ok(TypeReference::list(
                self.type_reference(wrapped(type_ref, referrer)?, referrer)?,
            )),
            TypeKind::NonNull => Ok(TypeReference::non_null(
                self.type_reference(wrapped(type_ref, referrer)?, referrer)?,
            )),
            TypeKind::Other(tag) => Err(IntrospectionError::UnsupportedKind {
                kind: tag.clone(),
                path: referrer.to_string(),
            }),
            TypeKind::Scalar
            | TypeKind::Object
            | TypeKind::Interface
            | TypeKind::Union
            | TypeKind::Enum
            | TypeKind::InputObject => {
                let name = type_ref.name.as_deref().ok_or_else(|| {
                    IntrospectionError::validation(
                        referrer,
                        format!("{} type reference is missing its name", type_ref.kind),
                    )
                })?;
                let registered = self.resolve(name, referrer)?;
                if NamedKind::from_type_kind(&type_ref.kind) != Some(registered) {
                    return Err(IntrospectionError::validation(
                        referrer,
                        format!(
                            "`{name}` is referenced as {} but is {}",
                            type_ref.kind,
                            registered.describe()
                        ),
                    ));
                }
                Ok(TypeReference::named(name))
            }
        }
    }

    /// Resolves a list of plain named references (interfaces, union members,
    /// possible types) and checks each target's kind.
    fn named_list(
        &self,
        refs: Option<&[IntrospectionTypeRef]>,
        referrer: &str,
        allowed: &[NamedKind],
    ) -> Result<Vec<String>> {
        refs.unwrap_or_default()
            .iter()
            .map(|type_ref| {
                let name = type_ref.name.as_deref().ok_or_else(|| {
                    IntrospectionError::validation(referrer, "type reference is missing its name")
                })?;
                let kind = self.resolve(name, referrer)?;
                if !allowed.contains(&kind) {
                    return Err(IntrospectionError::validation(
                        referrer,
                        format!("`{name}` is {}", kind.describe()),
                    ));
                }
                Ok(name.to_string())
            })
            .collect()
    }

    fn root_type(&self, operation: &str, name: Option<&str>) -> Result<Option<String>> {
        let Some(name) = name else {
            return Ok(None);
        };

        if is_introspection_name(name) {
            tracing::warn!(operation, name, "Ignoring introspection type used as a root type");
            return Ok(None);
        }

        let referrer = format!("schema {operation} type");
        let kind = self.resolve(name, &referrer)?;
        if kind != NamedKind::Object {
            return Err(IntrospectionError::validation(
                format!("__schema.{operation}Type"),
                format!("root {operation} type `{name}` is {}", kind.describe()),
            ));
        }
        Ok(Some(name.to_string()))
    }

    fn resolve(&self, name: &str, referrer: &str) -> Result<NamedKind> {
        self.registry
            .get(name)
            .copied()
            .ok_or_else(|| IntrospectionError::DanglingReference {
                type_name: name.to_string(),
                referrer: referrer.to_string(),
            })
    }
}

fn wrapped<'r>(type_ref: &'r IntrospectionTypeRef, referrer: &str) -> Result<&'r IntrospectionTypeRef> {
    type_ref.of_type.as_deref().ok_or_else(|| {
        IntrospectionError::validation(
            referrer,
            format!("{} type reference is missing `ofType`", type_ref.kind),
        )
    })
}

fn enum_value_definition(value: &IntrospectionEnumValue) -> EnumValueDefinition {
    EnumValueDefinition {
        name: value.name.clone(),
        description: value.description.clone(),
        deprecation: DeprecationState::from_introspection(
            value.is_deprecated,
            value.deprecation_reason.as_deref(),
        ),
    }
}
