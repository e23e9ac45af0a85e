//! Shape checks on a raw introspection payload.

use crate::{IntrospectionError, Result, TypeKind};
use serde_json::Value;

/// Checks that `payload` looks like an introspection result and returns the
/// object that holds `__schema`.
///
/// Both the full response (`{ "data": { "__schema": … } }`) and a bare data
/// object (`{ "__schema": … }`, as written by JSON output) are accepted. A
/// response carrying GraphQL `errors` is rejected.
///
/// # Errors
///
/// Returns [`IntrospectionError::Validation`] naming the first missing or
/// malformed field, [`IntrospectionError::UnsupportedKind`] for a kind tag
/// outside the known set, or [`IntrospectionError::GraphQl`] when the server
/// reported errors.
#[tracing::instrument(skip(payload))]
pub fn validate_introspection(payload: &Value) -> Result<&Value> {
    let root = payload
        .as_object()
        .ok_or_else(|| IntrospectionError::validation("$", "expected a JSON object"))?;

    if let Some(errors) = root.get("errors").filter(|errors| !is_empty(errors)) {
        let rendered =
            serde_json::to_string_pretty(errors).unwrap_or_else(|_| errors.to_string());
        return Err(IntrospectionError::GraphQl(rendered));
    }

    let (data, data_path) = match root.get("data") {
        Some(data) => (data, "data"),
        None if root.contains_key("__schema") => (payload, "$"),
        None => return Err(IntrospectionError::validation("data", "missing field")),
    };

    let schema_path = format!("{data_path}.__schema");
    let schema = data
        .get("__schema")
        .ok_or_else(|| IntrospectionError::validation(&schema_path, "missing field"))?;
    if !schema.is_object() {
        return Err(IntrospectionError::validation(
            &schema_path,
            "expected an object",
        ));
    }

    check_root_type(schema, &schema_path, "queryType", true)?;
    check_root_type(schema, &schema_path, "mutationType", false)?;
    check_root_type(schema, &schema_path, "subscriptionType", false)?;

    let types_path = format!("{schema_path}.types");
    let types = schema
        .get("types")
        .ok_or_else(|| IntrospectionError::validation(&types_path, "missing field"))?
        .as_array()
        .ok_or_else(|| IntrospectionError::validation(&types_path, "expected an array"))?;

    for (index, descriptor) in types.iter().enumerate() {
        check_type_descriptor(descriptor, &format!("{types_path}[{index}]"))?;
    }

    match schema.get("directives") {
        None | Some(Value::Null | Value::Array(_)) => {}
        Some(_) => {
            return Err(IntrospectionError::validation(
                format!("{schema_path}.directives"),
                "expected an array",
            ))
        }
    }

    tracing::debug!(types = types.len(), "Introspection payload is well formed");
    Ok(data)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn check_root_type(schema: &Value, schema_path: &str, key: &str, required: bool) -> Result<()> {
    let path = format!("{schema_path}.{key}");
    match schema.get(key) {
        None | Some(Value::Null) if required => {
            Err(IntrospectionError::validation(path, "missing field"))
        }
        None | Some(Value::Null) => Ok(()),
        Some(root) => match root.get("name") {
            Some(Value::String(_)) => Ok(()),
            Some(_) => Err(IntrospectionError::validation(
                format!("{path}.name"),
                "expected a string",
            )),
            None => Err(IntrospectionError::validation(
                format!("{path}.name"),
                "missing field",
            )),
        },
    }
}

fn check_type_descriptor(descriptor: &Value, path: &str) -> Result<()> {
    if !descriptor.is_object() {
        return Err(IntrospectionError::validation(path, "expected an object"));
    }

    let tag = match descriptor.get("kind") {
        Some(Value::String(tag)) => tag,
        Some(_) => {
            return Err(IntrospectionError::validation(
                format!("{path}.kind"),
                "expected a string",
            ))
        }
        None => {
            return Err(IntrospectionError::validation(
                format!("{path}.kind"),
                "missing field",
            ))
        }
    };

    let kind = TypeKind::from_tag(tag).ok_or_else(|| IntrospectionError::UnsupportedKind {
        kind: tag.clone(),
        path: format!("{path}.kind"),
    })?;

    match descriptor.get("name") {
        Some(Value::String(_)) => Ok(()),
        None | Some(Value::Null) if kind.is_wrapper() => Ok(()),
        None | Some(Value::Null) => Err(IntrospectionError::validation(
            format!("{path}.name"),
            format!("{kind} type is missing its name"),
        )),
        Some(_) => Err(IntrospectionError::validation(
            format!("{path}.name"),
            "expected a string",
        )),
    }
}
