//! SDL (Schema Definition Language) rendering of a [`SchemaDocument`].

use crate::document::{
    DeprecationState, DirectiveDefinition, EnumValueDefinition, FieldDefinition,
    InputValueDefinition, SchemaDocument, TypeDefinition, TypeDefinitionKind, TypeReference,
};
use crate::{IntrospectionError, Result};

const INDENT: &str = "  ";

/// Longest description printed on a single `"""…"""` line.
const MAX_SINGLE_LINE_DESCRIPTION: usize = 70;

/// Options controlling SDL output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Print types sorted by name instead of in introspection order.
    pub sort_types: bool,
}

/// Prints `document` as SDL with default options.
///
/// # Errors
///
/// Returns [`IntrospectionError::Print`] if the document references a type it
/// does not define. No partial output is produced.
pub fn print_schema(document: &SchemaDocument) -> Result<String> {
    print_schema_with_options(document, &PrintOptions::default())
}

/// Prints `document` as SDL.
///
/// Output order: the `schema` definition (only when root types deviate from
/// `Query`/`Mutation`/`Subscription` or the schema has a description), custom
/// directive definitions, then type definitions. Introspection meta types,
/// the specified scalars and the specified directives are left out.
/// Definitions are separated by a blank line and the text ends with a newline.
///
/// # Errors
///
/// Returns [`IntrospectionError::Print`] if the document references a type it
/// does not define. No partial output is produced.
#[tracing::instrument(skip_all, fields(types = document.type_count(), sort_types = options.sort_types))]
pub fn print_schema_with_options(
    document: &SchemaDocument,
    options: &PrintOptions,
) -> Result<String> {
    let printer = SdlPrinter { document };
    let mut blocks = Vec::new();

    if let Some(schema_definition) = printer.schema_definition()? {
        blocks.push(schema_definition);
    }

    for directive in document.directives() {
        if !directive.is_specified() {
            blocks.push(printer.directive_definition(directive)?);
        }
    }

    let mut types: Vec<&TypeDefinition> = document
        .types()
        .filter(|ty| !ty.is_introspection_type() && !ty.is_specified_scalar())
        .collect();
    if options.sort_types {
        types.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let types_written = types.len();
    for ty in types {
        blocks.push(printer.type_definition(ty)?);
    }

    let mut sdl = blocks.join("\n\n");
    if !sdl.is_empty() {
        sdl.push('\n');
    }

    tracing::debug!(types_written, sdl_length = sdl.len(), "SDL generation complete");
    Ok(sdl)
}

struct SdlPrinter<'a> {
    document: &'a SchemaDocument,
}

impl SdlPrinter<'_> {
    fn schema_definition(&self) -> Result<Option<String>> {
        let roots = [
            ("query", self.document.query_type(), "Query"),
            ("mutation", self.document.mutation_type(), "Mutation"),
            ("subscription", self.document.subscription_type(), "Subscription"),
        ];

        let conventional_names = roots
            .iter()
            .all(|(_, name, conventional)| name.is_none_or(|name| name == *conventional));
        if conventional_names && self.document.description().is_none() {
            return Ok(None);
        }

        let mut sdl = description_block(self.document.description(), "");
        sdl.push_str("schema {\n");
        for (operation, name, _) in roots {
            if let Some(name) = name {
                self.check_defined(name, &format!("schema {operation} type"))?;
                sdl.push_str(&format!("{INDENT}{operation}: {name}\n"));
            }
        }
        sdl.push('}');
        Ok(Some(sdl))
    }

    fn directive_definition(&self, directive: &DirectiveDefinition) -> Result<String> {
        let referrer = format!("@{}", directive.name);
        let mut sdl = description_block(directive.description.as_deref(), "");
        sdl.push_str("directive @");
        sdl.push_str(&directive.name);
        sdl.push_str(&self.arguments(&directive.arguments, &referrer, "")?);
        if directive.is_repeatable {
            sdl.push_str(" repeatable");
        }
        sdl.push_str(" on ");
        sdl.push_str(&directive.locations.join(" | "));
        Ok(sdl)
    }

    fn type_definition(&self, ty: &TypeDefinition) -> Result<String> {
        let mut sdl = description_block(ty.description.as_deref(), "");
        sdl.push_str(ty.kind.keyword());
        sdl.push(' ');
        sdl.push_str(&ty.name);

        match &ty.kind {
            TypeDefinitionKind::Scalar { specified_by_url } => {
                if let Some(url) = specified_by_url {
                    sdl.push_str(&format!(" @specifiedBy(url: {})", string_literal(url)));
                }
            }
            TypeDefinitionKind::Object { fields, interfaces }
            | TypeDefinitionKind::Interface {
                fields, interfaces, ..
            } => {
                sdl.push_str(&self.implements(&ty.name, interfaces)?);
                let lines = fields
                    .iter()
                    .map(|field| self.field(&ty.name, field))
                    .collect::<Result<Vec<_>>>()?;
                sdl.push_str(&block(&lines));
            }
            TypeDefinitionKind::Union { members } => {
                let referrer = format!("union {}", ty.name);
                for member in members {
                    self.check_defined(member, &referrer)?;
                }
                if !members.is_empty() {
                    sdl.push_str(" = ");
                    sdl.push_str(&members.join(" | "));
                }
            }
            TypeDefinitionKind::Enum { values } => {
                let lines = values.iter().map(enum_value).collect::<Vec<_>>();
                sdl.push_str(&block(&lines));
            }
            TypeDefinitionKind::InputObject { fields } => {
                let lines = fields
                    .iter()
                    .map(|field| {
                        let referrer = format!("{}.{}", ty.name, field.name);
                        let mut line = description_block(field.description.as_deref(), INDENT);
                        line.push_str(INDENT);
                        line.push_str(&self.input_value(field, &referrer)?);
                        Ok(line)
                    })
                    .collect::<Result<Vec<_>>>()?;
                sdl.push_str(&block(&lines));
            }
        }

        Ok(sdl)
    }

    fn implements(&self, type_name: &str, interfaces: &[String]) -> Result<String> {
        if interfaces.is_empty() {
            return Ok(String::new());
        }
        let referrer = format!("{type_name} implements");
        for interface in interfaces {
            self.check_defined(interface, &referrer)?;
        }
        Ok(format!(" implements {}", interfaces.join(" & ")))
    }

    fn field(&self, type_name: &str, field: &FieldDefinition) -> Result<String> {
        let referrer = format!("{type_name}.{}", field.name);
        let mut sdl = description_block(field.description.as_deref(), INDENT);
        sdl.push_str(INDENT);
        sdl.push_str(&field.name);
        sdl.push_str(&self.arguments(&field.arguments, &referrer, INDENT)?);
        sdl.push_str(": ");
        sdl.push_str(&self.type_reference(&field.ty, &referrer)?);
        sdl.push_str(&deprecated(&field.deprecation));
        Ok(sdl)
    }

    /// Renders an argument list. Arguments go inline unless one of them has a
    /// description, in which case each gets its own line one level deeper.
    fn arguments(
        &self,
        arguments: &[InputValueDefinition],
        referrer: &str,
        indent: &str,
    ) -> Result<String> {
        if arguments.is_empty() {
            return Ok(String::new());
        }

        let rendered = arguments
            .iter()
            .map(|arg| self.input_value(arg, &format!("{referrer}({}:)", arg.name)))
            .collect::<Result<Vec<_>>>()?;

        if arguments.iter().all(|arg| arg.description.is_none()) {
            return Ok(format!("({})", rendered.join(", ")));
        }

        let nested = format!("{indent}{INDENT}");
        let mut sdl = String::from("(\n");
        for (arg, line) in arguments.iter().zip(rendered) {
            sdl.push_str(&description_block(arg.description.as_deref(), &nested));
            sdl.push_str(&nested);
            sdl.push_str(&line);
            sdl.push('\n');
        }
        sdl.push_str(indent);
        sdl.push(')');
        Ok(sdl)
    }

    fn input_value(&self, value: &InputValueDefinition, referrer: &str) -> Result<String> {
        let mut sdl = format!("{}: {}", value.name, self.type_reference(&value.ty, referrer)?);
        if let Some(default) = &value.default_value {
            sdl.push_str(" = ");
            sdl.push_str(default);
        }
        sdl.push_str(&deprecated(&value.deprecation));
        Ok(sdl)
    }

    fn type_reference(&self, ty: &TypeReference, referrer: &str) -> Result<String> {
        match ty {
            TypeReference::Named(name) => {
                self.check_defined(name, referrer)?;
                Ok(name.clone())
            }
            TypeReference::List(inner) => Ok(format!("[{}]", self.type_reference(inner, referrer)?)),
            TypeReference::NonNull(inner) => Ok(format!("{}!", self.type_reference(inner, referrer)?)),
        }
    }

    fn check_defined(&self, name: &str, referrer: &str) -> Result<()> {
        if self.document.contains_type(name) {
            Ok(())
        } else {
            Err(IntrospectionError::Print {
                type_name: name.to_string(),
                referrer: referrer.to_string(),
            })
        }
    }
}

fn enum_value(value: &EnumValueDefinition) -> String {
    let mut sdl = description_block(value.description.as_deref(), INDENT);
    sdl.push_str(INDENT);
    sdl.push_str(&value.name);
    sdl.push_str(&deprecated(&value.deprecation));
    sdl
}

fn block(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!(" {{\n{}\n}}", lines.join("\n"))
    }
}

fn deprecated(deprecation: &DeprecationState) -> String {
    deprecation
        .reason()
        .map(|reason| format!(" @deprecated(reason: {})", string_literal(reason)))
        .unwrap_or_default()
}

/// Renders a description on the lines preceding a definition.
///
/// Block strings drop common indentation and leading or trailing blank lines
/// when read back, so text they cannot hold unchanged is quoted instead.
fn description_block(description: Option<&str>, indent: &str) -> String {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return String::new();
    };

    let escaped = description.replace("\"\"\"", "\\\"\"\"");
    let fits_one_line = !escaped.contains(['\n', '\r'])
        && escaped.len() <= MAX_SINGLE_LINE_DESCRIPTION
        && !escaped.ends_with(['"', '\\']);

    if fits_one_line {
        return format!("{indent}\"\"\"{escaped}\"\"\"\n");
    }

    if !survives_block_string(description) {
        return format!("{indent}{}\n", string_literal(description));
    }

    let mut sdl = format!("{indent}\"\"\"\n");
    for line in escaped.lines() {
        if !line.is_empty() {
            sdl.push_str(indent);
            sdl.push_str(line);
        }
        sdl.push('\n');
    }
    sdl.push_str(indent);
    sdl.push_str("\"\"\"\n");
    sdl
}

/// Whether a multi-line block string reads back as exactly `text`.
///
/// Holds when the first line starts flush (so the printed indentation is the
/// common one) and neither end is a blank line.
fn survives_block_string(text: &str) -> bool {
    let is_blank = |line: &str| line.trim_start_matches([' ', '\t']).is_empty();
    !text.contains('\r')
        && !text.starts_with([' ', '\t'])
        && text.lines().next().is_some_and(|line| !is_blank(line))
        && !text.ends_with('\n')
        && text.lines().next_back().is_some_and(|line| !is_blank(line))
}

/// Quotes `value` as a GraphQL string literal.
fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c.is_control() => literal.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
