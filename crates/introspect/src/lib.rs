//! GraphQL introspection to SDL.
//!
//! This crate turns the JSON result of a GraphQL introspection query into a
//! [`SchemaDocument`] graph and prints that graph as Schema Definition
//! Language (SDL). It also ships an HTTP client that fetches the introspection
//! result from a live endpoint.
//!
//! The pipeline is validate, build, print:
//!
//! 1. [`validate_introspection`] checks the payload shape and unwraps `data`.
//! 2. [`build_schema`] registers every type name, then resolves every
//!    reference against that registry.
//! 3. [`print_schema`] renders the document.
//!
//! Each stage fails with a single [`IntrospectionError`]; no partial output is
//! ever produced.
//!
//! # Examples
//!
//! ## From a saved introspection result
//!
//! ```
//! use graphql_introspect::introspection_to_sdl;
//!
//! let payload = serde_json::json!({
//!     "data": {
//!         "__schema": {
//!             "queryType": { "name": "Query" },
//!             "types": [
//!                 {
//!                     "kind": "OBJECT",
//!                     "name": "Query",
//!                     "fields": [{
//!                         "name": "hello",
//!                         "args": [],
//!                         "type": { "kind": "SCALAR", "name": "String", "ofType": null },
//!                         "isDeprecated": false,
//!                         "deprecationReason": null
//!                     }],
//!                     "interfaces": []
//!                 },
//!                 { "kind": "SCALAR", "name": "String" }
//!             ],
//!             "directives": []
//!         }
//!     }
//! });
//!
//! let sdl = introspection_to_sdl(&payload).unwrap();
//! assert_eq!(sdl, "type Query {\n  hello: String\n}\n");
//! ```
//!
//! ## From a live endpoint
//!
//! ```no_run
//! use graphql_introspect::{render, IntrospectionClient, OutputFormat};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = IntrospectionClient::new()
//!         .with_auth("Authorization", "Bearer my-token")
//!         .with_timeout(Duration::from_secs(60))
//!         .with_retries(3);
//!
//!     let response = client.execute("https://api.example.com/graphql").await?;
//!     println!("{}", render(&response, OutputFormat::Sdl)?);
//!     Ok(())
//! }
//! ```

mod build;
mod client;
mod document;
mod error;
mod print;
mod query;
mod types;
mod validate;

pub use build::build_schema;
pub use client::IntrospectionClient;
pub use document::{
    DeprecationState, DirectiveDefinition, EnumValueDefinition, FieldDefinition,
    InputValueDefinition, SchemaDocument, TypeDefinition, TypeDefinitionKind, TypeReference,
    DEFAULT_DEPRECATION_REASON, SPECIFIED_DIRECTIVES, SPECIFIED_SCALARS,
};
pub use error::{IntrospectionError, Result};
pub use print::{print_schema, print_schema_with_options, PrintOptions};
pub use query::{introspection_query, IntrospectionQueryOptions, INTROSPECTION_QUERY};
pub use types::*;
pub use validate::validate_introspection;

use serde_json::Value;

/// What [`render`] produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Schema Definition Language.
    #[default]
    Sdl,
    /// The introspection `data` object, pretty printed.
    Json,
}

/// Converts an introspection result to SDL.
///
/// Accepts the full response (`{ "data": { "__schema": … } }`) or the bare
/// `data` object.
///
/// # Errors
///
/// Returns the first validation, build or print error.
pub fn introspection_to_sdl(payload: &Value) -> Result<String> {
    introspection_to_sdl_with_options(payload, &PrintOptions::default())
}

/// Like [`introspection_to_sdl`], with control over the printer.
///
/// # Errors
///
/// Returns the first validation, build or print error.
#[tracing::instrument(skip(payload))]
pub fn introspection_to_sdl_with_options(payload: &Value, options: &PrintOptions) -> Result<String> {
    let data = validate_introspection(payload)?;
    let document = build_schema(data)?;
    tracing::debug!(types = document.type_count(), "Schema document built");
    print_schema_with_options(&document, options)
}

/// Renders an introspection result in the requested format.
///
/// JSON output is the validated `data` object re-serialized with two-space
/// indentation and no trailing newline; field order is kept as received.
///
/// # Errors
///
/// Returns the first validation, build or print error. JSON output is only
/// validated, never built, so it succeeds for any well-formed payload.
pub fn render(payload: &Value, format: OutputFormat) -> Result<String> {
    render_with_options(payload, format, &PrintOptions::default())
}

/// Like [`render`], with control over the SDL printer.
///
/// # Errors
///
/// See [`render`].
pub fn render_with_options(
    payload: &Value,
    format: OutputFormat,
    options: &PrintOptions,
) -> Result<String> {
    match format {
        OutputFormat::Sdl => introspection_to_sdl_with_options(payload, options),
        OutputFormat::Json => {
            let data = validate_introspection(payload)?;
            serde_json::to_string_pretty(data).map_err(|e| IntrospectionError::Parse(e.to_string()))
        }
    }
}

/// Introspects a GraphQL endpoint with default client settings and converts
/// the result to SDL.
///
/// # Errors
///
/// Returns an error if:
/// - The network request fails
/// - The server returns an HTTP error or GraphQL errors
/// - The response is not a valid introspection result
/// - The schema cannot be rebuilt or printed
///
/// # Examples
///
/// ```no_run
/// # use graphql_introspect::introspect_url_to_sdl;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let sdl = introspect_url_to_sdl("https://api.example.com/graphql").await?;
/// print!("{sdl}");
/// # Ok(())
/// # }
/// ```
#[tracing::instrument]
pub async fn introspect_url_to_sdl(url: &str) -> Result<String> {
    tracing::info!("Starting introspection");
    let response = IntrospectionClient::new().execute(url).await?;
    tracing::debug!("Converting introspection to SDL");
    let sdl = introspection_to_sdl(&response)?;
    tracing::info!(sdl_length = sdl.len(), "Introspection complete");
    Ok(sdl)
}
