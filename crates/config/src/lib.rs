//! Discovery and loading of `graphql-config` files.
//!
//! Only the `schema` entry of each project is interpreted. It names either a
//! saved introspection result or an endpoint to introspect.

mod config;
mod error;
mod loader;

pub use config::{
    GraphQLConfig, IntrospectionSchemaConfig, ProjectConfig, SchemaConfig, SchemaSource,
    DEFAULT_PROJECT,
};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};
