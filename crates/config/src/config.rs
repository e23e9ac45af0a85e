use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Name given to the project of a single-project config.
pub const DEFAULT_PROJECT: &str = "default";

/// Top-level GraphQL configuration.
/// Either a single project or multiple named projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphQLConfig {
    /// Multi-project configuration
    Multi {
        projects: BTreeMap<String, ProjectConfig>,
    },
    /// Single project configuration (boxed to reduce enum size)
    Single(Box<ProjectConfig>),
}

impl GraphQLConfig {
    /// Get all projects as an iterator, sorted by name.
    /// For single project configs, yields a single item named [`DEFAULT_PROJECT`].
    #[must_use]
    pub fn projects(&self) -> Box<dyn Iterator<Item = (&str, &ProjectConfig)> + '_> {
        match self {
            Self::Single(config) => Box::new(std::iter::once((DEFAULT_PROJECT, config.as_ref()))),
            Self::Multi { projects } => Box::new(
                projects
                    .iter()
                    .map(|(name, config)| (name.as_str(), config)),
            ),
        }
    }

    /// Pick the project to use.
    ///
    /// With an explicit `name`, that project must exist. Without one, a
    /// single-project config yields its project and a multi-project config
    /// yields the project named `default`, or its only project.
    pub fn select_project(&self, name: Option<&str>) -> Result<(&str, &ProjectConfig)> {
        let unknown = |name: &str| ConfigError::UnknownProject {
            name: name.to_string(),
            available: self.projects().map(|(name, _)| name.to_string()).collect(),
        };

        match (self, name) {
            (_, Some(name)) => self
                .projects()
                .find(|(project_name, _)| *project_name == name)
                .ok_or_else(|| unknown(name)),
            (Self::Single(config), None) => Ok((DEFAULT_PROJECT, config.as_ref())),
            (Self::Multi { projects }, None) => {
                if let Some((name, project)) = projects.get_key_value(DEFAULT_PROJECT) {
                    return Ok((name.as_str(), project));
                }
                let mut iter = projects.iter();
                match (iter.next(), iter.next()) {
                    (Some((name, project)), None) => Ok((name.as_str(), project)),
                    _ => Err(unknown(DEFAULT_PROJECT)),
                }
            }
        }
    }

    /// Check if this is a multi-project configuration
    #[must_use]
    pub const fn is_multi_project(&self) -> bool {
        matches!(self, Self::Multi { .. })
    }

    /// Get the number of projects
    #[must_use]
    pub fn project_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi { projects } => projects.len(),
        }
    }
}

/// Configuration for a single GraphQL project.
///
/// Keys other tools keep in the same file (`documents`, `extensions`, …) are
/// accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Where the schema comes from
    pub schema: SchemaConfig,
}

/// Schema source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaConfig {
    /// A saved introspection result, or an endpoint URL given as a plain string
    Path(String),
    /// Introspection configuration for remote schemas
    Introspection(IntrospectionSchemaConfig),
}

/// Configuration for introspecting a remote GraphQL endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchemaConfig {
    /// The GraphQL endpoint URL to introspect
    pub url: String,

    /// HTTP headers to include in the introspection request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// Request timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Number of retry attempts on failure (default: 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,

    /// Header carrying `auth_token` (default: `Authorization`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,

    /// Sent verbatim as the value of `auth_header`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

/// Where a project's schema is read from, once string shorthands are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Introspection JSON on disk. Relative paths are resolved against the
    /// directory holding the config file.
    File(PathBuf),
    /// A live endpoint.
    Endpoint(IntrospectionSchemaConfig),
}

impl SchemaConfig {
    /// Resolve the schema source. `config_dir` anchors relative file paths.
    #[must_use]
    pub fn source(&self, config_dir: &Path) -> SchemaSource {
        match self {
            Self::Introspection(config) => SchemaSource::Endpoint(config.clone()),
            Self::Path(url) if is_url(url) => SchemaSource::Endpoint(IntrospectionSchemaConfig {
                url: url.clone(),
                ..IntrospectionSchemaConfig::default()
            }),
            Self::Path(path) => SchemaSource::File(config_dir.join(path)),
        }
    }
}

fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(schema: &str) -> ProjectConfig {
        ProjectConfig {
            schema: SchemaConfig::Path(schema.to_string()),
        }
    }

    #[test]
    fn test_path_schema_deserialization() {
        let yaml = r"schema: schema.json";
        let config: ProjectConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.schema, SchemaConfig::Path("schema.json".to_string()));
        assert!(matches!(config.schema.source(Path::new(".")), SchemaSource::File(_)));
    }

    #[test]
    fn test_introspection_schema_deserialization() {
        let yaml = r"
schema:
  url: https://api.example.com/graphql
  headers:
    X-Api-Key: secret
  timeout: 60
  retry: 2
  authHeader: X-Token
  authToken: abc123
";
        let config: ProjectConfig = serde_saphyr::from_str(yaml).unwrap();
        let SchemaSource::Endpoint(introspection) = config.schema.source(Path::new(".")) else {
            panic!("expected an endpoint");
        };
        assert_eq!(introspection.url, "https://api.example.com/graphql");
        assert_eq!(
            introspection.headers.as_ref().unwrap().get("X-Api-Key"),
            Some(&"secret".to_string())
        );
        assert_eq!(introspection.timeout, Some(60));
        assert_eq!(introspection.retry, Some(2));
        assert_eq!(introspection.auth_header.as_deref(), Some("X-Token"));
        assert_eq!(introspection.auth_token.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_other_tool_keys_are_ignored() {
        let yaml = r#"
schema: schema.json
documents: "src/**/*.graphql"
extensions:
  lint:
    extends: recommended
"#;
        let config: ProjectConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config, project("schema.json"));
    }

    #[test]
    fn test_source_resolution() {
        let dir = Path::new("/work/app");

        assert_eq!(
            SchemaConfig::Path("schema.json".to_string()).source(dir),
            SchemaSource::File(PathBuf::from("/work/app/schema.json"))
        );

        match SchemaConfig::Path("https://api.example.com/graphql".to_string()).source(dir) {
            SchemaSource::Endpoint(config) => {
                assert_eq!(config.url, "https://api.example.com/graphql");
                assert!(config.headers.is_none());
            }
            SchemaSource::File(path) => panic!("expected an endpoint, got {}", path.display()),
        }
    }

    #[test]
    fn test_select_project_single() {
        let config = GraphQLConfig::Single(Box::new(project("schema.json")));
        let (name, _) = config.select_project(None).unwrap();
        assert_eq!(name, DEFAULT_PROJECT);
        assert!(config.select_project(Some("api")).is_err());
    }

    #[test]
    fn test_select_project_multi() {
        let config = GraphQLConfig::Multi {
            projects: BTreeMap::from([
                ("api".to_string(), project("api.json")),
                ("admin".to_string(), project("admin.json")),
            ]),
        };

        let (name, selected) = config.select_project(Some("admin")).unwrap();
        assert_eq!(name, "admin");
        assert_eq!(selected, &project("admin.json"));

        match config.select_project(None).unwrap_err() {
            ConfigError::UnknownProject { name, available } => {
                assert_eq!(name, DEFAULT_PROJECT);
                assert_eq!(available, vec!["admin".to_string(), "api".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_select_project_multi_prefers_default_or_only() {
        let config = GraphQLConfig::Multi {
            projects: BTreeMap::from([
                ("default".to_string(), project("main.json")),
                ("other".to_string(), project("other.json")),
            ]),
        };
        assert_eq!(config.select_project(None).unwrap().0, "default");

        let config = GraphQLConfig::Multi {
            projects: BTreeMap::from([("only".to_string(), project("only.json"))]),
        };
        assert_eq!(config.select_project(None).unwrap().0, "only");
    }
}
