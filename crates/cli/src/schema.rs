//! Resolving where the schema comes from, fetching it, and writing it out.

use anyhow::{Context, Result};
use colored::Colorize;
use graphql_config::{find_config, load_config, IntrospectionSchemaConfig, SchemaSource};
use graphql_introspect::{
    render_with_options, IntrospectionClient, IntrospectionError, OutputFormat, PrintOptions,
};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default timeout in seconds for introspection requests.
const DEFAULT_TIMEOUT: u64 = 30;

/// Header that carries `--auth-token` unless `--auth-header` names another.
const DEFAULT_AUTH_HEADER: &str = "Authorization";

/// Source and request options given on the command line.
#[derive(Debug, Default)]
pub struct SourceArgs {
    pub url: Option<String>,
    pub from_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub project: Option<String>,
    pub headers: Vec<String>,
    pub auth_header: Option<String>,
    pub auth_token: Option<String>,
    pub timeout: Option<u64>,
    pub retry: Option<u32>,
}

/// How and where to write the result.
#[derive(Debug)]
pub struct OutputArgs {
    pub format: OutputFormat,
    pub sort_types: bool,
    pub output: Option<PathBuf>,
    pub show_progress: bool,
    pub show_info: bool,
}

/// Where the introspection result is read from.
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaInput {
    Endpoint(IntrospectionSettings),
    File(PathBuf),
}

impl SchemaInput {
    fn describe(&self) -> String {
        match self {
            Self::Endpoint(settings) => settings.url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Resolved introspection settings from config file and CLI arguments.
#[derive(Debug, PartialEq, Eq)]
pub struct IntrospectionSettings {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: u64,
    pub retry: u32,
}

/// Fetches or reads the schema and writes it out.
///
/// Returns `false` when no schema source was given or discovered.
#[tracing::instrument(skip_all)]
pub async fn run(source: &SourceArgs, output: &OutputArgs) -> Result<bool> {
    let start_time = Instant::now();
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;

    let Some(input) = resolve_input(source, &cwd)? else {
        return Ok(false);
    };
    tracing::debug!(?input, "Resolved schema source");

    let spinner = crate::progress::spinner(
        &format!("Fetching schema from {}...", input.describe()),
        output.output.is_some() && output.show_progress,
    );
    let payload = load_payload(&input).await;
    spinner.finish_and_clear();
    let payload = payload?;

    let options = PrintOptions {
        sort_types: output.sort_types,
    };
    let mut content = render_with_options(&payload, output.format, &options)
        .with_context(|| format!("Failed to convert schema from {}", input.describe()))?;
    if !content.ends_with('\n') {
        content.push('\n');
    }

    if let Some(path) = &output.output {
        std::fs::write(path, &content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;

        if output.show_info {
            let format_name = match output.format {
                OutputFormat::Sdl => "SDL",
                OutputFormat::Json => "JSON",
            };
            println!(
                "{} Schema written to {} ({} format)",
                "✓".green(),
                path.display().to_string().cyan(),
                format_name
            );
            println!("  {} {:.2}s", "⏱".dimmed(), start_time.elapsed().as_secs_f64());
        }
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(content.as_bytes())
            .and_then(|()| handle.flush())
            .context("Failed to write to stdout")?;
    }

    Ok(true)
}

async fn load_payload(input: &SchemaInput) -> Result<Value> {
    match input {
        SchemaInput::Endpoint(settings) => {
            let client = IntrospectionClient::new()
                .with_timeout(Duration::from_secs(settings.timeout))
                .with_retries(settings.retry)
                .with_headers(settings.headers.iter().cloned());

            client
                .execute(&settings.url)
                .await
                .with_context(|| format!("Failed to fetch schema from {}", settings.url))
        }
        SchemaInput::File(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .map_err(|e| IntrospectionError::Parse(e.to_string()))
                .with_context(|| format!("Failed to parse {}", path.display()))
        }
    }
}

/// Parses a header string in "Name: Value" format.
pub fn parse_header(header: &str) -> Result<(String, String)> {
    let Some((name, value)) = header.split_once(':') else {
        anyhow::bail!("Invalid header format: '{header}'. Expected 'Header-Name: Header-Value'");
    };
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Header name cannot be empty");
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Sets `name` to `value`, replacing any header of the same name
/// (case-insensitive).
fn upsert_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
    headers.push((name, value));
}

/// Decide where the schema comes from.
///
/// Precedence: `--from-file`, then a URL argument, then a config file
/// (`--config`, or discovered from `cwd` upwards). Returns `None` when there
/// is no source at all.
pub fn resolve_input(source: &SourceArgs, cwd: &Path) -> Result<Option<SchemaInput>> {
    if let Some(path) = &source.from_file {
        return Ok(Some(SchemaInput::File(path.clone())));
    }

    if let Some(url) = &source.url {
        let endpoint = IntrospectionSchemaConfig {
            url: url.clone(),
            ..IntrospectionSchemaConfig::default()
        };
        let settings = merge_settings(endpoint, source)?;
        return Ok(Some(SchemaInput::Endpoint(settings)));
    }

    let config_path = match &source.config {
        Some(path) => path.clone(),
        None => match find_config(cwd).context("Failed to search for config")? {
            Some(path) => path,
            None if source.project.is_some() => {
                anyhow::bail!(
                    "No GraphQL config file found. Use --config to specify one or provide a URL."
                )
            }
            None => return Ok(None),
        },
    };

    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let (project_name, project) = config.select_project(source.project.as_deref())?;
    tracing::debug!(project = project_name, config = %config_path.display(), "Using config project");

    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    match project.schema.source(config_dir) {
        SchemaSource::File(path) => Ok(Some(SchemaInput::File(path))),
        SchemaSource::Endpoint(endpoint) => {
            Ok(Some(SchemaInput::Endpoint(merge_settings(endpoint, source)?)))
        }
    }
}

/// Merge endpoint settings from config with CLI overrides. CLI values win.
fn merge_settings(
    endpoint: IntrospectionSchemaConfig,
    source: &SourceArgs,
) -> Result<IntrospectionSettings> {
    let mut headers: Vec<(String, String)> =
        endpoint.headers.unwrap_or_default().into_iter().collect();
    headers.sort();

    let auth_header = source
        .auth_header
        .clone()
        .or(endpoint.auth_header)
        .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string());
    let auth_token = source.auth_token.clone().or(endpoint.auth_token);
    if let Some(token) = auth_token.filter(|token| !token.is_empty()) {
        upsert_header(&mut headers, auth_header, token);
    }

    for header in &source.headers {
        let (name, value) = parse_header(header).context("Failed to parse headers")?;
        upsert_header(&mut headers, name, value);
    }

    let timeout = source.timeout.or(endpoint.timeout).unwrap_or(DEFAULT_TIMEOUT);
    if timeout == 0 {
        anyhow::bail!("Timeout must be at least one second");
    }

    Ok(IntrospectionSettings {
        url: endpoint.url,
        headers,
        timeout,
        retry: source.retry.or(endpoint.retry).unwrap_or(0),
    })
}
