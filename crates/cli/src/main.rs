mod exit_code;
mod progress;
mod schema;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use exit_code::ExitCode;
use graphql_introspect::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "get-graphql-schema")]
#[command(
    about = "Fetch and print the GraphQL schema from a GraphQL HTTP endpoint",
    long_about = "Fetch and print the GraphQL schema from a GraphQL HTTP endpoint.\n\
                  Outputs the schema as SDL by default.\n\n\
                  Usage: get-graphql-schema ENDPOINT_URL > schema.graphql"
)]
#[command(version, disable_version_flag = true)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// GraphQL endpoint URL to introspect
    #[arg(value_name = "ENDPOINT_URL", conflicts_with = "from_file")]
    url: Option<String>,

    /// Output in JSON format (the introspection query result)
    #[arg(short, long)]
    json: bool,

    /// Header that carries the auth token [default: Authorization]
    #[arg(short = 'a', long, alias = "auth_header", value_name = "HEADER")]
    auth_header: Option<String>,

    /// Authorization token, sent verbatim as the auth header value
    #[arg(short = 't', long, alias = "auth_token", value_name = "TOKEN")]
    auth_token: Option<String>,

    /// Additional HTTP header (can be specified multiple times)
    /// Format: "Header-Name: Header-Value"
    #[arg(long = "header", short = 'H', value_name = "HEADER")]
    headers: Vec<String>,

    /// Request timeout in seconds (overrides config file)
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Number of retry attempts on failure (overrides config file)
    #[arg(long, value_name = "COUNT")]
    retry: Option<u32>,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Read a saved introspection result instead of querying an endpoint
    #[arg(long, value_name = "FILE")]
    from_file: Option<PathBuf>,

    /// Print type definitions sorted by name
    #[arg(long)]
    sort: bool,

    /// Path to GraphQL config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project name (for multi-project configs)
    #[arg(short, long)]
    project: Option<String>,

    /// Suppress all output except the schema and errors
    #[arg(short, long)]
    quiet: bool,

    /// Force colored output even when not a TTY
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Cli {
    fn source_args(&self) -> schema::SourceArgs {
        schema::SourceArgs {
            url: self.url.clone(),
            from_file: self.from_file.clone(),
            config: self.config.clone(),
            project: self.project.clone(),
            headers: self.headers.clone(),
            auth_header: self.auth_header.clone(),
            auth_token: self.auth_token.clone(),
            timeout: self.timeout,
            retry: self.retry,
        }
    }

    fn output_args(&self) -> schema::OutputArgs {
        schema::OutputArgs {
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Sdl
            },
            sort_types: self.sort,
            output: self.output.clone(),
            show_progress: !self.quiet,
            show_info: !self.quiet,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    match schema::run(&cli.source_args(), &cli.output_args()).await {
        Ok(true) => {}
        Ok(false) => {
            // Nothing to fetch: show usage, like running with no arguments.
            let mut command = Cli::command();
            if command.print_help().is_err() {
                ExitCode::IoError.exit();
            }
        }
        Err(error) => {
            let code = ExitCode::from_error(&error);
            tracing::debug!(%code, "Exiting with error");
            eprintln!("{} {error:#}", "error:".red().bold());
            code.exit();
        }
    }
}

/// Initialize tracing. Logs go to stderr so stdout carries only the schema.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from([
            "get-graphql-schema",
            "https://example.com/graphql",
            "-j",
            "-a",
            "X-Token",
            "-t",
            "secret",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("https://example.com/graphql"));
        assert!(cli.json);
        assert_eq!(cli.auth_header.as_deref(), Some("X-Token"));
        assert_eq!(cli.auth_token.as_deref(), Some("secret"));
        assert_eq!(cli.output_args().format, OutputFormat::Json);
    }

    #[test]
    fn accepts_underscore_auth_aliases() {
        let cli = Cli::try_parse_from([
            "get-graphql-schema",
            "https://example.com/graphql",
            "--auth_header",
            "X-Token",
            "--auth_token",
            "secret",
        ])
        .unwrap();

        let source = cli.source_args();
        assert_eq!(source.auth_header.as_deref(), Some("X-Token"));
        assert_eq!(source.auth_token.as_deref(), Some("secret"));
    }

    #[test]
    fn short_v_prints_version() {
        let error = Cli::try_parse_from(["get-graphql-schema", "-v"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn url_conflicts_with_from_file() {
        let result = Cli::try_parse_from([
            "get-graphql-schema",
            "https://example.com/graphql",
            "--from-file",
            "schema.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn repeated_headers_and_defaults() {
        let cli = Cli::try_parse_from([
            "get-graphql-schema",
            "https://example.com/graphql",
            "-H",
            "X-One: 1",
            "--header",
            "X-Two: 2",
            "--sort",
            "-o",
            "schema.graphql",
        ])
        .unwrap();

        assert_eq!(cli.headers, vec!["X-One: 1", "X-Two: 2"]);
        let output = cli.output_args();
        assert_eq!(output.format, OutputFormat::Sdl);
        assert!(output.sort_types);
        assert!(output.show_info);
        assert_eq!(output.output, Some(PathBuf::from("schema.graphql")));
    }

    #[test]
    fn quiet_hides_progress_and_info() {
        let cli = Cli::try_parse_from(["get-graphql-schema", "--quiet"]).unwrap();
        let output = cli.output_args();
        assert!(!output.show_progress);
        assert!(!output.show_info);
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }
}

#[cfg(test)]
mod color_tests {
    use super::configure_colors;
    use colored::control::{self, SHOULD_COLORIZE};
    use std::sync::Mutex;

    // Tests below mutate process-wide env vars and the color override.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn with_clean_env<F: FnOnce()>(f: F) {
        let _lock = TEST_MUTEX.lock().unwrap();

        let saved: Vec<_> = ["NO_COLOR", "CLICOLOR", "CLICOLOR_FORCE"]
            .into_iter()
            .map(|name| (name, std::env::var_os(name)))
            .collect();
        for (name, _) in &saved {
            std::env::remove_var(name);
        }
        control::unset_override();

        f();

        control::unset_override();
        for (name, value) in saved {
            if let Some(value) = value {
                std::env::set_var(name, value);
            }
        }
    }

    #[test]
    fn color_flag_overrides_no_color_env() {
        with_clean_env(|| {
            std::env::set_var("NO_COLOR", "1");
            configure_colors(true, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn no_color_flag_forces_colors_off() {
        with_clean_env(|| {
            configure_colors(false, true);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn clicolor_force_enables_colors() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR_FORCE", "1");
            configure_colors(false, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn clicolor_zero_disables_colors() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR", "0");
            configure_colors(false, false);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }
}
