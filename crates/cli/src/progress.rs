use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const CI_VARS: [&str; 6] = ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"];

/// Detect if we're running in a CI environment
fn is_ci() -> bool {
    is_ci_with(|name| std::env::var_os(name).is_some())
}

fn is_ci_with(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARS.iter().any(|name| is_set(name))
}

/// Create a spinner with a message.
/// Returns a hidden spinner when `visible` is false or in CI environments.
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible || is_ci() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
