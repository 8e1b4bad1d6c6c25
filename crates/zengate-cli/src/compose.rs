use std::{path::Path, process::Command};

use color_eyre::Result;
use tracing::info;
use which::which;

const REPO_URL: &str = "https://github.com/myferr/zengate";
const CHECKOUT_DIR: &str = "zengate";

/// Which compose flavor to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComposeRunner {
    /// Standalone `docker-compose` (v1).
    Standalone,
    /// `docker compose` CLI plugin (v2).
    Plugin,
}

/// Clone the stack repo if it is not checked out yet, then run
/// `docker compose up --build` inside it with inherited stdio.
pub fn run() -> Result<()> {
    if which("git").is_err() {
        color_eyre::eyre::bail!("git is not installed or not in PATH");
    }
    let runner = detect_compose();

    let checkout = Path::new(CHECKOUT_DIR);
    if checkout.exists() {
        println!("{CHECKOUT_DIR} directory exists, skipping clone.");
    } else {
        println!("Cloning {REPO_URL} ...");
        let status = Command::new("git").args(["clone", REPO_URL]).status()?;
        if !status.success() {
            color_eyre::eyre::bail!("failed to clone {REPO_URL}");
        }
    }

    let (program, args) = compose_invocation(runner);
    info!(program, "running compose");
    println!("Running docker compose up --build...");
    let status = Command::new(program)
        .args(args)
        .current_dir(checkout)
        .status()?;
    if !status.success() {
        color_eyre::eyre::bail!("docker compose exited with {status}");
    }
    Ok(())
}

/// Prefer standalone docker-compose when installed, fall back to the
/// docker CLI plugin.
fn detect_compose() -> ComposeRunner {
    if which("docker-compose").is_ok() {
        ComposeRunner::Standalone
    } else {
        ComposeRunner::Plugin
    }
}

fn compose_invocation(runner: ComposeRunner) -> (&'static str, Vec<&'static str>) {
    match runner {
        ComposeRunner::Standalone => ("docker-compose", vec!["up", "--build"]),
        ComposeRunner::Plugin => ("docker", vec!["compose", "up", "--build"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standalone_invocation_uses_docker_compose() {
        let (program, args) = compose_invocation(ComposeRunner::Standalone);
        assert_eq!(program, "docker-compose");
        assert_eq!(args, vec!["up", "--build"]);
    }

    #[test]
    fn plugin_invocation_goes_through_the_docker_cli() {
        let (program, args) = compose_invocation(ComposeRunner::Plugin);
        assert_eq!(program, "docker");
        assert_eq!(args, vec!["compose", "up", "--build"]);
    }
}
