//! Repository URL lookup through the package registry.
//!
//! The registry is queried with `<tool> view <package> repository --json`.
//! Every query ends in one of three ways: the package declares a
//! repository URL, the package exists without one, or the registry does not
//! know the package. Anything else is a failure and propagates.

use anyhow::Result;
use serde_json::Value;

use crate::core::errors::LinkError;
use crate::util::process::{shell_quote, CommandOutput, CommandRunner};

/// Default registry client.
pub const DEFAULT_REGISTRY_TOOL: &str = "npm";

/// npm's error code for an unknown package.
const NOT_FOUND_CODE: &str = "E404";

/// Outcome of a repository lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryLookup {
    /// The package declares this repository URL.
    Found(String),
    /// The package exists but declares no repository.
    NoRepository,
    /// The registry does not know the package.
    NotFound,
}

impl RepositoryLookup {
    pub fn into_url(self) -> Option<String> {
        match self {
            RepositoryLookup::Found(url) => Some(url),
            RepositoryLookup::NoRepository | RepositoryLookup::NotFound => None,
        }
    }
}

/// Resolves source-control URLs of packages.
pub struct RegistryResolver<'a> {
    runner: &'a dyn CommandRunner,
    tool: String,
}

impl<'a> RegistryResolver<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        RegistryResolver {
            runner,
            tool: DEFAULT_REGISTRY_TOOL.to_string(),
        }
    }

    /// Use a different registry client executable.
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// The query command for `package`.
    pub fn view_command(&self, package: &str) -> String {
        format!(
            "{} view {} repository --json",
            self.tool,
            shell_quote(package)
        )
    }

    /// Repository URL of `package`, or `None` if the package is unknown to
    /// the registry or declares no repository.
    pub fn resolve_git_url(&self, package: &str) -> Result<Option<String>> {
        Ok(self.lookup(package)?.into_url())
    }

    /// Query the registry and classify the answer.
    pub fn lookup(&self, package: &str) -> Result<RepositoryLookup> {
        let command = self.view_command(package);
        let output = self.runner.run(&command)?;

        if !output.success() {
            if is_not_found(&output) {
                tracing::debug!("`{}` is not in the registry", package);
                return Ok(RepositoryLookup::NotFound);
            }
            return Err(LinkError::CommandFailed {
                command,
                code: output.code,
                output: output.combined(),
            }
            .into());
        }

        let lookup = parse_repository(package, &output.stdout)?;
        if lookup == RepositoryLookup::NoRepository {
            tracing::debug!("`{}` declares no repository", package);
        }
        Ok(lookup)
    }
}

/// Whether a failed query means the package does not exist.
///
/// With `--json`, npm reports errors as `{"error": {"code": "E404", ..}}`
/// on stdout. Older clients only print `npm ERR! code E404` on stderr.
fn is_not_found(output: &CommandOutput) -> bool {
    if let Ok(value) = serde_json::from_str::<Value>(output.stdout.trim()) {
        if let Some(code) = value.pointer("/error/code").and_then(Value::as_str) {
            return code == NOT_FOUND_CODE;
        }
    }

    output.stderr.lines().any(|line| {
        let line = line.trim();
        line.ends_with(&format!("code {}", NOT_FOUND_CODE)) || line.contains("404 Not Found")
    })
}

fn parse_repository(package: &str, stdout: &str) -> Result<RepositoryLookup> {
    let stdout = stdout.trim();
    // npm prints nothing when the field is missing.
    if stdout.is_empty() {
        return Ok(RepositoryLookup::NoRepository);
    }

    let value: Value =
        serde_json::from_str(stdout).map_err(|source| LinkError::MalformedRegistryResponse {
            package: package.to_string(),
            source,
        })?;

    Ok(repository_url(&value)
        .map(RepositoryLookup::Found)
        .unwrap_or(RepositoryLookup::NoRepository))
}

/// Extract the URL from the shapes npm uses for `repository`: a bare
/// string, `{"url": ..}`, or the same nested under `repository`. A version
/// range yields an array; the newest entry is last.
fn repository_url(value: &Value) -> Option<String> {
    match value {
        Value::String(url) if !url.is_empty() => Some(url.clone()),
        Value::Object(map) => match map.get("repository") {
            Some(nested) => repository_url(nested),
            None => map
                .get("url")
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        },
        Value::Array(items) => items.iter().rev().find_map(repository_url),
        _ => None,
    }
}
