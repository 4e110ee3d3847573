//! Error kinds raised while linking a workspace.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Fatal failures. Anything recoverable (a package missing from the
/// registry, a directory without a descriptor) is modelled as `Option` or
/// an outcome enum instead.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("`{command}` failed with exit code {code}\n{output}")]
    CommandFailed {
        command: String,
        code: i32,
        output: String,
    },

    #[error("`{command}` did not finish within {}s", timeout.as_secs())]
    CommandTimedOut { command: String, timeout: Duration },

    #[error("malformed JSON in {}", path.display())]
    MalformedDescriptor {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected registry response for `{package}`")]
    MalformedRegistryResponse {
        package: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LinkError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        LinkError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Exit code of a failed command, if this is a command failure.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            LinkError::CommandFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}
