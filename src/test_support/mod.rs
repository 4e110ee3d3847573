//! Test utilities and mocks for devlink unit tests.
//!
//! This module provides mock implementations of the [`FileSystem`] and
//! [`CommandRunner`] seams so linking logic can be exercised without
//! touching the disk or spawning `npm`.
//!
//! # Example
//!
//! ```rust,ignore
//! use devlink::test_support::{MockExecutor, MockFileSystem, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let fs = MockFileSystem::new();
//!     fs.add_file("app/package.json", r#"{"name": "app"}"#);
//!
//!     let exec = MockExecutor::new();
//!     exec.expect("npm view ckeditor5-core repository --json", MockProcessOutput::success("{}"));
//!
//!     // Use mocks in tests...
//! }
//! ```

pub mod fixtures;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};

use crate::util::fs::{EntryKind, FileSystem};
use crate::util::process::{CommandOutput, CommandRunner};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Ordered log shared between mocks, for asserting on the interleaving of
/// commands and filesystem mutations.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: String) {
        lock(&self.0).push(entry);
    }

    /// All entries recorded so far.
    pub fn entries(&self) -> Vec<String> {
        lock(&self.0).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Dir,
    Link(PathBuf),
}

#[derive(Debug, Default)]
struct FsState {
    /// Insertion ordered, so `read_dir` has a stable listing order.
    nodes: Vec<(PathBuf, Node)>,
    failing: Vec<PathBuf>,
    reads: Vec<PathBuf>,
    writes: Vec<(PathBuf, String)>,
    symlinks: Vec<(PathBuf, PathBuf)>,
    removed_links: Vec<PathBuf>,
}

impl FsState {
    fn node(&self, path: &Path) -> Option<&Node> {
        self.nodes.iter().find(|(p, _)| p == path).map(|(_, n)| n)
    }

    fn insert(&mut self, path: PathBuf, node: Node) {
        match self.nodes.iter_mut().find(|(p, _)| *p == path) {
            Some(slot) => slot.1 = node,
            None => self.nodes.push((path, node)),
        }
    }

    fn add_dir(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && self.node(parent).is_none() {
                self.add_dir(parent);
            }
        }
        if self.node(path).is_none() {
            self.nodes.push((path.to_path_buf(), Node::Dir));
        }
    }

    /// Follow symlinks (relative targets resolve against the link's parent).
    fn resolve(&self, path: &Path, depth: usize) -> Option<(PathBuf, Node)> {
        match self.node(path)? {
            Node::Link(target) if depth < 16 => {
                let target = match path.parent() {
                    Some(parent) if target.is_relative() => normalize(&parent.join(target)),
                    _ => target.clone(),
                };
                self.resolve(&target, depth + 1)
            }
            Node::Link(_) => None,
            node => Some((path.to_path_buf(), node.clone())),
        }
    }
}

/// Lexically collapse `..` and `.` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

/// Mock filesystem for testing without real I/O.
///
/// Directories, files and symlinks live in memory. Reads, writes and link
/// operations are recorded so tests can assert on them. Unlike a real
/// filesystem, `symlink` replaces whatever is at the destination, since the
/// removal of a destination directory happens through the command runner
/// which this mock cannot observe.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<FsState>>,
    log: Option<CallLog>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record filesystem mutations into a shared log.
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Add a file with the given content, creating parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref();
        let mut state = lock(&self.state);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                state.add_dir(parent);
            }
        }
        state.insert(path.to_path_buf(), Node::File(content.into()));
    }

    /// Add a directory and all its parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        lock(&self.state).add_dir(path.as_ref());
    }

    /// Add a symlink at `path` pointing to `target`.
    pub fn add_link(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = lock(&self.state);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                state.add_dir(parent);
            }
        }
        state.insert(path.to_path_buf(), Node::Link(target.as_ref().to_path_buf()));
    }

    /// Make every lookup of `path` fail with a non-NotFound error.
    pub fn fail_lookup(&self, path: impl AsRef<Path>) {
        lock(&self.state).failing.push(path.as_ref().to_path_buf());
    }

    /// Current contents of a file.
    pub fn read_string(&self, path: impl AsRef<Path>) -> Option<String> {
        match lock(&self.state).node(path.as_ref()) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// Target of the symlink at `path`, if any.
    pub fn link_target(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        match lock(&self.state).node(path.as_ref()) {
            Some(Node::Link(target)) => Some(target.clone()),
            _ => None,
        }
    }

    /// Paths passed to `read_to_string`, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        lock(&self.state).reads.clone()
    }

    /// `(path, contents)` of every write, in call order.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        lock(&self.state).writes.clone()
    }

    /// `(src, dst)` of every symlink created, in call order.
    pub fn symlinks(&self) -> Vec<(PathBuf, PathBuf)> {
        lock(&self.state).symlinks.clone()
    }

    /// Symlinks removed through `remove_link`.
    pub fn removed_links(&self) -> Vec<PathBuf> {
        lock(&self.state).removed_links.clone()
    }

    fn check_lookup(state: &FsState, path: &Path) -> io::Result<()> {
        if state.failing.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }

    fn record(&self, entry: String) {
        if let Some(log) = &self.log {
            log.push(entry);
        }
    }
}

impl FileSystem for MockFileSystem {
    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        let state = lock(&self.state);
        Self::check_lookup(&state, path)?;
        match state.resolve(path, 0) {
            Some((_, Node::File(_))) => Ok(EntryKind::File),
            Some((_, Node::Dir)) => Ok(EntryKind::Directory),
            _ => Err(not_found(path)),
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<Option<PathBuf>> {
        let state = lock(&self.state);
        Self::check_lookup(&state, path)?;
        Ok(match state.node(path) {
            Some(Node::Link(target)) => Some(target.clone()),
            _ => None,
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let state = lock(&self.state);
        Self::check_lookup(&state, path)?;
        let dir = match state.resolve(path, 0) {
            Some((resolved, Node::Dir)) => resolved,
            _ => return Err(not_found(path)),
        };

        Ok(state
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir.as_path()))
            .filter_map(|(p, _)| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let mut state = lock(&self.state);
        state.reads.push(path.to_path_buf());
        Self::check_lookup(&state, path)?;
        match state.resolve(path, 0) {
            Some((_, Node::File(content))) => Ok(content),
            _ => Err(not_found(path)),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.record(format!("write {}", path.display()));
        let mut state = lock(&self.state);
        state.writes.push((path.to_path_buf(), contents.to_string()));
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !matches!(state.node(parent), Some(Node::Dir)) {
                return Err(not_found(parent));
            }
        }
        state.insert(path.to_path_buf(), Node::File(contents.to_string()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        lock(&self.state).add_dir(path);
        Ok(())
    }

    fn symlink(&self, src: &Path, dst: &Path) -> io::Result<()> {
        self.record(format!("symlink {} -> {}", dst.display(), src.display()));
        let mut state = lock(&self.state);
        state.symlinks.push((src.to_path_buf(), dst.to_path_buf()));
        // Drop anything that lived under a replaced directory.
        state.nodes.retain(|(p, _)| p == dst || !p.starts_with(dst));
        state.insert(dst.to_path_buf(), Node::Link(src.to_path_buf()));
        Ok(())
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        self.record(format!("unlink {}", path.display()));
        let mut state = lock(&self.state);
        if !matches!(state.node(path), Some(Node::Link(_))) {
            return Err(not_found(path));
        }
        state.nodes.retain(|(p, _)| p != path);
        state.removed_links.push(path.to_path_buf());
        Ok(())
    }
}

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output with both stdout and stderr.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for CommandOutput {
    fn from(mock: MockProcessOutput) -> Self {
        CommandOutput {
            code: mock.status,
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if the pattern matches a command string.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s.as_str()),
            CommandPattern::Contains(s) => cmd.contains(s.as_str()),
        }
    }
}

/// What a matched command produces.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// The command ran and exited with this output.
    Output(MockProcessOutput),
    /// The runner itself failed (spawn error, lost pipe, ...).
    Error(String),
}

/// A command expectation with its response.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    pattern: CommandPattern,
    response: MockResponse,
    /// Remaining matches; `None` means unlimited.
    remaining: Option<usize>,
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, response: MockResponse) -> Self {
        CommandExpectation {
            pattern,
            response,
            remaining: None,
        }
    }

    /// Only match `n` times.
    pub fn times(mut self, n: usize) -> Self {
        self.remaining = Some(n);
        self
    }

    fn available(&self) -> bool {
        self.remaining != Some(0)
    }
}

#[derive(Debug, Default)]
struct ExecState {
    expectations: Vec<CommandExpectation>,
    default: Option<MockProcessOutput>,
    calls: Vec<String>,
}

/// Mock command runner.
///
/// Commands are matched against expectations in registration order. An
/// unmatched command falls back to the default output, or fails the run
/// if no default is set.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<ExecState>>,
    log: Option<CallLog>,
}

impl MockExecutor {
    /// Create a new executor with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record commands into a shared log.
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Expect an exact command.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            MockResponse::Output(output),
        ))
    }

    /// Expect any command starting with `prefix`.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            MockResponse::Output(output),
        ))
    }

    /// Expect any command containing `substring`.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            MockResponse::Output(output),
        ))
    }

    /// Make the runner fail outright for an exact command.
    pub fn expect_error(&self, cmd: &str, message: &str) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            MockResponse::Error(message.to_string()),
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        lock(&self.state).expectations.push(expectation);
        self
    }

    /// Output for commands that match no expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        lock(&self.state).default = Some(output);
        self
    }

    /// All commands run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.state).calls.clone()
    }

    /// Commands run so far that match `pattern`.
    pub fn calls_matching(&self, pattern: &CommandPattern) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| pattern.matches(c))
            .collect()
    }
}

impl CommandRunner for MockExecutor {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        if let Some(log) = &self.log {
            log.push(format!("run {}", command));
        }

        let mut guard = lock(&self.state);
        let ExecState {
            expectations,
            default,
            calls,
        } = &mut *guard;
        calls.push(command.to_string());

        let matched = expectations
            .iter_mut()
            .find(|e| e.available() && e.pattern.matches(command));

        let response = match matched {
            Some(expectation) => {
                if let Some(n) = expectation.remaining.as_mut() {
                    *n -= 1;
                }
                expectation.response.clone()
            }
            None => match default {
                Some(output) => MockResponse::Output(output.clone()),
                None => bail!("unexpected command: {}", command),
            },
        };

        match response {
            MockResponse::Output(output) => Ok(output.into()),
            MockResponse::Error(message) => Err(anyhow!(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_filesystem_basic() {
        let fs = MockFileSystem::new();
        fs.add_file("src/package.json", "{}");

        assert_eq!(fs.kind(Path::new("src/package.json")).unwrap(), EntryKind::File);
        assert_eq!(fs.kind(Path::new("src")).unwrap(), EntryKind::Directory);
        assert!(fs.kind(Path::new("missing")).is_err());
        assert_eq!(fs.read_to_string(Path::new("src/package.json")).unwrap(), "{}");
        assert_eq!(fs.reads().len(), 1);
    }

    #[test]
    fn test_mock_filesystem_links_follow_targets() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws/ckeditor5-core");
        fs.add_link("/ws/app/node_modules/ckeditor5-core", "/ws/ckeditor5-core");

        let link = Path::new("/ws/app/node_modules/ckeditor5-core");
        assert_eq!(fs.kind(link).unwrap(), EntryKind::Directory);
        assert_eq!(
            fs.read_link(link).unwrap(),
            Some(PathBuf::from("/ws/ckeditor5-core"))
        );
    }

    #[test]
    fn test_mock_filesystem_relative_link() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws/plugin");
        fs.add_link("/ws/app/node_modules/plugin", "../../plugin");

        assert_eq!(
            fs.kind(Path::new("/ws/app/node_modules/plugin")).unwrap(),
            EntryKind::Directory
        );
    }

    #[test]
    fn test_mock_filesystem_write_requires_parent() {
        let fs = MockFileSystem::new();
        assert!(fs.write(Path::new("missing/file.json"), "{}").is_err());

        fs.add_dir("present");
        fs.write(Path::new("present/file.json"), "{}").unwrap();
        assert_eq!(fs.read_string("present/file.json").unwrap(), "{}");
    }

    #[test]
    fn test_mock_executor_basic() {
        let exec = MockExecutor::new();
        exec.expect("npm --version", MockProcessOutput::success("10.2.0"));

        let output = exec.run("npm --version").unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "10.2.0");
        assert_eq!(exec.calls(), vec!["npm --version"]);
    }

    #[test]
    fn test_mock_executor_unexpected() {
        let exec = MockExecutor::new();
        assert!(exec.run("unknown").is_err());
    }

    #[test]
    fn test_mock_executor_times() {
        let exec = MockExecutor::new();
        exec.expect_pattern(
            CommandExpectation::new(
                CommandPattern::StartsWith("npm".into()),
                MockResponse::Output(MockProcessOutput::failure(1, "first")),
            )
            .times(1),
        );
        exec.set_default(MockProcessOutput::success("later"));

        assert_eq!(exec.run("npm x").unwrap().code, 1);
        assert_eq!(exec.run("npm x").unwrap().stdout, "later");
    }

    #[test]
    fn test_shared_log_orders_calls() {
        let log = CallLog::new();
        let fs = MockFileSystem::new().with_log(log.clone());
        let exec = MockExecutor::new().with_log(log.clone());
        exec.set_default(MockProcessOutput::default());

        exec.run("rm -rf /dst").unwrap();
        fs.symlink(Path::new("/src"), Path::new("/dst")).unwrap();

        assert_eq!(log.entries(), vec!["run rm -rf /dst", "symlink /dst -> /src"]);
    }
}
