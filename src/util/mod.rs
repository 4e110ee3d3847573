//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod json;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use fs::{FileSystem, OsFileSystem};
pub use process::{CommandRunner, ShellRunner};
