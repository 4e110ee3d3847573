//! Test fixtures for common test scenarios.
//!
//! This module provides pre-built workspaces, both on disk and in a
//! [`MockFileSystem`], for the linking tests.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tempfile::TempDir;

use super::MockFileSystem;

/// Render a `package.json` with the given name and dependencies.
pub fn package_json(name: &str, deps: &[(&str, &str)]) -> String {
    let dependencies: Map<String, Value> = deps
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();

    let doc = json!({
        "name": name,
        "version": "0.0.1",
        "dependencies": dependencies,
    });
    serde_json::to_string_pretty(&doc).unwrap()
}

/// A workspace on disk: a temporary root holding the project and any
/// number of sibling plugin checkouts.
#[derive(Debug)]
pub struct WorkspaceFixture {
    tmp: TempDir,
    project: PathBuf,
}

impl WorkspaceFixture {
    /// Create a workspace whose project `project_name` depends on `deps`.
    pub fn new(project_name: &str, deps: &[(&str, &str)]) -> Self {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join(project_name);
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("package.json"), package_json(project_name, deps)).unwrap();

        WorkspaceFixture { tmp, project }
    }

    /// Add a plugin checkout. `package_name` of `None` writes no descriptor.
    pub fn add_plugin(&self, dir_name: &str, package_name: Option<&str>) -> PathBuf {
        let dir = self.root().join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(name) = package_name {
            fs::write(dir.join("package.json"), package_json(name, &[])).unwrap();
        }
        dir
    }

    /// Add a plain file directly under the workspace root.
    pub fn add_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project.join("package.json")
    }

    /// Where a dependency is expected to end up.
    pub fn dependency_path(&self, name: &str) -> PathBuf {
        self.project.join("node_modules").join(name)
    }

    /// Parsed project manifest.
    pub fn manifest(&self) -> Value {
        serde_json::from_str(&fs::read_to_string(self.manifest_path()).unwrap()).unwrap()
    }
}

/// Populate `fs` with a project at `/workspace/app` depending on `deps`
/// and plugin checkouts `(dir_name, package_name)` under `/workspace`.
pub fn mock_workspace(
    fs: &MockFileSystem,
    deps: &[(&str, &str)],
    plugins: &[(&str, Option<&str>)],
) {
    fs.add_file("/workspace/app/package.json", package_json("app", deps));
    for (dir_name, package_name) in plugins {
        let dir = Path::new("/workspace").join(dir_name);
        fs.add_dir(&dir);
        if let Some(name) = package_name {
            fs.add_file(dir.join("package.json"), package_json(name, &[]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_fixture_layout() {
        let ws = WorkspaceFixture::new("app", &[("ckeditor5-core", "^1.0.0")]);
        let plugin = ws.add_plugin("ckeditor5-core", Some("ckeditor5-core"));

        assert!(ws.manifest_path().is_file());
        assert!(plugin.join("package.json").is_file());
        assert_eq!(ws.manifest()["dependencies"]["ckeditor5-core"], "^1.0.0");
    }

    #[test]
    fn test_package_json_keeps_dependency_order() {
        let rendered = package_json("x", &[("b", "1"), ("a", "2")]);
        assert!(rendered.find("\"b\"").unwrap() < rendered.find("\"a\"").unwrap());
    }
}
