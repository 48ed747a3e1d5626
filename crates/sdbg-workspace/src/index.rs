//! Workspace file index.
//!
//! The debug server addresses scripts by server-absolute paths rooted at a
//! cartridge, while the user works with files on the local disk. The index
//! walks the configured workspace roots once and answers both directions:
//! resolving a (partial) server path to a local file, and mapping a local
//! file back to the server-absolute form.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Marker directory separating the deployment root from script paths.
const CARTRIDGE_DIR: &str = "/cartridges/";

/// File extensions the debug server can halt in.
const SCRIPT_EXTENSIONS: &[&str] = &["js", "ds"];

/// A flat index of all script files under the workspace roots.
#[derive(Debug, Default)]
pub struct WorkspaceIndex {
    files: Vec<PathBuf>,
}

impl WorkspaceIndex {
    /// Walk `roots` and collect every script file, skipping any directory
    /// whose name appears in `exclude`.
    pub fn build(roots: &[PathBuf], exclude: &[String]) -> Self {
        let mut files = Vec::new();
        for root in roots {
            let walker = WalkDir::new(root)
                .into_iter()
                .filter_entry(|entry| !is_excluded_dir(entry, exclude));
            for entry in walker.filter_map(Result::ok) {
                if entry.file_type().is_file() && is_script_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        }
        files.sort();
        debug!("indexed {} script file(s)", files.len());
        WorkspaceIndex { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolve a server path (or any suffix of one) to the first indexed
    /// file containing it. The index is sorted, so resolution is stable.
    pub fn resolve(&self, partial: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|file| file.to_string_lossy().contains(partial))
            .map(PathBuf::as_path)
    }
}

/// Map a local file path to the server-absolute path the debug server
/// expects. Paths under a `cartridges` directory keep only the part below
/// it; anything else is made absolute relative to `root`.
pub fn to_server_path(local: &Path, root: &Path) -> String {
    let local = local.to_string_lossy();
    if let Some((_, below)) = local.split_once(CARTRIDGE_DIR) {
        return format!("/{below}");
    }
    let relative = local
        .strip_prefix(&*root.to_string_lossy())
        .unwrap_or(&local);
    if relative.starts_with('/') {
        relative.to_string()
    } else {
        format!("/{relative}")
    }
}

fn is_excluded_dir(entry: &DirEntry, exclude: &[String]) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| exclude.iter().any(|ex| ex == name))
}

fn is_script_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("cartridges/app_storefront/controllers")).unwrap();
        fs::create_dir_all(base.join("cartridges/app_storefront/scripts")).unwrap();
        fs::create_dir_all(base.join("node_modules/lodash")).unwrap();
        fs::write(
            base.join("cartridges/app_storefront/controllers/Product.js"),
            "var x = 1;\n",
        )
        .unwrap();
        fs::write(
            base.join("cartridges/app_storefront/scripts/cart.ds"),
            "var y = 2;\n",
        )
        .unwrap();
        fs::write(base.join("cartridges/app_storefront/README.md"), "docs\n").unwrap();
        fs::write(base.join("node_modules/lodash/index.js"), "module\n").unwrap();
        dir
    }

    #[test]
    fn build_collects_only_script_files() {
        let dir = fixture();
        let index = WorkspaceIndex::build(&[dir.path().to_path_buf()], &[]);
        // README.md is skipped but node_modules is not excluded here.
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn excluded_directories_are_not_walked() {
        let dir = fixture();
        let index = WorkspaceIndex::build(
            &[dir.path().to_path_buf()],
            &["node_modules".to_string()],
        );
        assert_eq!(index.len(), 2);
        assert!(index.resolve("lodash").is_none());
    }

    #[test]
    fn resolve_finds_file_by_server_path_suffix() {
        let dir = fixture();
        let index = WorkspaceIndex::build(
            &[dir.path().to_path_buf()],
            &["node_modules".to_string()],
        );
        let found = index
            .resolve("/app_storefront/controllers/Product.js")
            .unwrap();
        assert!(found.ends_with("cartridges/app_storefront/controllers/Product.js"));
    }

    #[test]
    fn resolve_unknown_path_is_none() {
        let dir = fixture();
        let index = WorkspaceIndex::build(&[dir.path().to_path_buf()], &[]);
        assert!(index.resolve("/app_storefront/missing.js").is_none());
    }

    #[test]
    fn server_path_splits_at_cartridge_directory() {
        let local = Path::new("/home/dev/project/cartridges/app_storefront/controllers/Product.js");
        let server = to_server_path(local, Path::new("/home/dev/project"));
        assert_eq!(server, "/app_storefront/controllers/Product.js");
    }

    #[test]
    fn server_path_without_cartridge_directory_is_root_relative() {
        let local = Path::new("/home/dev/project/modules/util.js");
        let server = to_server_path(local, Path::new("/home/dev/project"));
        assert_eq!(server, "/modules/util.js");
    }
}
