//! Finds candidate descriptor files in the configured search paths.
//!
//! Applications are looked up directly inside each applications directory.
//! Modules live one level down: every subdirectory of a modules root is a
//! module, and the `.desktop` files inside it describe it. Nothing deeper is
//! visited.

use std::collections::HashSet;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

const DESCRIPTOR_EXTENSION: &str = "desktop";

/// Lists `.desktop` files in `dirs`, in priority order, each path once.
pub fn list_applications<P: AsRef<Path>>(dirs: &[P]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for dir in dirs {
        let dir = absolute(dir.as_ref());
        let Some(entries) = read_dir(&dir) else {
            info!("{} not found in applications path", dir.display());
            continue;
        };
        for path in entries {
            if is_descriptor(&path) && seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }
    debug!("list_applications: {:?}", files);
    files
}

/// Lists `.desktop` files found in the immediate subdirectories of `roots`.
pub fn list_modules<P: AsRef<Path>>(roots: &[P]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for root in roots {
        let root = absolute(root.as_ref());
        let Some(entries) = read_dir(&root) else {
            info!("{} doesn't exist in modules path", root.display());
            continue;
        };
        for module_dir in entries.into_iter().filter(|path| path.is_dir()) {
            debug!("list_modules: module directory {}", module_dir.display());
            for path in read_dir(&module_dir).unwrap_or_default() {
                if is_descriptor(&path) && seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }
    }
    debug!("list_modules: {:?}", files);
    files
}

/// Entries of `dir` sorted by path, or `None` if it cannot be read.
fn read_dir(dir: &Path) -> Option<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).ok()?;
    let mut paths = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    paths.sort();
    Some(paths)
}

fn is_descriptor(path: &Path) -> bool {
    path.is_file() && path.extension() == Some(OsStr::new(DESCRIPTOR_EXTENSION))
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
