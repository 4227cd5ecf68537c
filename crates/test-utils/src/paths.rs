//! Locating optional test data and scratch directories.
//!
//! Real GeoPDF samples are large and not checked in; tests that need one
//! look it up here and skip when it is absent.

use std::path::PathBuf;

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|crates| crates.parent())
        .map(|root| root.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// `crates/{crate_name}/testdata/`
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root().join("crates").join(crate_name).join("testdata")
}

/// Search for a test file.
///
/// Checked in order:
/// 1. `$TEST_DATA_DIR/{name}` (if set)
/// 2. `crates/geopdf/testdata/{name}`
/// 3. `testdata/{name}` at the workspace root
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let root = workspace_root();
    let env_dir = std::env::var("TEST_DATA_DIR").ok().map(PathBuf::from);

    env_dir
        .into_iter()
        .map(|dir| dir.join(name))
        .chain([
            crate_testdata_dir("geopdf").join(name),
            root.join("testdata").join(name),
        ])
        .find(|path| path.exists())
}

/// Temporary directory removed when the returned guard drops.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Temporary directory with a recognizable prefix.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}
