//! Test data path helpers, mirroring the upstream `test-utils` convention of
//! an overridable data directory plus a best-effort file finder.

use std::path::PathBuf;

/// Root directory for optional large test fixtures (sample HDF5 granules).
/// Overridable via `TCC_TEST_DATA_DIR`; defaults to `testdata/` under the
/// workspace root.
pub fn test_data_dir() -> PathBuf {
    std::env::var("TCC_TEST_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata"))
}

/// Finds a named test file under [`test_data_dir`], returning `None` if
/// absent so tests can skip gracefully in environments without large fixture
/// data.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let path = test_data_dir().join(name);
    path.is_file().then_some(path)
}
