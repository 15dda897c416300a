//! Shared test utilities for the malt-site test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = Site::open(tmp.path(), None).unwrap();
//! let report = site.build().unwrap();
//! let html = read_output(&report);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::site::BuildReport;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    crate::assets::copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Write a minimal event record to `dir/file_name`.
pub fn write_event(dir: &Path, file_name: &str, title: &str, order: Option<i64>) {
    let mut record = serde_json::json!({
        "day": "01",
        "month": "Jan",
        "title": title,
        "description": format!("{title} description"),
        "time": "8pm",
    });
    if let Some(order) = order {
        record["order"] = serde_json::json!(order);
    }
    std::fs::write(dir.join(file_name), record.to_string()).unwrap();
}

/// Overwrite a JSON file under the fixture's `_data/` directory.
pub fn write_data(root: &Path, file_name: &str, value: serde_json::Value) {
    std::fs::write(root.join("_data").join(file_name), value.to_string()).unwrap();
}

// =========================================================================
// Output inspection
// =========================================================================

/// The generated `index.html` as a string.
pub fn read_output(report: &BuildReport) -> String {
    std::fs::read_to_string(&report.document).unwrap()
}

/// Byte offset of `needle` in `haystack`. Panics with context on miss.
pub fn position_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in output"))
}
