//! Call spec fixtures.

use std::path::PathBuf;
use tempfile::TempDir;

/// `sum(x: int | float, y: int | float = 0)` with one accepted and one rejected call.
pub const SUM_SPEC: &str = r#"{
    "signature": {
        "name": "sum",
        "params": [
            { "name": "x", "annotation": "int | float" },
            { "name": "y", "annotation": "int | float", "default": 0 }
        ]
    },
    "declaration": { "mode": "annotated" },
    "calls": [
        { "args": [5, 2.5] },
        { "args": [5, "3.5"] }
    ]
}"#;

/// Write `contents` to `name` inside a fresh temp dir.
///
/// The returned `TempDir` must outlive any use of the path.
pub fn write_spec(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write spec");
    (dir, path)
}
