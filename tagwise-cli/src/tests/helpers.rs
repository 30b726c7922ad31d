//! Test helpers for writing classify inputs to a scratch directory.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) const DEFINITIONS: &str = r#"[
    { "name": "cafe", "types": "node", "tags": "amenity=cafe", "categories": "food",
      "precision": 5 },
    { "name": "food", "kind": "category", "label": "places to eat" }
]"#;

pub(super) const ELEMENTS: &str = r#"[
    { "id": 1, "type": "node", "tags": { "amenity": "cafe", "name": "Joe's" } },
    { "id": 2, "type": "way" },
    { "id": 3, "type": "relation", "tags": { "route": "bus" } }
]"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write test input");
}

/// Scratch directory holding a definitions file and an elements file.
#[derive(Debug)]
pub(super) struct Inputs {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Inputs {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn with_defaults() -> Self {
        let inputs = Self::new();
        write_utf8(&inputs.features(), DEFINITIONS.as_bytes());
        write_utf8(&inputs.elements(), ELEMENTS.as_bytes());
        inputs
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn features(&self) -> Utf8PathBuf {
        self.root.join("features.json")
    }

    pub(super) fn elements(&self) -> Utf8PathBuf {
        self.root.join("elements.json")
    }
}
