use std::path::{Path, PathBuf};

// Re-export shared test utilities from src/test_utils.rs
pub use exporter_lib::test_utils::{create_en_fr_mapping, create_test_config, row};

/// Write `contents` to `name` inside `dir` and return the file path
#[allow(dead_code)]
pub fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Read back the document written for `locale`
#[allow(dead_code)]
pub fn read_document(output_dir: &Path, locale: &str) -> serde_json::Value {
    let contents = read_document_text(output_dir, locale);
    serde_json::from_str(&contents).unwrap()
}

#[allow(dead_code)]
pub fn read_document_text(output_dir: &Path, locale: &str) -> String {
    std::fs::read_to_string(output_dir.join(locale).join("translation.json")).unwrap()
}

/// Path of a checked-in file under `tests/fixtures`
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
