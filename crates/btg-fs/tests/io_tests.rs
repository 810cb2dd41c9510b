use btg_fs::{Error, Mapping, read_structured_file, write_structured_file};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn sample_document() -> Mapping {
    let mut doc = Mapping::new();
    doc.insert("model_name".into(), json!("gemini-pro"));
    doc.insert("api_keys".into(), json!(["k1", "k2"]));
    doc.insert("max_workers".into(), json!(4));
    doc.insert("gcp_project".into(), json!(null));
    doc
}

#[test]
fn test_read_json_object() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    fs::write(&file_path, r#"{"model_name": "test", "chunk_size": 42}"#).unwrap();

    let doc = read_structured_file(&file_path).unwrap();

    assert_eq!(doc.get("model_name"), Some(&json!("test")));
    assert_eq!(doc.get("chunk_size"), Some(&json!(42)));
}

#[test]
fn test_write_pretty_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");

    write_structured_file(&file_path, &sample_document(), true).unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert!(content.contains("\"model_name\": \"gemini-pro\""));
    assert!(content.ends_with("}\n"));
}

#[test]
fn test_roundtrip_preserves_every_field() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    let original = sample_document();

    write_structured_file(&file_path, &original, true).unwrap();
    let loaded = read_structured_file(&file_path).unwrap();

    assert_eq!(original, loaded);
}

#[test]
fn test_pretty_output_orders_fields_by_name() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");

    write_structured_file(&file_path, &sample_document(), true).unwrap();
    let content = fs::read_to_string(&file_path).unwrap();

    let positions: Vec<usize> = ["api_keys", "gcp_project", "max_workers", "model_name"]
        .iter()
        .map(|key| content.find(&format!("\"{key}\"")).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn test_rewrite_is_byte_stable() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");

    write_structured_file(&file_path, &sample_document(), true).unwrap();
    let first = fs::read(&file_path).unwrap();
    let reloaded = read_structured_file(&file_path).unwrap();
    write_structured_file(&file_path, &reloaded, true).unwrap();
    let second = fs::read(&file_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    fs::write(&file_path, r#"{"old": true, "padding": "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"}"#).unwrap();

    let mut doc = Mapping::new();
    doc.insert("new".into(), json!(1));
    write_structured_file(&file_path, &doc, true).unwrap();

    let loaded = read_structured_file(&file_path).unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn test_read_malformed_json_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    fs::write(&file_path, "{ not json").unwrap();

    let err = read_structured_file(&file_path).unwrap_err();

    assert!(matches!(err, Error::Parse { .. }), "got {err:?}");
    assert!(err.is_parse());
}
