use std::fs::write;
use tempfile::NamedTempFile;

use aws_utils::load_config::load_records;
use aws_utils_core::records::RecordSpec;

/// A records file with mixed record types loads in file order.
#[test]
fn test_load_records_success() {
    let records_yaml = r#"
records:
  - name: example.com
    type: MX
    value: "10 mail.example.com"
  - name: www.example.com
    type: CNAME
    value: example.com
  - name: example.com
    type: TXT
    value: "v=spf1 -all"
"#;
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), records_yaml).unwrap();

    let records = load_records(file.path()).expect("Records should load");

    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0],
        RecordSpec::new("example.com", "MX", "10 mail.example.com")
    );
    assert_eq!(records[1].record_type, "CNAME");
    assert_eq!(records[2].value, "v=spf1 -all");
}

/// An empty records list is allowed.
#[test]
fn test_load_records_allows_empty_list() {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), "records:\n").unwrap();

    let records = load_records(file.path()).expect("Loader should allow empty records");
    assert!(records.is_empty(), "records should be empty");
}

/// A record without its type is rejected as a parse error.
#[test]
fn test_load_records_errors_on_missing_fields() {
    let file = NamedTempFile::new().expect("temp file");
    write(
        file.path(),
        "records:\n  - name: example.com\n    value: 1.2.3.4\n",
    )
    .unwrap();

    let err = load_records(file.path()).unwrap_err();
    assert!(
        err.to_string().contains("YAML"),
        "Parse error expected, got: {err}"
    );
}

/// If the file is not valid YAML, load_records errors and reports as such.
#[test]
fn test_load_records_errors_for_invalid_file() {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), b"not-yaml: [:::").unwrap();

    let err = load_records(file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
fn test_load_records_errors_for_missing_file() {
    let err = load_records("/definitely/not/records.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read records file"));
}
