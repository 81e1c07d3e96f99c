use std::io::Write;

use support_config::{get_kafka_topic, Properties, PropertiesError};
use tempfile::NamedTempFile;

fn write_properties(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_disk() {
    let file = write_properties("confluent.support.metrics.topic = __disk_topic\n");
    let config = Properties::load(file.path()).unwrap();

    assert_eq!(get_kafka_topic(&config), "__disk_topic");
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.properties");

    match Properties::load(&path) {
        Err(PropertiesError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_dangling_override_flag() {
    let file = write_properties("broker.id=1\n");
    let path = file.path().to_string_lossy().into_owned();

    let err = Properties::from_args(&[path.as_str(), "--override"]).unwrap_err();
    assert!(matches!(err, PropertiesError::InvalidOverride(_)));
}
