// tests/version_bump.rs

use std::fs;

use podcreep_dev::deploy::version::{BumpedVersion, bump_properties, bump_version_file};
use podcreep_dev::errors::DevToolsError;

const PROPERTIES: &str = "\
org.gradle.jvmargs=-Xmx2048m

# App version, managed by the deploy tooling.
app.versionCode=41
app.versionName=1.2.7
android.useAndroidX=true
";

#[test]
fn increments_build_counter_and_patch_component() {
    let (updated, bumped) = bump_properties(PROPERTIES).unwrap();

    assert_eq!(
        bumped,
        BumpedVersion {
            version_code: 42,
            version_name: "1.2.8".to_string(),
        }
    );
    assert_eq!(
        updated,
        "\
org.gradle.jvmargs=-Xmx2048m

# App version, managed by the deploy tooling.
app.versionCode=42
app.versionName=1.2.8
android.useAndroidX=true
"
    );
}

#[test]
fn non_matching_lines_are_byte_identical_and_ordered() {
    let (updated, _) = bump_properties(PROPERTIES).unwrap();

    let before: Vec<&str> = PROPERTIES.split('\n').collect();
    let after: Vec<&str> = updated.split('\n').collect();
    assert_eq!(before.len(), after.len());

    for (b, a) in before.iter().zip(after.iter()) {
        if b.starts_with("app.versionCode=") || b.starts_with("app.versionName=") {
            continue;
        }
        assert_eq!(b, a);
    }
}

#[test]
fn major_and_minor_components_are_untouched() {
    let (updated, bumped) =
        bump_properties("app.versionCode=7\napp.versionName=3.9.99\n").unwrap();
    assert_eq!(bumped.version_name, "3.9.100");
    assert!(updated.contains("app.versionName=3.9.100"));
}

#[test]
fn missing_version_code_is_a_config_error() {
    let err = bump_properties("app.versionName=1.2.7\n").unwrap_err();
    match err {
        DevToolsError::Properties(msg) => assert!(msg.contains("app.versionCode")),
        other => panic!("expected Properties error, got {other:?}"),
    }
}

#[test]
fn missing_version_name_is_a_config_error() {
    let err = bump_properties("app.versionCode=41\n").unwrap_err();
    match err {
        DevToolsError::Properties(msg) => assert!(msg.contains("app.versionName")),
        other => panic!("expected Properties error, got {other:?}"),
    }
}

#[test]
fn short_version_triplet_is_a_config_error() {
    let err = bump_properties("app.versionCode=41\napp.versionName=1.2\n").unwrap_err();
    match err {
        DevToolsError::Properties(msg) => assert!(msg.contains("1.2")),
        other => panic!("expected Properties error, got {other:?}"),
    }
}

#[test]
fn non_numeric_version_component_is_a_config_error() {
    let err = bump_properties("app.versionCode=41\napp.versionName=1.2.x\n").unwrap_err();
    match err {
        DevToolsError::Properties(msg) => assert!(msg.contains('x')),
        other => panic!("expected Properties error, got {other:?}"),
    }
}

#[test]
fn non_numeric_build_counter_is_a_config_error() {
    let err = bump_properties("app.versionCode=banana\napp.versionName=1.2.7\n").unwrap_err();
    match err {
        DevToolsError::Properties(msg) => assert!(msg.contains("banana")),
        other => panic!("expected Properties error, got {other:?}"),
    }
}

#[test]
fn rewrites_the_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradle.properties");
    fs::write(&path, PROPERTIES).unwrap();

    let bumped = bump_version_file(&path).unwrap();
    assert_eq!(bumped.version_code, 42);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("app.versionCode=42"));
    assert!(contents.contains("app.versionName=1.2.8"));
}

#[test]
fn malformed_file_is_left_unmodified() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradle.properties");
    fs::write(&path, "app.versionCode=41\n").unwrap();

    assert!(bump_version_file(&path).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "app.versionCode=41\n");
}
