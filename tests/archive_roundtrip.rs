// tests/archive_roundtrip.rs

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use podcreep_dev::deploy::archive::zip_dir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Entry name → contents for every entry in the archive.
fn read_archive(path: &Path) -> BTreeMap<String, String> {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();

    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        entries.insert(entry.name().to_string(), contents);
    }
    entries
}

#[test]
fn entries_are_relative_to_the_staging_root() {
    let root = tempfile::tempdir().unwrap();
    let staging = root.path().join("dist/server");
    write(&staging.join("podcreep"), "BINARY");
    write(&staging.join("dist/index.html"), "<html>");
    write(&staging.join("templates/home.html"), "{{ . }}");

    let zip_path = root.path().join("dist/server.zip");
    zip_dir(&staging, &zip_path).unwrap();

    let entries = read_archive(&zip_path);
    let names: Vec<&str> = entries.keys().map(|s| s.as_str()).collect();
    assert_eq!(names, vec!["dist/index.html", "podcreep", "templates/home.html"]);

    // No absolute paths, no staging-root-name prefix.
    for name in entries.keys() {
        assert!(!name.starts_with('/'), "absolute path leaked: {name}");
        assert!(!name.starts_with("server/"), "root prefix leaked: {name}");
    }
}

#[test]
fn extraction_round_trips_the_staged_tree() {
    let root = tempfile::tempdir().unwrap();
    let staging = root.path().join("dist/server");
    write(&staging.join("podcreep"), "BINARY");
    write(&staging.join("dist/main.js"), "console.log(1)");
    write(&staging.join("nested/deep/file.txt"), "deep");

    let zip_path = root.path().join("dist/server.zip");
    zip_dir(&staging, &zip_path).unwrap();

    let entries = read_archive(&zip_path);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries["podcreep"], "BINARY");
    assert_eq!(entries["dist/main.js"], "console.log(1)");
    assert_eq!(entries["nested/deep/file.txt"], "deep");
}

#[cfg(unix)]
#[test]
fn executable_mode_is_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempfile::tempdir().unwrap();
    let staging = root.path().join("dist/server");
    write(&staging.join("podcreep"), "BINARY");
    fs::set_permissions(staging.join("podcreep"), fs::Permissions::from_mode(0o755)).unwrap();

    let zip_path = root.path().join("dist/server.zip");
    zip_dir(&staging, &zip_path).unwrap();

    let file = fs::File::open(&zip_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let entry = archive.by_index(0).unwrap();
    assert_eq!(entry.unix_mode().unwrap() & 0o777, 0o755);
}
