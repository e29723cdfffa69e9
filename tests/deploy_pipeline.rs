// tests/deploy_pipeline.rs

use std::fs;
use std::path::Path;

use podcreep_dev::deploy::{self, MobileDeployment, ServerDeployment};
use podcreep_dev_test_utils::builders::DeployConfigBuilder;
use podcreep_dev_test_utils::fake_runner::{FakeBehaviour, FakeRunner};
use podcreep_dev_test_utils::init_tracing;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A minimal server checkout with the compiled binary already in place, as
/// the fake `go build` produces no output of its own.
fn seed_server_tree(root: &Path) {
    write(&root.join("server/server"), "BINARY");
    write(&root.join("server/main.go"), "package main");
    write(&root.join("server/templates/home.html"), "{{ . }}");
    fs::create_dir_all(root.join("web/dist")).unwrap();
}

fn seed_android_tree(root: &Path) {
    write(
        &root.join("android/gradle.properties"),
        "app.versionCode=41\napp.versionName=1.2.7\n",
    );
    write(
        &root.join("android/mobile/build/outputs/bundle/release/mobile-release.aab"),
        "AAB",
    );
}

#[tokio::test]
async fn server_pipeline_runs_build_tools_in_order_and_produces_the_archive() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    seed_server_tree(root.path());

    let cfg = DeployConfigBuilder::new(root.path())
        .server_dest("deploy@podcreep.com:/srv/server.zip")
        .build();
    let runner = FakeRunner::new();

    ServerDeployment::new(&cfg, &runner).run().await.unwrap();

    assert_eq!(runner.programs(), vec!["ng", "go", "scp"]);

    let specs = runner.invocations();
    assert_eq!(specs[0].args, vec!["build", "--configuration", "production"]);
    assert_eq!(specs[0].cwd.as_deref(), Some(cfg.web_path.as_path()));

    assert_eq!(specs[1].args, vec!["build"]);
    assert_eq!(specs[1].cwd.as_deref(), Some(cfg.server_path.as_path()));
    assert!(
        specs[1]
            .env
            .contains(&("GOOS".to_string(), "linux".to_string()))
    );

    assert_eq!(
        specs[2].args,
        vec![
            cfg.archive_path().to_string_lossy().into_owned(),
            "deploy@podcreep.com:/srv/server.zip".to_string(),
        ]
    );

    // Staging and archive artifacts were written.
    assert!(cfg.staging_dir().join("podcreep").is_file());
    assert!(cfg.staging_dir().join("templates/home.html").is_file());
    assert!(cfg.archive_path().is_file());
}

#[tokio::test]
async fn failing_build_tool_aborts_the_remaining_stages() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    seed_server_tree(root.path());

    let cfg = DeployConfigBuilder::new(root.path()).build();
    let runner = FakeRunner::new().with_behaviour("ng", FakeBehaviour::exit_code(2));

    let err = ServerDeployment::new(&cfg, &runner)
        .run()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ng"));

    // Nothing after the failing stage ran.
    assert_eq!(runner.programs(), vec!["ng"]);
    assert!(!cfg.archive_path().exists());
}

#[tokio::test]
async fn mobile_pipeline_bumps_signs_and_copies_the_versioned_bundle() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    seed_android_tree(root.path());

    let cfg = DeployConfigBuilder::new(root.path()).build();
    // bundletool's manifest dump answers with the built version string.
    let runner = FakeRunner::new().with_behaviour("java", FakeBehaviour::stdout("1.2.8\n"));

    MobileDeployment::new(&cfg, &runner).run().await.unwrap();

    assert_eq!(
        runner.programs(),
        vec!["./gradlew", "./gradlew", "jarsigner", "java"]
    );

    let specs = runner.invocations();
    assert_eq!(specs[0].args, vec!["clean"]);
    assert_eq!(specs[1].args, vec!["bundle"]);
    assert_eq!(specs[0].cwd.as_deref(), Some(cfg.android_path.as_path()));

    let jarsigner = &specs[2];
    assert!(
        jarsigner
            .args
            .contains(&cfg.keystore_path.to_string_lossy().into_owned())
    );
    assert!(jarsigner.args.contains(&"podcreep".to_string()));
    assert!(jarsigner.args.contains(&"testpass".to_string()));

    // The properties file was bumped.
    let properties = fs::read_to_string(cfg.properties_path()).unwrap();
    assert!(properties.contains("app.versionCode=42"));
    assert!(properties.contains("app.versionName=1.2.8"));

    // The bundle landed at its versioned filename.
    let bundle = cfg.android_out_dir().join("podcreep-1.2.8.aab");
    assert_eq!(fs::read_to_string(bundle).unwrap(), "AAB");
}

#[tokio::test]
async fn install_toggle_appends_the_apks_stages() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    seed_android_tree(root.path());

    let cfg = DeployConfigBuilder::new(root.path()).install(true).build();
    let runner = FakeRunner::new().with_behaviour("java", FakeBehaviour::stdout("1.2.8\n"));

    MobileDeployment::new(&cfg, &runner).run().await.unwrap();

    let java_calls: Vec<_> = runner
        .invocations()
        .into_iter()
        .filter(|s| s.program == "java")
        .collect();
    assert_eq!(java_calls.len(), 3);

    assert!(java_calls[1].args.contains(&"build-apks".to_string()));
    let apks = cfg.android_out_dir().join("podcreep.apks");
    assert!(
        java_calls[1]
            .args
            .contains(&format!("--output={}", apks.display()))
    );
    assert!(java_calls[2].args.contains(&"install-apks".to_string()));
}

#[tokio::test]
async fn pipeline_toggles_select_which_flows_run() {
    init_tracing();

    let root = tempfile::tempdir().unwrap();
    seed_server_tree(root.path());

    let cfg = DeployConfigBuilder::new(root.path()).skip_android().build();
    let runner = FakeRunner::new();

    deploy::run_pipelines(&cfg, &runner).await.unwrap();

    // Only the server pipeline's tools ran.
    assert_eq!(runner.programs(), vec!["ng", "go", "scp"]);
}
