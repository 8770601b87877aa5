//! Integration tests for DocGuard library

use docguard::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn test_conformant_module_passes() {
    let report = DocGuardCore::check_file(
        &fixture_path("conformant_module.md"),
        &RequirementBundle::default(),
        CheckOptions::offline(),
    )
    .await
    .expect("Fixture should load");

    let failures: Vec<_> = report.failures().map(|f| &f.detail).collect();
    assert!(report.is_conformant(), "Unexpected failures: {:?}", failures);
    // non-empty + 3 headers + 3 tables
    assert_eq!(report.stats.passed, 7);
}

#[tokio::test]
async fn test_registry_provider_links_are_never_fetched() {
    // Every link in the fixture points at provider pages, so even with link
    // checking on no request leaves the machine.
    let options = CheckOptions {
        report_skipped: true,
        ..CheckOptions::default()
    };
    let report = DocGuardCore::check_file(
        &fixture_path("conformant_module.md"),
        &RequirementBundle::default(),
        options,
    )
    .await
    .expect("Fixture should load");

    assert!(report.is_conformant());
    assert_eq!(report.stats.skipped, 2);
    assert!(report
        .findings
        .iter()
        .filter(|f| f.status == Status::Skipped)
        .all(|f| f.detail.contains("registry.terraform.io/providers/")));
}

#[tokio::test]
async fn test_missing_sections_reported_independently() {
    let report = DocGuardCore::check_file(
        &fixture_path("missing_sections.md"),
        &RequirementBundle::default(),
        CheckOptions::offline(),
    )
    .await
    .expect("Fixture should load");

    assert!(!report.is_conformant());

    let failed: Vec<_> = report.failures().map(|f| f.subject.as_str()).collect();
    assert_eq!(
        failed,
        vec!["## Features", "## Usage", "## Resources", "## Outputs"]
    );

    let resources = report
        .findings
        .iter()
        .find(|f| f.subject == "## Resources")
        .unwrap();
    assert_eq!(resources.detail, "no table found after header '## Resources'");

    let outputs = report
        .findings
        .iter()
        .find(|f| f.subject == "## Outputs")
        .unwrap();
    assert_eq!(outputs.detail, "header '## Outputs' not found");
}

#[tokio::test]
async fn test_wrong_columns() {
    let report = DocGuardCore::check_file(
        &fixture_path("wrong_columns.md"),
        &RequirementBundle::default(),
        CheckOptions::offline(),
    )
    .await
    .expect("Fixture should load");

    let details: Vec<_> = report.failures().map(|f| f.detail.as_str()).collect();
    assert_eq!(details.len(), 2, "{:?}", details);
    assert!(details[0].contains("column order mismatch at index 0"));
    assert!(details[1].contains("name mismatch at index 3"));
}

#[tokio::test]
async fn test_empty_document_fails_every_header() {
    let report = DocGuardCore::check_file(
        &fixture_path("empty.md"),
        &RequirementBundle::default(),
        CheckOptions::default(),
    )
    .await
    .expect("Empty file still loads");

    assert_eq!(report.stats.passed, 0);
    assert_eq!(report.stats.skipped, 0);
    // non-empty + 3 headers + 3 tables, no link findings
    assert_eq!(report.stats.failed, 7);
    assert!(report
        .findings
        .iter()
        .filter(|f| f.rule_id == "required_header")
        .all(|f| f.detail.starts_with("found 0")));
}

#[tokio::test]
async fn test_missing_document_is_fatal() {
    let result = DocGuardCore::check_file(
        &fixture_path("does_not_exist.md"),
        &RequirementBundle::default(),
        CheckOptions::offline(),
    )
    .await;

    assert!(matches!(result, Err(DocGuardError::Load { .. })));
}

#[tokio::test]
async fn test_check_project_reports_each_readme() {
    let dir = tempfile::tempdir().unwrap();
    let module = dir.path().join("modules").join("bucket");
    std::fs::create_dir_all(&module).unwrap();
    std::fs::copy(fixture_path("conformant_module.md"), module.join("README.md")).unwrap();
    std::fs::copy(fixture_path("wrong_columns.md"), dir.path().join("README.md")).unwrap();

    let reports = DocGuardCore::check_project(
        dir.path(),
        &RequirementBundle::default(),
        CheckOptions::offline(),
    )
    .await
    .unwrap();

    assert_eq!(reports.len(), 2);
    assert!(!reports[0].is_conformant());
    assert!(reports[1].is_conformant());
}

#[tokio::test]
async fn test_custom_bundle_from_toml() {
    let bundle = RequirementBundle::from_toml(
        r###"
        require_non_empty = false

        [[headers]]
        text = "## Usage"
        min_count = 2

        [[tables]]
        section = "Inputs"
        columns = ["Name", "Description", "Type", "Default", "Required"]
        "###,
    )
    .unwrap();

    let document = Document::load(&fixture_path("wrong_columns.md")).unwrap();
    let report = DocGuardCore::check_document(&document, &bundle, CheckOptions::offline())
        .await
        .unwrap();

    assert_eq!(report.findings.len(), 2);
    assert!(report.is_conformant());
}
