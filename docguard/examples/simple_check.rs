//! Example: check one README with the default requirements.
//! Run with: cargo run --example simple_check [path/to/README.md]

use docguard::prelude::*;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), DocGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "README.md".to_string());
    let path = Path::new(&path);

    let report =
        DocGuardCore::check_file(path, &RequirementBundle::default(), CheckOptions::default())
            .await?;

    println!("Checked {}", path.display());
    for finding in &report.findings {
        println!("  [{:?}] {}: {}", finding.status, finding.subject, finding.detail);
    }
    println!(
        "{} passed, {} failed, {} skipped",
        report.stats.passed, report.stats.failed, report.stats.skipped
    );

    if !report.is_conformant() {
        std::process::exit(1);
    }
    Ok(())
}
