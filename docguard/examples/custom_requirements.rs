//! Example: using RulesEngine with a hand-built bundle (no network).
//! Run with: cargo run --example custom_requirements [path/to/README.md]

use docguard::{
    load_document, HeaderRequirement, MatchMode, RequirementBundle, RulesEngine, Status,
    TableRequirement,
};
use std::path::Path;

fn main() -> Result<(), docguard::DocGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "README.md".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example custom_requirements [path/to/README.md]");
        std::process::exit(1);
    }

    let mut bundle = RequirementBundle::empty();
    bundle.headers.push(HeaderRequirement::new("## Requirements", 1));
    bundle
        .headers
        .push(HeaderRequirement::new("## Examples", 1).with_mode(MatchMode::Prefix));
    bundle.tables.push(TableRequirement::new(
        "Inputs",
        ["Name", "Description", "Type", "Default", "Required"],
    ));
    bundle.validate()?;

    let document = load_document(path)?;
    let findings = RulesEngine::from_bundle(&bundle).analyze(&document);

    println!("{} findings for {}", findings.len(), path.display());
    for finding in &findings {
        println!("  [{:?}] {}", finding.status, finding.detail);
    }

    let failed = findings.iter().filter(|f| f.status == Status::Fail).count();
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
