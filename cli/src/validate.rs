#![deny(missing_docs)]

//! # Validate Command
//!
//! Prints the per-source validation report as JSON. Sources that fail to
//! fetch or parse abort the command; structural findings do not.

use crate::fetch::SourceFetcher;
use crate::methods::resolve_sources;
use oasmerge_core::{run_validation_report, AppError, AppResult};
use std::path::PathBuf;

/// Arguments for the validate command.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Rule-set file whose sources are validated.
    #[clap(long)]
    pub rules: Option<PathBuf>,

    /// Source location to validate; repeatable. Takes precedence over
    /// `--rules`.
    #[clap(long = "source")]
    pub sources: Vec<String>,
}

/// Executes the validate command.
pub fn execute(args: &ValidateArgs) -> AppResult<()> {
    let sources = resolve_sources(&args.rules, &args.sources)?;
    let reports = run_validation_report(&SourceFetcher, &sources)?;
    let json = serde_json::to_string_pretty(&reports)
        .map_err(|e| AppError::General(format!("failed to render report: {}", e)))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    #[test]
    fn test_validate_reports_on_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.yaml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(
            br#"
openapi: 3.0.3
info: {title: Pets, version: "1.0"}
paths:
  /pets:
    get:
      operationId: listPets
      responses: {'200': {description: ok}}
"#,
        )
        .unwrap();

        let sources = vec![path.to_str().unwrap().to_string()];
        let reports = run_validation_report(&SourceFetcher, &sources).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_valid);
    }
}
