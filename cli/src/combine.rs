#![deny(missing_docs)]

//! # Combine Command
//!
//! Merges the sources named by a rule-set file into one document, publishes
//! the artifact to a directory store, and writes the merged text to a file
//! or stdout.

use crate::fetch::SourceFetcher;
use crate::store::DirStore;
use oasmerge_core::{run_combine, AppError, AppResult, RuleSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the combine command.
#[derive(clap::Args, Debug, Clone)]
pub struct CombineArgs {
    /// Path to the rule-set file (JSON or YAML).
    #[clap(long)]
    pub rules: PathBuf,

    /// Output path for the merged document. Prints to stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Directory the published artifact is stored in.
    #[clap(long, default_value = "artifacts")]
    pub artifact_dir: PathBuf,

    /// Base URL of a viewer UI used to build the viewer link.
    #[clap(long, env = "OASMERGE_VIEWER_BASE")]
    pub viewer_base: Option<String>,
}

/// Reads and deserializes a rule-set file. JSON parses through the YAML
/// reader, so one loader covers both.
pub(crate) fn load_rules(path: &Path) -> AppResult<RuleSet> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!("failed to read rules file {:?}: {}", path, e))
    })?;
    serde_yaml::from_str(&text).map_err(|e| {
        AppError::Configuration(format!("failed to parse rules file {:?}: {}", path, e))
    })
}

/// Executes the combine command.
pub fn execute(args: &CombineArgs) -> AppResult<()> {
    let rules = load_rules(&args.rules)?;
    println!("Merging {} source(s)...", rules.sources.len());

    let store = DirStore::new(&args.artifact_dir);
    let response = run_combine(&SourceFetcher, &store, &rules, args.viewer_base.as_deref())?;

    for collision in &response.suppressed_schemas {
        eprintln!(
            "Warning: dropped colliding schema '{}' from {}",
            collision.name, collision.source
        );
    }
    for collision in &response.suppressed_paths {
        eprintln!(
            "Warning: dropped colliding path '{}' from {}",
            collision.name, collision.source
        );
    }
    if let Some(error) = &response.storage_error {
        eprintln!("Warning: {}", error);
    }

    if let Some(locator) = &response.locator {
        println!("Stored {} at {}", response.artifact_name, locator);
    }
    if let Some(link) = &response.viewer_link {
        println!("Viewer: {}", link);
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &response.text)?;
            println!("Wrote merged document to {:?}", path);
        }
        None => println!("{}", response.text),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const PETS: &str = r#"
openapi: 3.0.3
info: {title: Pets, version: "1.0"}
paths:
  /pets:
    get:
      operationId: listPets
      responses: {'200': {description: ok}}
"#;

    #[test]
    fn test_combine_merges_local_files_and_stores_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let spec = write_file(dir.path(), "pets.yaml", PETS);
        let rules = format!(
            r#"{{"sources": [{:?}], "outputInfo": {{"title": "Unified", "version": "1.0"}}}}"#,
            spec.to_str().unwrap()
        );
        let rules_path = write_file(dir.path(), "rules.json", &rules);
        let output = dir.path().join("merged.json");
        let artifacts = dir.path().join("artifacts");

        let args = CombineArgs {
            rules: rules_path,
            output: Some(output.clone()),
            artifact_dir: artifacts.clone(),
            viewer_base: None,
        };
        execute(&args).unwrap();

        let merged = fs::read_to_string(&output).unwrap();
        assert!(merged.contains("listPets"));
        assert_eq!(fs::read_dir(&artifacts).unwrap().count(), 1);
    }

    #[test]
    fn test_unreadable_rules_file_is_a_configuration_error() {
        let err = load_rules(Path::new("no/such/rules.yaml")).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_rules_load_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "rules.yaml",
            r#"
sources: [pets.yaml]
outputInfo: {title: Unified, version: "1.0"}
outputFormat: YAML
"#,
        );
        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.sources, vec!["pets.yaml".to_string()]);
    }
}
