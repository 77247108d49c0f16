#![deny(missing_docs)]

//! # Methods Command
//!
//! Prints the per-source operations report (path, method, operation id,
//! reconstructed URL) as JSON.

use crate::combine::load_rules;
use crate::fetch::SourceFetcher;
use oasmerge_core::{run_methods_report, AppError, AppResult};
use std::path::PathBuf;

/// Arguments for the methods command.
#[derive(clap::Args, Debug, Clone)]
pub struct MethodsArgs {
    /// Rule-set file whose sources are reported.
    #[clap(long)]
    pub rules: Option<PathBuf>,

    /// Source location to report on; repeatable. Takes precedence over
    /// `--rules`.
    #[clap(long = "source")]
    pub sources: Vec<String>,
}

/// Resolves the source list from explicit `--source` flags or a rules file.
pub(crate) fn resolve_sources(
    rules: &Option<PathBuf>,
    sources: &[String],
) -> AppResult<Vec<String>> {
    if !sources.is_empty() {
        return Ok(sources.to_vec());
    }
    match rules {
        Some(path) => Ok(load_rules(path)?.sources),
        None => Err(AppError::Configuration(
            "pass --rules or at least one --source".into(),
        )),
    }
}

/// Executes the methods command.
pub fn execute(args: &MethodsArgs) -> AppResult<()> {
    let sources = resolve_sources(&args.rules, &args.sources)?;
    let reports = run_methods_report(&SourceFetcher, &sources)?;
    let json = serde_json::to_string_pretty(&reports)
        .map_err(|e| AppError::General(format!("failed to render report: {}", e)))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_sources_win_over_rules() {
        let sources = vec!["a.yaml".to_string()];
        let resolved = resolve_sources(&Some(PathBuf::from("unused")), &sources).unwrap();
        assert_eq!(resolved, sources);
    }

    #[test]
    fn test_no_sources_is_a_configuration_error() {
        let err = resolve_sources(&None, &[]).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
