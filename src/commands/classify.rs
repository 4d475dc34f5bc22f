use anyhow::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analysis::analyze;
use crate::config::{load_config, load_config_file, validate_config_result, MetaclassifyConfig};
use crate::frontend::TranslationUnit;
use crate::io::{create_writer, OutputFormat, Report};
use crate::observability::set_current_file;

/// Arguments of `metaclassify classify`.
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    pub ast: PathBuf,
    pub header_root: Option<String>,
    pub inputs: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub no_warnings: bool,
    pub suppress_errors: bool,
    pub config: Option<PathBuf>,
}

fn resolve_config(config: &ClassifyConfig) -> Result<MetaclassifyConfig> {
    let mut resolved = match &config.config {
        Some(path) => load_config_file(path)?,
        None => load_config(),
    };
    apply_overrides(&mut resolved, config);
    validate_config_result(&resolved)?;
    Ok(resolved)
}

/// Command-line flags win over file values.
pub fn apply_overrides(resolved: &mut MetaclassifyConfig, config: &ClassifyConfig) {
    if let Some(root) = &config.header_root {
        resolved.extraction.header_root = Some(root.clone());
    }
    if !config.inputs.is_empty() {
        resolved.extraction.input_headers = config.inputs.clone();
    }
    if config.no_warnings {
        resolved.classification.warnings_allowed = false;
    }
    if config.suppress_errors {
        resolved.classification.suppress_errors = true;
    }
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    })
}

pub fn classify_project(config: ClassifyConfig) -> Result<()> {
    let resolved = resolve_config(&config)?;
    let _file = set_current_file(&config.ast);

    let tu = TranslationUnit::from_path(&config.ast)?;
    let results = analyze(&tu, &resolved.analysis_options())?;
    let report = Report::build(&results, &resolved.classification.codegen_annotation);
    log::info!("{}", report.summary.parsed_line());

    let mut writer = create_writer(config.format, open_output(config.output.as_deref())?);
    writer.write_report(&report)?;

    if let Some(path) = &config.output {
        log::info!("Report written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> ClassifyConfig {
        ClassifyConfig {
            ast: PathBuf::from("tu.json"),
            header_root: None,
            inputs: Vec::new(),
            format: OutputFormat::Json,
            output: None,
            no_warnings: false,
            suppress_errors: false,
            config: None,
        }
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut resolved = MetaclassifyConfig::default();
        resolved.extraction.input_headers = vec!["from_file.h".to_string()];

        let mut cli = flags();
        cli.inputs = vec!["from_cli.h".to_string()];
        cli.no_warnings = true;
        cli.header_root = Some("include".to_string());
        apply_overrides(&mut resolved, &cli);

        assert_eq!(resolved.extraction.input_headers, vec!["from_cli.h"]);
        assert_eq!(resolved.extraction.header_root.as_deref(), Some("include"));
        assert!(!resolved.classification.warnings_allowed);
        assert!(!resolved.classification.suppress_errors);
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let mut resolved = MetaclassifyConfig::default();
        resolved.extraction.input_headers = vec!["from_file.h".to_string()];
        apply_overrides(&mut resolved, &flags());
        assert_eq!(resolved.extraction.input_headers, vec!["from_file.h"]);
        assert!(resolved.classification.warnings_allowed);
    }
}
