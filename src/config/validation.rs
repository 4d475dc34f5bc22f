//! Validation with error accumulation for configuration.
//!
//! Every check runs, and all problems are reported together through
//! stillwater's `Validation` instead of stopping at the first one.

use std::collections::HashSet;
use std::fmt;

use stillwater::{NonEmptyVec, Validation};

use super::MetaclassifyConfig;
use crate::errors::{Error, Result};

/// One problem with a named configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type ConfigValidation<T> = Validation<T, NonEmptyVec<ConfigIssue>>;

fn success() -> ConfigValidation<()> {
    Validation::Success(())
}

fn failure(issue: ConfigIssue) -> ConfigValidation<()> {
    Validation::Failure(NonEmptyVec::new(issue, Vec::new()))
}

fn validate_annotation(field: &str, value: &str) -> ConfigValidation<()> {
    if value.trim().is_empty() {
        failure(ConfigIssue::new(field, "annotation must not be empty"))
    } else {
        success()
    }
}

fn validate_header_root(root: Option<&str>) -> ConfigValidation<()> {
    match root {
        Some(root) if root.trim().is_empty() => failure(ConfigIssue::new(
            "extraction.header_root",
            "must not be empty; omit it to disable header resolution",
        )),
        _ => success(),
    }
}

fn validate_input_headers(headers: &[String]) -> ConfigValidation<()> {
    let mut seen = HashSet::new();
    let issues: Vec<ConfigIssue> = headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            let field = format!("extraction.input_headers[{}]", index);
            if header.trim().is_empty() {
                Some(ConfigIssue::new(field, "header path must not be empty"))
            } else if !seen.insert(header.as_str()) {
                Some(ConfigIssue::new(field, format!("duplicate header '{}'", header)))
            } else {
                None
            }
        })
        .collect();

    match NonEmptyVec::from_vec(issues) {
        Some(issues) => Validation::Failure(issues),
        None => success(),
    }
}

fn combine(validations: Vec<ConfigValidation<()>>) -> ConfigValidation<()> {
    let mut issues: Vec<ConfigIssue> = Vec::new();
    for validation in validations {
        if let Validation::Failure(errors) = validation {
            issues.extend(errors);
        }
    }
    match NonEmptyVec::from_vec(issues) {
        Some(issues) => Validation::Failure(issues),
        None => success(),
    }
}

/// Validate the whole config, accumulating every issue.
pub fn validate_config(config: &MetaclassifyConfig) -> ConfigValidation<()> {
    combine(vec![
        validate_annotation(
            "classification.explicit_annotation",
            &config.classification.explicit_annotation,
        ),
        validate_annotation(
            "classification.codegen_annotation",
            &config.classification.codegen_annotation,
        ),
        validate_header_root(config.extraction.header_root.as_deref()),
        validate_input_headers(&config.extraction.input_headers),
    ])
}

/// [`validate_config`] as a `Result`, all issues joined into one message.
pub fn validate_config_result(config: &MetaclassifyConfig) -> Result<()> {
    match validate_config(config) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(issues) => {
            let messages: Vec<String> = issues.into_iter().map(|i| i.to_string()).collect();
            Err(Error::configuration(messages.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MetaclassifyConfig::default()).is_success());
    }

    #[test]
    fn test_all_issues_are_reported() {
        let mut config = MetaclassifyConfig::default();
        config.classification.explicit_annotation = String::new();
        config.extraction.header_root = Some("  ".to_string());
        config.extraction.input_headers = vec!["a.h".to_string(), "a.h".to_string()];

        match validate_config(&config) {
            Validation::Failure(issues) => {
                let fields: Vec<String> = issues.into_iter().map(|i| i.field).collect();
                assert_eq!(
                    fields,
                    vec![
                        "classification.explicit_annotation",
                        "extraction.header_root",
                        "extraction.input_headers[1]",
                    ]
                );
            }
            Validation::Success(()) => panic!("expected validation failure"),
        }
    }

    #[test]
    fn test_result_joins_messages() {
        let mut config = MetaclassifyConfig::default();
        config.classification.codegen_annotation = " ".to_string();
        let err = validate_config_result(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: classification.codegen_annotation: annotation must not be empty"
        );
    }
}
