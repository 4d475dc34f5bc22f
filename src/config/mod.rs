//! `.metaclassify.toml` configuration.
//!
//! ```toml
//! [classification]
//! warnings_allowed = true
//! suppress_errors = false
//! explicit_annotation = "explicit_codegen"
//! codegen_annotation = "generate_binds"
//!
//! [extraction]
//! header_root = "include"
//! input_headers = ["include/app/Contact.h"]
//! ```

mod loader;
pub mod validation;

pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from, parse_config,
    CONFIG_FILE_NAME,
};
pub use validation::{validate_config, validate_config_result, ConfigIssue, ConfigValidation};

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOptions;
use crate::classification::{ClassificationOptions, DEFAULT_EXPLICIT_ANNOTATION};

pub const DEFAULT_CODEGEN_ANNOTATION: &str = "generate_binds";

/// Root configuration structure for metaclassify
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaclassifyConfig {
    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Accept a fallback role that only produced warnings
    pub warnings_allowed: bool,

    /// Hide diagnostics of the fallback step
    pub suppress_errors: bool,

    /// Annotation that switches a header to explicit code generation
    pub explicit_annotation: String,

    /// Annotation marking service methods exposed to generated bindings
    pub codegen_annotation: String,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            warnings_allowed: true,
            suppress_errors: false,
            explicit_annotation: DEFAULT_EXPLICIT_ANNOTATION.to_string(),
            codegen_annotation: DEFAULT_CODEGEN_ANNOTATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Directory definition headers are reported relative to
    pub header_root: Option<String>,

    /// Files whose definitions are analysed; empty means all
    pub input_headers: Vec<String>,
}

impl MetaclassifyConfig {
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            header_root: self.extraction.header_root.clone(),
            input_headers: self.extraction.input_headers.clone(),
            classification: ClassificationOptions {
                warnings_allowed: self.classification.warnings_allowed,
                suppress_errors: self.classification.suppress_errors,
            },
            explicit_annotation: self.classification.explicit_annotation.clone(),
        }
    }

    /// The commented default written by `metaclassify init`.
    pub fn default_toml() -> String {
        format!(
            r#"# metaclassify configuration

[classification]
# Accept the closest role when its classifier only produced warnings
warnings_allowed = true
suppress_errors = false
explicit_annotation = "{}"
codegen_annotation = "{}"

[extraction]
# header_root = "include"
input_headers = []
"#,
            DEFAULT_EXPLICIT_ANNOTATION, DEFAULT_CODEGEN_ANNOTATION
        )
    }
}
