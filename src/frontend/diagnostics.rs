use serde::{Deserialize, Serialize};

use super::TranslationUnit;
use crate::errors::{Error, Result};
use crate::model::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticSeverity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

/// A compiler diagnostic attached to the translation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub spelling: String,
    #[serde(default)]
    pub location: Location,
}

/// Abort on the first fatal diagnostic.
///
/// Non-fatal diagnostics are logged and otherwise ignored: the headers may
/// not compile cleanly outside their build and that is not our concern.
pub fn check_fatal_diagnostics(tu: &TranslationUnit) -> Result<()> {
    for diag in &tu.diagnostics {
        match diag.severity {
            DiagnosticSeverity::Fatal => {
                log::error!(
                    "Parse Error (severity={:?}, location={}, type={})",
                    diag.severity,
                    diag.location,
                    diag.spelling
                );
                return Err(Error::FatalDiagnostic {
                    location: diag.location.clone(),
                    message: diag.spelling.clone(),
                });
            }
            DiagnosticSeverity::Error | DiagnosticSeverity::Warning => {
                log::debug!("{}: {}", diag.location, diag.spelling);
            }
            DiagnosticSeverity::Ignored | DiagnosticSeverity::Note => {}
        }
    }
    Ok(())
}
