// Export modules for library usage
pub mod analysis;
pub mod classification;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod frontend;
pub mod io;
pub mod model;
pub mod observability;
pub mod resolver;
pub mod testkit;
pub mod validation;

// Re-export commonly used types
pub use crate::analysis::{analyze, AnalysisOptions, AnalysisResults};

pub use crate::classification::{
    choose_fallback, Classification, ClassificationOptions, ClassifiedEntity, MetaClass, Pipeline,
};

pub use crate::errors::{Error, Result};

pub use crate::extractor::ExtractionSession;

pub use crate::frontend::TranslationUnit;

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::io::report::Report;

pub use crate::model::{Api, EnumConstant, Field, Location, Param, SemanticType};

pub use crate::validation::{combine_and, combine_or, CheckStatus, Diagnostic, ValidatorResult};
