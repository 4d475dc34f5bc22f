//! One end-to-end run: fatal-diagnostic check, discovery, extraction,
//! classification and the explicit-codegen filter.

use std::path::PathBuf;

use serde::Serialize;

use crate::classification::{
    filter_explicit, ClassificationOptions, ClassifiedEntity, MetaClass, Pipeline,
    DEFAULT_EXPLICIT_ANNOTATION,
};
use crate::errors::Result;
use crate::extractor::{CacheStats, ExtractionSession};
use crate::frontend::matchers::{get_classes, get_enums};
use crate::frontend::{check_fatal_diagnostics, Cursor, CursorId, TranslationUnit};
use crate::observability::{
    increment_processed, set_current_entity, set_phase, set_progress, AnalysisPhase,
};
use crate::resolver::HeaderPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Root that definition headers are reported relative to.
    pub header_root: Option<String>,
    /// Files whose definitions are analysed; empty means every file.
    pub input_headers: Vec<String>,
    pub classification: ClassificationOptions,
    pub explicit_annotation: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            header_root: None,
            input_headers: Vec::new(),
            classification: ClassificationOptions::default(),
            explicit_annotation: DEFAULT_EXPLICIT_ANNOTATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResults {
    pub entities: Vec<ClassifiedEntity>,
    /// Declarations found before the explicit-codegen filter.
    pub discovered: usize,
    #[serde(skip)]
    pub cache: CacheStats,
}

impl AnalysisResults {
    pub fn with_role(&self, meta_class: MetaClass) -> impl Iterator<Item = &ClassifiedEntity> {
        self.entities
            .iter()
            .filter(move |e| e.meta_class == meta_class)
    }

    pub fn count(&self, meta_class: MetaClass) -> usize {
        self.with_role(meta_class).count()
    }
}

/// Absolute form of a header path; relative paths are taken from the
/// current directory.
fn absolute_header(path: &str) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| PathBuf::from(path))
}

/// Class and struct definitions first, then enums, each in pre-order.
///
/// Input headers and cursor files are compared as absolute paths.
pub fn discover(tu: &TranslationUnit, input_headers: &[String]) -> Vec<CursorId> {
    let inputs: Vec<PathBuf> = input_headers.iter().map(|h| absolute_header(h)).collect();
    let is_local = |cursor: &Cursor| {
        inputs.is_empty() || inputs.contains(&absolute_header(&cursor.location.file))
    };
    let mut declarations = get_classes(tu, tu.root, is_local);
    declarations.extend(get_enums(tu, tu.root, is_local));
    declarations
}

pub fn analyze(tu: &TranslationUnit, options: &AnalysisOptions) -> Result<AnalysisResults> {
    let _span = tracing::info_span!("analyze").entered();

    {
        let _phase = set_phase(AnalysisPhase::Parsing);
        check_fatal_diagnostics(tu)?;
    }

    let declarations = {
        let _phase = set_phase(AnalysisPhase::Discovery);
        discover(tu, &options.input_headers)
    };
    let discovered = declarations.len();
    log::debug!("Discovered {} declarations", discovered);
    set_progress(0, discovered);

    let mut session = ExtractionSession::new(tu, HeaderPolicy::new(options.header_root.clone()));
    let pipeline = Pipeline::new(options.classification);
    let mut classified = Vec::with_capacity(discovered);

    for decl in declarations {
        let _entity = set_current_entity(tu.cursor(decl).spelling.clone());
        let entity = {
            let _phase = set_phase(AnalysisPhase::Extraction);
            session.extract(decl)?
        };
        let classification = {
            let _phase = set_phase(AnalysisPhase::Classification);
            pipeline.classify(&entity)
        };
        classified.push(ClassifiedEntity::new(entity, classification));
        increment_processed();
    }

    let cache = session.cache_stats();
    log::debug!(
        "Entity cache: {} entries, {} hits, {} misses",
        cache.entries,
        cache.hits,
        cache.misses
    );

    Ok(AnalysisResults {
        entities: filter_explicit(classified, &options.explicit_annotation),
        discovered,
        cache,
    })
}
