//! Thread-local context tracking for crash reports.
//!
//! Records which phase of a run is active, which AST dump is being read and
//! which declaration is being extracted or classified. Guards restore the
//! previous context on drop, so nested scopes (entity within phase) unwind
//! cleanly. Progress over discovered declarations uses atomic counters.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static ENTITIES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static ENTITIES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> = const { RefCell::new(AnalysisContext::new()) };
}

/// Snapshot of what the run was doing.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    /// AST dump being processed.
    pub current_file: Option<PathBuf>,
    /// Declaration currently being extracted or classified.
    pub current_entity: Option<String>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
            current_entity: None,
        }
    }
}

/// Major stages of one classification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// Loading the AST dump and checking frontend diagnostics
    Parsing,
    /// Finding class and enum definitions in the input headers
    Discovery,
    /// Building the semantic entity graph
    Extraction,
    /// Running classifiers over extracted entities
    Classification,
    /// Rendering the report
    OutputGeneration,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parsing => write!(f, "parsing"),
            Self::Discovery => write!(f, "discovery"),
            Self::Extraction => write!(f, "extraction"),
            Self::Classification => write!(f, "classification"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current phase until the guard drops.
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_file = Some(path))
}

#[must_use]
pub fn set_current_entity(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.current_entity = Some(name))
}

pub fn set_progress(processed: usize, total: usize) {
    ENTITIES_PROCESSED.store(processed, Ordering::Relaxed);
    ENTITIES_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    ENTITIES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total) declarations.
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        ENTITIES_PROCESSED.load(Ordering::Relaxed),
        ENTITIES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AnalysisContext::new();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_guard_restores_previous() {
        reset_context();

        let _phase = set_phase(AnalysisPhase::Extraction);
        {
            let _inner = set_phase(AnalysisPhase::Classification);
            assert_eq!(
                get_current_context().phase,
                Some(AnalysisPhase::Classification)
            );
        }
        assert_eq!(get_current_context().phase, Some(AnalysisPhase::Extraction));
    }

    #[test]
    fn test_entity_nested_within_phase() {
        reset_context();

        let _phase = set_phase(AnalysisPhase::Extraction);
        let _file = set_current_file("build/ast.json");
        {
            let _entity = set_current_entity("app::Contact");
            let ctx = get_current_context();
            assert_eq!(ctx.phase, Some(AnalysisPhase::Extraction));
            assert_eq!(ctx.current_file, Some(PathBuf::from("build/ast.json")));
            assert_eq!(ctx.current_entity.as_deref(), Some("app::Contact"));
        }
        assert!(get_current_context().current_entity.is_none());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(AnalysisPhase::Discovery.to_string(), "discovery");
        assert_eq!(
            AnalysisPhase::OutputGeneration.to_string(),
            "output_generation"
        );
    }

    #[test]
    fn test_empty_context_by_default() {
        reset_context();
        let ctx = get_current_context();
        assert!(ctx.phase.is_none());
        assert!(ctx.current_file.is_none());
        assert!(ctx.current_entity.is_none());
    }
}
