//! Observability infrastructure for crash reports and debugging.
//!
//! - **Panic hook**: structured crash report naming phase and entity
//! - **Context tracking**: thread-local phase, AST dump and entity
//! - **Progress**: atomic counters over discovered declarations
//!
//! ```ignore
//! use metaclassify::observability::{set_current_entity, set_phase, AnalysisPhase};
//!
//! let _phase = set_phase(AnalysisPhase::Extraction);
//! for decl in declarations {
//!     let _entity = set_current_entity(name_of(decl));
//!     // a panic here reports both the phase and the declaration
//! }
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, reset_context, set_current_entity,
    set_current_file, set_phase, set_progress, AnalysisContext, AnalysisPhase, ContextGuard,
};
pub use panic_hook::install_panic_hook;
