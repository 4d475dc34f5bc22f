//! Role classification of extracted entities.
//!
//! Each entity runs through the role classifiers in a fixed order and
//! stops at the first one that reports OK:
//!
//! 1. enumeration
//! 2. model
//! 3. viewmodel
//! 4. service
//! 5. callback (recognised, then ignored as UNUSED)
//!
//! When none passes, [`choose_fallback`] compares the model and viewmodel
//! fail rates and may still accept the closer role if it only produced
//! warnings.

pub mod diagnostics;
pub mod filter;
pub mod rules;

pub use diagnostics::{group_by_location, location_prefix, log_composition, DiagnosticGroup};
pub use filter::{filter_explicit, DEFAULT_EXPLICIT_ANNOTATION};
pub use rules::Classifiers;

use serde::Serialize;
use std::fmt;
use std::rc::Rc;

use crate::model::SemanticType;
use crate::validation::{CheckStatus, Diagnostic, Validator, ValidatorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetaClass {
    Model,
    Viewmodel,
    Enumeration,
    Service,
    Unknown,
    Unused,
}

impl MetaClass {
    /// Label used in the "Composing" log line.
    pub fn log_label(self) -> &'static str {
        match self {
            Self::Unknown => "UNCLASSIFIED",
            Self::Unused => "CALLBACK, ignoring",
            other => other.as_str(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "MODEL",
            Self::Viewmodel => "VIEWMODEL",
            Self::Enumeration => "ENUMERATION",
            Self::Service => "SERVICE",
            Self::Unknown => "UNKNOWN",
            Self::Unused => "UNUSED",
        }
    }

    /// Roles that produce generated code.
    pub fn is_generated(self) -> bool {
        matches!(
            self,
            Self::Model | Self::Viewmodel | Self::Enumeration | Self::Service
        )
    }
}

impl fmt::Display for MetaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationOptions {
    /// Accept the fallback role when its classifier only produced warnings.
    pub warnings_allowed: bool,
    /// Hide the fallback step's diagnostics.
    pub suppress_errors: bool,
}

impl Default for ClassificationOptions {
    fn default() -> Self {
        Self {
            warnings_allowed: true,
            suppress_errors: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub meta_class: MetaClass,
    pub diagnostics: Vec<Diagnostic>,
}

impl Classification {
    fn clean(meta_class: MetaClass) -> Self {
        Self {
            meta_class,
            diagnostics: Vec::new(),
        }
    }
}

/// An entity together with the role it was assigned.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedEntity {
    pub entity: Rc<SemanticType>,
    pub meta_class: MetaClass,
    pub diagnostics: Vec<Diagnostic>,
}

impl ClassifiedEntity {
    pub fn new(entity: Rc<SemanticType>, classification: Classification) -> Self {
        Self {
            entity,
            meta_class: classification.meta_class,
            diagnostics: classification.diagnostics,
        }
    }

    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.entity.annotation() == Some(annotation)
    }
}

/// Pick between the model and viewmodel verdicts of an entity no
/// classifier accepted.
///
/// The viewmodel wins only with a strictly lower fail rate; ties go to the
/// model. The preferred role is granted when its status is exactly WARNING
/// and warnings are allowed, otherwise the entity is UNKNOWN. The preferred
/// branch's diagnostics are reported either way unless suppressed.
pub fn choose_fallback(
    model: &ValidatorResult,
    viewmodel: &ValidatorResult,
    options: &ClassificationOptions,
) -> Classification {
    let model_rate = model.fail_rate();
    let viewmodel_rate = viewmodel.fail_rate();
    log::debug!(
        "Fail rates for model: {} viewmodel: {}",
        model_rate,
        viewmodel_rate
    );

    let (candidate, preferred) = if model_rate > viewmodel_rate {
        (MetaClass::Viewmodel, viewmodel)
    } else {
        (MetaClass::Model, model)
    };

    let meta_class = if options.warnings_allowed && preferred.status == CheckStatus::Warning {
        candidate
    } else {
        MetaClass::Unknown
    };
    let diagnostics = if options.suppress_errors {
        Vec::new()
    } else {
        preferred.errors.clone()
    };

    Classification {
        meta_class,
        diagnostics,
    }
}

pub struct Pipeline {
    classifiers: Classifiers,
    options: ClassificationOptions,
}

impl Pipeline {
    pub fn new(options: ClassificationOptions) -> Self {
        Self {
            classifiers: Classifiers::new(),
            options,
        }
    }

    pub fn options(&self) -> &ClassificationOptions {
        &self.options
    }

    pub fn classify(&self, entity: &SemanticType) -> Classification {
        let _span = tracing::debug_span!("classify", entity = %entity).entered();

        if self.classifiers.enumeration.satisfies(entity).is_ok() {
            return self.accept(entity, MetaClass::Enumeration);
        }
        let model = self.classifiers.model.satisfies(entity);
        if model.is_ok() {
            return self.accept(entity, MetaClass::Model);
        }
        let viewmodel = self.classifiers.viewmodel.satisfies(entity);
        if viewmodel.is_ok() {
            return self.accept(entity, MetaClass::Viewmodel);
        }
        if self.classifiers.service.satisfies(entity).is_ok() {
            return self.accept(entity, MetaClass::Service);
        }
        if self.classifiers.callback.satisfies(entity).is_ok() {
            return self.accept(entity, MetaClass::Unused);
        }

        let classification = choose_fallback(&model, &viewmodel, &self.options);
        log_composition(
            &entity.to_string(),
            classification.meta_class.log_label(),
            &classification.diagnostics,
        );
        classification
    }

    fn accept(&self, entity: &SemanticType, meta_class: MetaClass) -> Classification {
        log_composition(&entity.to_string(), meta_class.log_label(), &[]);
        Classification::clean(meta_class)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ClassificationOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;

    fn verdict(status: CheckStatus, errors: usize, checks: usize) -> ValidatorResult {
        let errors = (0..errors)
            .map(|i| Diagnostic::new(format!("e{}", i), Some(Location::new("x.h", 1, 1))))
            .collect();
        ValidatorResult::new(status, errors, checks)
    }

    #[test]
    fn test_fallback_prefers_lower_fail_rate() {
        let model = verdict(CheckStatus::Warning, 2, 12);
        let viewmodel = verdict(CheckStatus::Critical, 9, 10);
        let chosen = choose_fallback(&model, &viewmodel, &ClassificationOptions::default());
        assert_eq!(chosen.meta_class, MetaClass::Model);
        assert_eq!(chosen.diagnostics.len(), 2);
    }

    #[test]
    fn test_fallback_tie_goes_to_model() {
        let model = verdict(CheckStatus::Warning, 1, 2);
        let viewmodel = verdict(CheckStatus::Warning, 2, 4);
        let chosen = choose_fallback(&model, &viewmodel, &ClassificationOptions::default());
        assert_eq!(chosen.meta_class, MetaClass::Model);
    }

    #[test]
    fn test_fallback_picks_viewmodel_when_strictly_better() {
        let model = verdict(CheckStatus::Critical, 3, 4);
        let viewmodel = verdict(CheckStatus::Warning, 1, 4);
        let chosen = choose_fallback(&model, &viewmodel, &ClassificationOptions::default());
        assert_eq!(chosen.meta_class, MetaClass::Viewmodel);
    }

    #[test]
    fn test_fallback_critical_is_unknown_with_diagnostics() {
        let model = verdict(CheckStatus::Critical, 1, 4);
        let viewmodel = verdict(CheckStatus::Critical, 4, 4);
        let chosen = choose_fallback(&model, &viewmodel, &ClassificationOptions::default());
        assert_eq!(chosen.meta_class, MetaClass::Unknown);
        assert_eq!(chosen.diagnostics.len(), 1);
    }

    #[test]
    fn test_fallback_respects_options() {
        let model = verdict(CheckStatus::Warning, 1, 4);
        let viewmodel = verdict(CheckStatus::Critical, 4, 4);
        let strict = ClassificationOptions {
            warnings_allowed: false,
            suppress_errors: true,
        };
        let chosen = choose_fallback(&model, &viewmodel, &strict);
        assert_eq!(chosen.meta_class, MetaClass::Unknown);
        assert!(chosen.diagnostics.is_empty());
    }

    #[test]
    fn test_zero_checks_count_as_zero_fail_rate() {
        let model = verdict(CheckStatus::Warning, 0, 0);
        let viewmodel = verdict(CheckStatus::Warning, 0, 0);
        let chosen = choose_fallback(&model, &viewmodel, &ClassificationOptions::default());
        assert_eq!(chosen.meta_class, MetaClass::Model);
    }

    #[test]
    fn test_log_labels() {
        assert_eq!(MetaClass::Unknown.log_label(), "UNCLASSIFIED");
        assert_eq!(MetaClass::Unused.log_label(), "CALLBACK, ignoring");
        assert_eq!(MetaClass::Service.log_label(), "SERVICE");
        assert!(!MetaClass::Unused.is_generated());
    }

    #[test]
    fn test_enum_entity_is_enumeration() {
        let entity = SemanticType::Enum(crate::model::DefinedEnum {
            name: "Color".to_string(),
            namespace: None,
            constants: vec![],
            header: None,
            location: Location::new("c.h", 1, 1),
            original_typedef: None,
        });
        let classification = Pipeline::default().classify(&entity);
        assert_eq!(classification.meta_class, MetaClass::Enumeration);
        assert!(classification.diagnostics.is_empty());
    }
}
