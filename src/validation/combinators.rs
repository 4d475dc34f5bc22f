//! Structural combinators over [`Validator`].
//!
//! Every combinator owns its children as boxed trait objects, so rule trees
//! are built once and evaluated many times. Item getters and projections are
//! higher-ranked functions returning borrows of the judged item.

use super::{
    combine_and, combine_or, short_circuit, CheckStatus, Diagnostic, Validator, ValidatorResult,
};
use crate::model::{RefType, Subject, Typed};

pub type BoxedValidator<T> = Box<dyn Validator<T>>;
pub type MessageFn<T> = Box<dyn Fn(&T) -> String>;
pub type PredicateFn<T> = Box<dyn Fn(&T) -> bool>;
pub type ItemsFn<T, U> = Box<dyn for<'a> Fn(&'a T) -> Box<dyn Iterator<Item = &'a U> + 'a>>;
pub type ProjectFn<T, U> = Box<dyn for<'a> Fn(&'a T) -> Option<&'a U>>;

/// Box a validator for use in a rule list.
pub fn boxed<T, V>(validator: V) -> BoxedValidator<T>
where
    V: Validator<T> + 'static,
{
    Box::new(validator)
}

fn identity<T>(item: &T) -> Option<&T> {
    Some(item)
}

fn never<T>(_: &T) -> bool {
    false
}

fn location_of<T: Subject>(item: &T) -> Option<crate::model::Location> {
    item.location().cloned()
}

/// Every item produced by a getter must satisfy one validator.
///
/// On failure a summary diagnostic about the owning entity is put in front
/// of the per-item diagnostics.
pub struct AllSatisfy<T, U> {
    items: ItemsFn<T, U>,
    validator: BoxedValidator<U>,
    message: MessageFn<T>,
    stop_on_failure: bool,
}

impl<T: 'static, U: 'static> AllSatisfy<T, U> {
    pub fn new<I, V, M>(items: I, validator: V, message: M) -> Self
    where
        I: for<'a> Fn(&'a T) -> Box<dyn Iterator<Item = &'a U> + 'a> + 'static,
        V: Validator<U> + 'static,
        M: Fn(&T) -> String + 'static,
    {
        Self {
            items: Box::new(items),
            validator: Box::new(validator),
            message: Box::new(message),
            stop_on_failure: false,
        }
    }

    /// Stop evaluating items after the first one that is not OK.
    pub fn with_short_circuit(mut self) -> Self {
        self.stop_on_failure = true;
        self
    }
}

impl<T: Subject, U> Validator<T> for AllSatisfy<T, U> {
    fn satisfies(&self, entity: &T) -> ValidatorResult {
        let results = (self.items)(entity).map(|item| self.validator.satisfies(item));
        let combined = combine_and(short_circuit(results, self.stop_on_failure));
        if combined.is_ok() {
            combined
        } else {
            combined.prepend(Diagnostic::new((self.message)(entity), location_of(entity)))
        }
    }
}

/// At least one item produced by a getter must satisfy a validator.
pub struct OneSatisfies<T, U> {
    items: ItemsFn<T, U>,
    validator: BoxedValidator<U>,
    message: MessageFn<T>,
}

impl<T: 'static, U: 'static> OneSatisfies<T, U> {
    pub fn new<I, V, M>(items: I, validator: V, message: M) -> Self
    where
        I: for<'a> Fn(&'a T) -> Box<dyn Iterator<Item = &'a U> + 'a> + 'static,
        V: Validator<U> + 'static,
        M: Fn(&T) -> String + 'static,
    {
        Self {
            items: Box::new(items),
            validator: Box::new(validator),
            message: Box::new(message),
        }
    }
}

impl<T: Subject, U> Validator<T> for OneSatisfies<T, U> {
    fn satisfies(&self, entity: &T) -> ValidatorResult {
        let results: Vec<ValidatorResult> = (self.items)(entity)
            .map(|item| self.validator.satisfies(item))
            .collect();
        let combined = combine_or(results);
        if combined.is_ok() {
            combined
        } else {
            combined.prepend(Diagnostic::new((self.message)(entity), location_of(entity)))
        }
    }
}

/// A fixed list of validators, all applied to one (projected) target.
///
/// A projection that finds no target passes vacuously with no checks.
pub struct AllOf<T, U = T> {
    validators: Vec<BoxedValidator<U>>,
    project: ProjectFn<T, U>,
    stop_on_failure: bool,
}

impl<T: 'static> AllOf<T, T> {
    pub fn new(validators: Vec<BoxedValidator<T>>) -> Self {
        Self {
            validators,
            project: Box::new(identity::<T>),
            stop_on_failure: false,
        }
    }

    /// Evaluate in order and stop at the first validator that is not OK.
    pub fn short_circuiting(validators: Vec<BoxedValidator<T>>) -> Self {
        Self::new(validators).with_short_circuit()
    }
}

impl<T: 'static, U: 'static> AllOf<T, U> {
    pub fn projected<P>(validators: Vec<BoxedValidator<U>>, project: P) -> Self
    where
        P: for<'a> Fn(&'a T) -> Option<&'a U> + 'static,
    {
        Self {
            validators,
            project: Box::new(project),
            stop_on_failure: false,
        }
    }

    pub fn with_short_circuit(mut self) -> Self {
        self.stop_on_failure = true;
        self
    }
}

impl<T, U> Validator<T> for AllOf<T, U> {
    fn satisfies(&self, item: &T) -> ValidatorResult {
        let Some(target) = (self.project)(item) else {
            return ValidatorResult::ok(0);
        };
        let results = self.validators.iter().map(|v| v.satisfies(target));
        combine_and(short_circuit(results, self.stop_on_failure))
    }
}

/// A fixed list of alternatives; the first OK one wins.
pub struct OneOf<T> {
    validators: Vec<BoxedValidator<T>>,
}

impl<T> OneOf<T> {
    pub fn new(validators: Vec<BoxedValidator<T>>) -> Self {
        Self { validators }
    }
}

impl<T> Validator<T> for OneOf<T> {
    fn satisfies(&self, item: &T) -> ValidatorResult {
        let results: Vec<ValidatorResult> =
            self.validators.iter().map(|v| v.satisfies(item)).collect();
        combine_or(results)
    }
}

/// Inverts a validator. Inner diagnostics are discarded.
pub struct Not<T> {
    inner: BoxedValidator<T>,
    message: MessageFn<T>,
    severity: CheckStatus,
}

impl<T: 'static> Not<T> {
    pub fn new<V, M>(inner: V, message: M) -> Self
    where
        V: Validator<T> + 'static,
        M: Fn(&T) -> String + 'static,
    {
        Self {
            inner: Box::new(inner),
            message: Box::new(message),
            severity: CheckStatus::Critical,
        }
    }

    pub fn with_severity(mut self, severity: CheckStatus) -> Self {
        self.severity = severity;
        self
    }
}

impl<T: Subject> Validator<T> for Not<T> {
    fn satisfies(&self, item: &T) -> ValidatorResult {
        if self.inner.satisfies(item).is_ok() {
            ValidatorResult::failure(
                self.severity,
                Diagnostic::new((self.message)(item), location_of(item)),
                1,
            )
        } else {
            ValidatorResult::ok(1)
        }
    }
}

/// One predicate, one message, one check.
pub struct SingleCheck<T> {
    predicate: PredicateFn<T>,
    message: MessageFn<T>,
    severity: CheckStatus,
}

impl<T: 'static> SingleCheck<T> {
    /// A CRITICAL check.
    pub fn new<P, M>(predicate: P, message: M) -> Self
    where
        P: Fn(&T) -> bool + 'static,
        M: Fn(&T) -> String + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            message: Box::new(message),
            severity: CheckStatus::Critical,
        }
    }

    pub fn ad_hoc<P, M>(predicate: P, message: M, severity: CheckStatus) -> Self
    where
        P: Fn(&T) -> bool + 'static,
        M: Fn(&T) -> String + 'static,
    {
        Self::new(predicate, message).with_severity(severity)
    }

    /// Always fails: whatever reaches it must not exist.
    pub fn forbidden<M>(message: M, severity: CheckStatus) -> Self
    where
        M: Fn(&T) -> String + 'static,
    {
        Self::ad_hoc(never::<T>, message, severity)
    }

    pub fn with_severity(mut self, severity: CheckStatus) -> Self {
        self.severity = severity;
        self
    }

    pub fn severity(&self) -> CheckStatus {
        self.severity
    }
}

impl<T: Subject> Validator<T> for SingleCheck<T> {
    fn satisfies(&self, item: &T) -> ValidatorResult {
        if (self.predicate)(item) {
            ValidatorResult::ok(1)
        } else {
            ValidatorResult::failure(
                self.severity,
                Diagnostic::new((self.message)(item), location_of(item)),
                1,
            )
        }
    }
}

/// Typed item whose type is `container<pointed>`, e.g.
/// `spark::handle<ICoreFramework>`.
///
/// A wrong container costs one check; a wrong payload two.
pub struct IsContainer {
    container_type: String,
    pointed_type: String,
}

impl IsContainer {
    pub fn new(container_type: impl Into<String>, pointed_type: impl Into<String>) -> Self {
        Self {
            container_type: container_type.into(),
            pointed_type: pointed_type.into(),
        }
    }
}

impl<T: Typed> Validator<T> for IsContainer {
    fn satisfies(&self, item: &T) -> ValidatorResult {
        let ty = item.type_info();

        if ty.qualified_name() != self.container_type {
            return ValidatorResult::failure(
                CheckStatus::Warning,
                Diagnostic::new(
                    format!("{} is not of type {}", item.subject_name(), self.container_type),
                    location_of(item),
                ),
                1,
            );
        }

        let args = ty.template_args();
        if !(args.len() == 1 && args[0].name() == self.pointed_type) {
            return ValidatorResult::failure(
                CheckStatus::Warning,
                Diagnostic::new(
                    format!(
                        "{} is not a {} to {}",
                        item.subject_name(),
                        self.container_type,
                        self.pointed_type
                    ),
                    location_of(item),
                ),
                2,
            );
        }

        ValidatorResult::ok(2)
    }
}

/// Rejects `char*` members, which have no generated counterpart.
pub struct IsNotCharPtr;

impl<T: Typed> Validator<T> for IsNotCharPtr {
    fn satisfies(&self, item: &T) -> ValidatorResult {
        let is_char = item.type_info().name() == "char";
        let is_ptr = item.traits().ref_type == Some(RefType::Pointer);

        if is_char && is_ptr {
            ValidatorResult::failure(
                CheckStatus::Critical,
                Diagnostic::new(
                    format!(
                        "char* is not a supported type for member '{}'",
                        item.subject_name()
                    ),
                    location_of(item),
                ),
                1,
            )
        } else {
            ValidatorResult::ok(1)
        }
    }
}
