//! Rule trees for each architectural role.
//!
//! Every classifier is an [`AllOf`] over the entity; the trees are built
//! once per [`Classifiers`] and reused for every entity of a run.

use crate::model::{Api, Field, Param, SemanticType};
use crate::validation::checks::{
    has_initial_value, is_abstract, is_const, is_create_instance, is_double,
    is_initialization_exempt, is_lvalue_ref, is_not_const, is_pointer, is_primitive, is_public,
    is_reference, is_spark_handle, is_virtual, returns_void, FACTORY_METHOD,
};
use crate::validation::combinators::boxed;
use crate::validation::{
    AllOf, AllSatisfy, CheckStatus, IsNotCharPtr, Not, OneOf, OneSatisfies, SingleCheck,
    Validator, ValidatorResult,
};

pub const VIEWMODEL_INTERFACE: &str = "IViewModel";
pub const SERVICE_INTERFACE: &str = "IService";
pub const NOTIFICATION_HELPER: &str = "NotificationHelper";
pub const FRAMEWORK_PAYLOAD: &str = "ICoreFramework";

fn methods_of(entity: &SemanticType) -> Box<dyn Iterator<Item = &Api> + '_> {
    Box::new(entity.methods().iter())
}

fn members_of(entity: &SemanticType) -> Box<dyn Iterator<Item = &Field> + '_> {
    Box::new(entity.members().iter())
}

fn params_of(api: &Api) -> Box<dyn Iterator<Item = &Param> + '_> {
    Box::new(api.params.iter())
}

/// Payloads of `NotificationHelper<Callback>` bases. A helper base without
/// template arguments contributes nothing.
fn notification_payloads(entity: &SemanticType) -> Box<dyn Iterator<Item = &SemanticType> + '_> {
    Box::new(
        entity
            .bases()
            .iter()
            .filter(|base| base.name() == NOTIFICATION_HELPER)
            .filter_map(|base| base.template_args().first())
            .map(|payload| &**payload),
    )
}

fn factory_method(entity: &SemanticType) -> Option<&Api> {
    entity.methods().iter().find(|m| m.name == FACTORY_METHOD)
}

fn inherits_from(interface: &'static str) -> SingleCheck<SemanticType> {
    SingleCheck::new(
        move |e: &SemanticType| e.bases().iter().any(|base| base.name() == interface),
        move |e: &SemanticType| format!("{} does not inherit from {}", e.name(), interface),
    )
}

fn all_members<V>(validator: V) -> AllSatisfy<SemanticType, Field>
where
    V: Validator<Field> + 'static,
{
    AllSatisfy::new(members_of, validator, |e: &SemanticType| {
        format!("{} does not satisfy all member validators", e.name())
    })
}

fn all_methods<V>(validator: V) -> AllSatisfy<SemanticType, Api>
where
    V: Validator<Api> + 'static,
{
    AllSatisfy::new(methods_of, validator, |e: &SemanticType| {
        format!("{} does not satisfy all method validators", e.name())
    })
}

/// No methods, at least one member. Both violations are warnings.
fn has_only_data_members() -> AllOf<SemanticType> {
    let no_methods: AllOf<Api> = AllOf::new(vec![boxed(SingleCheck::forbidden(
        |m: &Api| format!("{} is a method in a model definition", m.name),
        CheckStatus::Warning,
    ))]);

    AllOf::new(vec![
        boxed(AllSatisfy::new(methods_of, no_methods, |e: &SemanticType| {
            format!(
                "{} has {} method(s) in a model definition",
                e.name(),
                e.methods().len()
            )
        })),
        boxed(SingleCheck::ad_hoc(
            |e: &SemanticType| !e.members().is_empty(),
            |e: &SemanticType| format!("No members found in model definition of {}", e.name()),
            CheckStatus::Warning,
        )),
    ])
}

/// No members, at least one method. Both violations are warnings.
fn has_only_methods() -> AllOf<SemanticType> {
    let no_members: AllOf<Field> = AllOf::new(vec![boxed(SingleCheck::forbidden(
        |f: &Field| format!("{} is a member in a viewmodel definition", f.name),
        CheckStatus::Warning,
    ))]);

    AllOf::new(vec![
        boxed(AllSatisfy::new(members_of, no_members, |e: &SemanticType| {
            format!(
                "{} has {} member(s) in a viewmodel definition",
                e.name(),
                e.members().len()
            )
        })),
        boxed(SingleCheck::ad_hoc(
            |e: &SemanticType| !e.methods().is_empty(),
            |e: &SemanticType| format!("No methods found in viewmodel definition of {}", e.name()),
            CheckStatus::Warning,
        )),
    ])
}

fn pure_virtual_interface() -> AllOf<Api> {
    AllOf::new(vec![
        boxed(is_public::<Api>()),
        boxed(is_virtual()),
        boxed(is_abstract()),
    ])
}

/// Either the factory or a public pure virtual method.
fn interface_method() -> OneOf<Api> {
    OneOf::new(vec![
        boxed(is_create_instance()),
        boxed(pure_virtual_interface()),
    ])
}

fn const_lvalue_ref() -> AllOf<Param> {
    AllOf::new(vec![boxed(is_const::<Param>()), boxed(is_lvalue_ref::<Param>())])
}

fn framework_handle() -> AllOf<Param> {
    AllOf::new(vec![boxed(is_spark_handle(FRAMEWORK_PAYLOAD))])
}

fn create_instance_params() -> AllOf<Api> {
    let shape: AllOf<Api> = AllOf::new(vec![
        boxed(AllSatisfy::new(params_of, const_lvalue_ref(), |m: &Api| {
            format!("All parameters of {} need to be const reference", m.name)
        })),
        boxed(OneSatisfies::new(params_of, framework_handle(), |m: &Api| {
            format!(
                "{} needs to have a parameter of type spark::handle<{}>",
                m.name, FRAMEWORK_PAYLOAD
            )
        })),
    ]);

    AllOf::short_circuiting(vec![
        boxed(SingleCheck::ad_hoc(
            |m: &Api| !m.params.is_empty(),
            |m: &Api| {
                format!(
                    "{} needs to have at least one param ({})",
                    m.name, FRAMEWORK_PAYLOAD
                )
            },
            CheckStatus::Warning,
        )),
        boxed(shape),
    ])
}

fn has_create_instance() -> AllOf<SemanticType> {
    AllOf::short_circuiting(vec![
        boxed(SingleCheck::ad_hoc(
            |e: &SemanticType| {
                e.methods()
                    .iter()
                    .filter(|m| m.name == FACTORY_METHOD)
                    .count()
                    == 1
            },
            |_: &SemanticType| {
                format!(
                    "There needs to be exactly one {} factory method declared",
                    FACTORY_METHOD
                )
            },
            CheckStatus::Warning,
        )),
        boxed(AllOf::projected(
            vec![boxed(create_instance_params())],
            factory_method,
        )),
    ])
}

/// Passes when there is no notification helper base, or when every helper
/// payload is itself a valid callback interface.
fn callback_ok_if_exists() -> OneOf<SemanticType> {
    OneOf::new(vec![
        boxed(SingleCheck::new(
            |e: &SemanticType| notification_payloads(e).next().is_none(),
            |_: &SemanticType| "One or more callback classes found".to_string(),
        )),
        boxed(AllSatisfy::new(
            notification_payloads,
            callback_classifier(),
            |e: &SemanticType| format!("{} is not an OK callback", e.name()),
        )),
    ])
}

/// A field is initialized when it is not a plain primitive value, or when
/// it carries a literal initializer or an exempted name.
///
/// Any failure is escalated to CRITICAL and every diagnostic is written to
/// the error log as it is produced.
pub struct IsInitialized {
    alternatives: OneOf<Field>,
}

impl IsInitialized {
    pub fn new() -> Self {
        let non_primitive = Not::new(is_primitive::<Field>(), |f: &Field| {
            format!("{} is a primitive field", f.name)
        });
        let indirect_or_double: AllOf<Field> = AllOf::new(vec![
            boxed(is_primitive::<Field>()),
            boxed(OneOf::new(vec![
                boxed(is_reference::<Field>()),
                boxed(is_pointer::<Field>()),
                boxed(is_double::<Field>()),
            ])),
        ]);
        let initialized_value: AllOf<Field> = AllOf::new(vec![
            boxed(is_primitive::<Field>()),
            boxed(OneOf::new(vec![
                boxed(has_initial_value()),
                boxed(is_initialization_exempt()),
            ])),
        ]);

        Self {
            alternatives: OneOf::new(vec![
                boxed(non_primitive),
                boxed(indirect_or_double),
                boxed(initialized_value),
            ]),
        }
    }
}

impl Default for IsInitialized {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator<Field> for IsInitialized {
    fn satisfies(&self, field: &Field) -> ValidatorResult {
        let mut result = self.alternatives.satisfies(field);
        if !result.is_ok() {
            result.status = CheckStatus::Critical;
            for diagnostic in &result.errors {
                match &diagnostic.location {
                    Some(location) => log::error!(
                        "{} at {}:{}",
                        diagnostic.message,
                        location.file,
                        location.line
                    ),
                    None => log::error!("{}", diagnostic.message),
                }
            }
        }
        result
    }
}

pub fn enumeration_classifier() -> AllOf<SemanticType> {
    AllOf::new(vec![boxed(SingleCheck::new(
        |e: &SemanticType| e.is_enum(),
        |e: &SemanticType| format!("{} is not an Enum", e.name()),
    ))])
}

pub fn model_classifier() -> AllOf<SemanticType> {
    let member_rules: AllOf<Field> = AllOf::new(vec![
        boxed(is_public::<Field>()),
        boxed(is_not_const::<Field>()),
        boxed(IsNotCharPtr),
        boxed(IsInitialized::new()),
    ]);

    AllOf::new(vec![
        boxed(has_only_data_members()),
        boxed(all_members(member_rules)),
    ])
}

pub fn viewmodel_classifier() -> AllOf<SemanticType> {
    AllOf::new(vec![
        boxed(inherits_from(VIEWMODEL_INTERFACE)),
        boxed(has_only_methods()),
        boxed(has_create_instance()),
        boxed(all_methods(interface_method())),
        boxed(callback_ok_if_exists()),
    ])
}

pub fn service_classifier() -> AllOf<SemanticType> {
    AllOf::new(vec![
        boxed(inherits_from(SERVICE_INTERFACE)),
        boxed(has_only_methods()),
        boxed(all_methods(interface_method())),
    ])
}

/// Interfaces whose every method is a public pure virtual returning void.
pub fn callback_classifier() -> AllOf<SemanticType> {
    let callback_method: AllOf<Api> = AllOf::new(vec![
        boxed(is_public::<Api>()),
        boxed(is_virtual()),
        boxed(is_abstract()),
        boxed(returns_void()),
    ]);

    AllOf::new(vec![
        boxed(has_only_methods()),
        boxed(all_methods(callback_method)),
    ])
}

/// The five role classifiers, built once per pipeline.
pub struct Classifiers {
    pub enumeration: AllOf<SemanticType>,
    pub model: AllOf<SemanticType>,
    pub viewmodel: AllOf<SemanticType>,
    pub service: AllOf<SemanticType>,
    pub callback: AllOf<SemanticType>,
}

impl Classifiers {
    pub fn new() -> Self {
        Self {
            enumeration: enumeration_classifier(),
            model: model_classifier(),
            viewmodel: viewmodel_classifier(),
            service: service_classifier(),
            callback: callback_classifier(),
        }
    }
}

impl Default for Classifiers {
    fn default() -> Self {
        Self::new()
    }
}
