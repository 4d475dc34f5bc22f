//! Atomic checks over members, parameters and methods.
//!
//! Each function builds a fresh [`SingleCheck`]; messages name the judged
//! item so grouped diagnostics read on their own.

use super::combinators::{IsContainer, SingleCheck};
use super::CheckStatus;
use crate::model::{AccessSpecifier, Accessible, Api, Field, RefType, Subject, Typed};

/// Primitive fields that may go without a literal initializer. Their
/// defaults come from `constexpr` values the frontend does not report as
/// literals.
pub const INITIALIZATION_EXEMPTIONS: &[&str] = &[
    "sortPriority",
    "spaceParticipantCountGroupMentionsThreshold",
    "contentIndex",
    "imgWidth",
    "imgHeight",
];

pub const FACTORY_METHOD: &str = "CreateInstance";

pub fn is_primitive<T: Typed + 'static>() -> SingleCheck<T> {
    SingleCheck::new(
        |e: &T| e.type_info().is_primitive(),
        |e: &T| format!("{} is not a primitive type", e.subject_name()),
    )
}

pub fn is_double<T: Typed + 'static>() -> SingleCheck<T> {
    SingleCheck::new(
        |e: &T| e.type_info().name() == "double",
        |e: &T| format!("{} is not a double", e.subject_name()),
    )
}

pub fn is_public<T: Accessible + Subject + 'static>() -> SingleCheck<T> {
    SingleCheck::new(
        |e: &T| e.access_specifier() == AccessSpecifier::Public,
        |e: &T| format!("{} is not public", e.subject_name()),
    )
}

pub fn is_virtual() -> SingleCheck<Api> {
    SingleCheck::new(
        |e: &Api| e.traits.is_virtual,
        |e: &Api| format!("{} is not virtual", e.name),
    )
}

pub fn is_pointer<T: Typed + 'static>() -> SingleCheck<T> {
    SingleCheck::new(
        |e: &T| e.traits().ref_type == Some(RefType::Pointer),
        |e: &T| format!("{} is not pointer", e.subject_name()),
    )
}

/// Any indirection counts: lvalue, rvalue or pointer.
pub fn is_reference<T: Typed + 'static>() -> SingleCheck<T> {
    SingleCheck::new(
        |e: &T| e.traits().ref_type.is_some(),
        |e: &T| format!("{} is not reference", e.subject_name()),
    )
}

pub fn is_abstract() -> SingleCheck<Api> {
    SingleCheck::ad_hoc(
        |e: &Api| e.traits.is_abstract,
        |e: &Api| format!("{} is not abstract", e.name),
        CheckStatus::Warning,
    )
}

pub fn is_static_method() -> SingleCheck<Api> {
    SingleCheck::ad_hoc(
        |e: &Api| e.traits.is_static,
        |e: &Api| format!("{} is not static", e.name),
        CheckStatus::Warning,
    )
}

pub fn is_const<T: Typed + 'static>() -> SingleCheck<T> {
    SingleCheck::ad_hoc(
        |e: &T| e.traits().is_const,
        |e: &T| format!("{} is not const", e.subject_name()),
        CheckStatus::Warning,
    )
}

pub fn is_not_const<T: Typed + 'static>() -> SingleCheck<T> {
    SingleCheck::ad_hoc(
        |e: &T| !e.traits().is_const,
        |e: &T| format!("{} is const", e.subject_name()),
        CheckStatus::Warning,
    )
}

pub fn is_lvalue_ref<T: Typed + 'static>() -> SingleCheck<T> {
    SingleCheck::ad_hoc(
        |e: &T| e.traits().ref_type == Some(RefType::Lvalue),
        |e: &T| format!("{} is not an lvalue reference", e.subject_name()),
        CheckStatus::Warning,
    )
}

pub fn returns_void() -> SingleCheck<Api> {
    SingleCheck::ad_hoc(
        |e: &Api| e.returns.type_info.name() == "void",
        |e: &Api| format!("{} does not have a void return type", e.name),
        CheckStatus::Warning,
    )
}

pub fn has_initial_value() -> SingleCheck<Field> {
    SingleCheck::new(
        |e: &Field| e.init_value.is_some(),
        |e: &Field| format!("{} is missing an initial value", e.name),
    )
}

pub fn is_initialization_exempt() -> SingleCheck<Field> {
    SingleCheck::new(
        |e: &Field| INITIALIZATION_EXEMPTIONS.contains(&e.name.as_str()),
        |e: &Field| format!("{} is not exempted from Initialized check", e.name),
    )
}

pub fn is_create_instance() -> SingleCheck<Api> {
    SingleCheck::new(
        |e: &Api| e.name == FACTORY_METHOD,
        |e: &Api| format!("{} is not a CreateInstance factory method", e.name),
    )
}

pub fn is_shared_ptr(pointed_type: &str) -> IsContainer {
    IsContainer::new("std::shared_ptr", pointed_type)
}

pub fn is_spark_handle(pointed_type: &str) -> IsContainer {
    IsContainer::new("spark::handle", pointed_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiReturns, ApiTraits, Location, Param, SemanticType, TypeTraits};
    use crate::validation::{Validator, ValidatorResult};
    use std::rc::Rc;

    fn field(name: &str, ty: SemanticType, traits: TypeTraits, init: Option<&str>) -> Field {
        Field {
            name: name.to_string(),
            access_specifier: AccessSpecifier::Public,
            type_info: Rc::new(ty),
            traits,
            init_value: init.map(str::to_string),
            location: Location::new("model.h", 4, 9),
        }
    }

    fn int() -> SemanticType {
        SemanticType::primitive(Some("int"))
    }

    fn method(name: &str, returns: &str, traits: ApiTraits) -> Api {
        Api {
            name: name.to_string(),
            access_specifier: AccessSpecifier::Public,
            returns: ApiReturns {
                type_info: Rc::new(SemanticType::primitive(Some(returns))),
                traits: TypeTraits::default(),
            },
            params: vec![],
            traits,
            location: Location::new("vm.h", 12, 5),
        }
    }

    #[test]
    fn test_primitive_check_reports_location() {
        let f = field("widget", SemanticType::declared("Widget", None, vec![]), TypeTraits::default(), None);
        let result = is_primitive::<Field>().satisfies(&f);
        assert_eq!(result.status, CheckStatus::Critical);
        assert_eq!(result.errors[0].message, "widget is not a primitive type");
        assert_eq!(result.errors[0].location, Some(Location::new("model.h", 4, 9)));
    }

    #[test]
    fn test_public_check_rejects_private_members() {
        let mut f = field("count", int(), TypeTraits::default(), Some("0"));
        assert!(is_public::<Field>().satisfies(&f).is_ok());
        f.access_specifier = AccessSpecifier::Private;
        assert_eq!(
            is_public::<Field>().satisfies(&f).errors[0].message,
            "count is not public"
        );
    }

    #[test]
    fn test_constness_checks_are_warnings() {
        let f = field("count", int(), TypeTraits::new(true, None), Some("0"));
        let result = is_not_const::<Field>().satisfies(&f);
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.errors[0].message, "count is const");
        assert!(is_const::<Field>().satisfies(&f).is_ok());
    }

    #[test]
    fn test_reference_covers_every_indirection() {
        for ref_type in [RefType::Lvalue, RefType::Rvalue, RefType::Pointer] {
            let f = field("x", int(), TypeTraits::new(false, Some(ref_type)), None);
            assert!(is_reference::<Field>().satisfies(&f).is_ok());
        }
        let by_value = field("x", int(), TypeTraits::default(), None);
        assert!(!is_reference::<Field>().satisfies(&by_value).is_ok());
    }

    #[test]
    fn test_lvalue_ref_on_params() {
        let param = Param {
            name: "framework".to_string(),
            type_info: Rc::new(int()),
            traits: TypeTraits::new(true, Some(RefType::Rvalue)),
            location: Location::new("vm.h", 3, 30),
        };
        let result = is_lvalue_ref::<Param>().satisfies(&param);
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(
            result.errors[0].message,
            "framework is not an lvalue reference"
        );
    }

    #[test]
    fn test_method_trait_checks() {
        let pure = ApiTraits {
            is_virtual: true,
            is_abstract: true,
            ..ApiTraits::default()
        };
        let api = method("onChanged", "void", pure);
        assert_eq!(is_virtual().satisfies(&api), ValidatorResult::ok(1));
        assert_eq!(is_abstract().satisfies(&api), ValidatorResult::ok(1));
        assert_eq!(returns_void().satisfies(&api), ValidatorResult::ok(1));

        let static_result = is_static_method().satisfies(&api);
        assert_eq!(static_result.status, CheckStatus::Warning);
        assert_eq!(static_result.errors[0].message, "onChanged is not static");
    }

    #[test]
    fn test_non_void_return_is_a_warning() {
        let api = method("count", "int", ApiTraits::default());
        let result = returns_void().satisfies(&api);
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(
            result.errors[0].message,
            "count does not have a void return type"
        );
    }

    #[test]
    fn test_initializer_and_exemptions() {
        let missing = field("count", int(), TypeTraits::default(), None);
        assert_eq!(
            has_initial_value().satisfies(&missing).errors[0].message,
            "count is missing an initial value"
        );
        assert!(!is_initialization_exempt().satisfies(&missing).is_ok());

        let exempt = field("imgWidth", int(), TypeTraits::default(), None);
        assert!(is_initialization_exempt().satisfies(&exempt).is_ok());
    }

    #[test]
    fn test_factory_method_name() {
        let factory = method(FACTORY_METHOD, "void", ApiTraits::default());
        assert!(is_create_instance().satisfies(&factory).is_ok());
        let other = method("Build", "void", ApiTraits::default());
        assert_eq!(
            is_create_instance().satisfies(&other).errors[0].message,
            "Build is not a CreateInstance factory method"
        );
    }

    #[test]
    fn test_double_check() {
        let d = field("ratio", SemanticType::primitive(Some("double")), TypeTraits::default(), None);
        assert!(is_double::<Field>().satisfies(&d).is_ok());
        let p = field("ptr", int(), TypeTraits::new(false, Some(RefType::Pointer)), None);
        assert!(is_pointer::<Field>().satisfies(&p).is_ok());
        assert!(!is_double::<Field>().satisfies(&p).is_ok());
    }
}
