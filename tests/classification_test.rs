mod common;

use std::rc::Rc;

use metaclassify::analysis::analyze;
use metaclassify::classification::{ClassificationOptions, MetaClass, Pipeline};
use metaclassify::io::Report;
use metaclassify::model::{AccessSpecifier, Field, Location, RefType, SemanticType, TypeTraits};
use metaclassify::validation::checks::is_shared_ptr;
use metaclassify::validation::{CheckStatus, Validator, ValidatorResult};
use metaclassify::AnalysisOptions;
use pretty_assertions::assert_eq;

fn roles(options: &AnalysisOptions) -> Vec<(String, MetaClass)> {
    let tu = common::contacts_unit();
    analyze(&tu, options)
        .unwrap()
        .entities
        .iter()
        .map(|e| (e.entity.complete_name(), e.meta_class))
        .collect()
}

#[test]
fn test_contacts_are_classified_in_discovery_order() {
    assert_eq!(
        roles(&common::options()),
        vec![
            ("app::Contact".to_string(), MetaClass::Model),
            ("app::ContactService".to_string(), MetaClass::Service),
            ("app::Color".to_string(), MetaClass::Enumeration),
        ]
    );
}

#[test]
fn test_clean_model_has_no_diagnostics() {
    let tu = common::contacts_unit();
    let results = analyze(&tu, &common::options()).unwrap();
    assert!(results.entities.iter().all(|e| e.diagnostics.is_empty()));
}

#[test]
fn test_model_with_a_method_falls_back_to_model() {
    let tu = common::model_with_method_unit();
    let results = analyze(&tu, &AnalysisOptions::default()).unwrap();
    let draft = &results.entities[0];

    assert_eq!(draft.meta_class, MetaClass::Model);
    assert!(draft
        .diagnostics
        .iter()
        .any(|d| d.message == "validate is a method in a model definition"));
}

#[test]
fn test_warnings_disallowed_leaves_entity_unknown() {
    let tu = common::model_with_method_unit();
    let options = AnalysisOptions {
        classification: ClassificationOptions {
            warnings_allowed: false,
            suppress_errors: false,
        },
        ..AnalysisOptions::default()
    };
    let results = analyze(&tu, &options).unwrap();
    assert_eq!(results.entities[0].meta_class, MetaClass::Unknown);
    assert!(!results.entities[0].diagnostics.is_empty());
}

#[test]
fn test_suppressed_errors_hide_fallback_diagnostics() {
    let tu = common::model_with_method_unit();
    let options = AnalysisOptions {
        classification: ClassificationOptions {
            warnings_allowed: true,
            suppress_errors: true,
        },
        ..AnalysisOptions::default()
    };
    let results = analyze(&tu, &options).unwrap();
    assert_eq!(results.entities[0].meta_class, MetaClass::Model);
    assert!(results.entities[0].diagnostics.is_empty());
}

#[test]
fn test_pipeline_accepts_enum_before_anything_else() {
    let color = SemanticType::Enum(metaclassify::model::DefinedEnum {
        name: "Color".to_string(),
        namespace: None,
        constants: Vec::new(),
        header: None,
        location: Location::new("color.h", 1, 6),
        original_typedef: None,
    });
    let verdict = Pipeline::default().classify(&color);
    assert_eq!(verdict.meta_class, MetaClass::Enumeration);
    assert!(verdict.diagnostics.is_empty());
}

fn pointer_field(payload: &str) -> Field {
    let pointee = Rc::new(SemanticType::declared(payload, Some("app".to_string()), vec![]));
    Field {
        name: "item".to_string(),
        access_specifier: AccessSpecifier::Public,
        type_info: Rc::new(SemanticType::declared(
            "shared_ptr",
            Some("std".to_string()),
            vec![pointee],
        )),
        traits: TypeTraits::new(false, None),
        init_value: None,
        location: Location::new("include/app/Holder.h", 4, 28),
    }
}

#[test]
fn test_shared_ptr_container_check() {
    let check = is_shared_ptr("Widget");
    assert_eq!(check.satisfies(&pointer_field("Widget")), ValidatorResult::ok(2));

    let wrong = check.satisfies(&pointer_field("Gadget"));
    assert_eq!(wrong.status, CheckStatus::Warning);
    assert_eq!(wrong.total_checks, 2);
    assert_eq!(
        wrong.errors[0].message,
        "item is not a std::shared_ptr to Widget"
    );

    let mut plain = pointer_field("Widget");
    plain.traits = TypeTraits::new(false, Some(RefType::Pointer));
    plain.type_info = Rc::new(SemanticType::declared("Widget", None, vec![]));
    let not_container = check.satisfies(&plain);
    assert_eq!(not_container.total_checks, 1);
    assert_eq!(
        not_container.errors[0].message,
        "item is not of type std::shared_ptr"
    );
}

#[test]
fn test_report_exposes_only_tagged_service_methods() {
    let tu = common::contacts_unit();
    let results = analyze(&tu, &common::options()).unwrap();
    let report = Report::build(&results, "generate_binds");

    assert_eq!(
        report.summary.parsed_line(),
        "Parsed models: 1 enums: 1 services: 1"
    );

    let service = report
        .entities
        .iter()
        .find(|e| e.role == MetaClass::Service)
        .unwrap();
    let exposed: Vec<&str> = service.apis.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(exposed, vec!["sync"]);

    let model = &report.entities[0];
    let types: Vec<&str> = model
        .fields
        .iter()
        .map(|f| f.type_info.type_name.as_str())
        .collect();
    assert_eq!(types, vec!["int", "std::string", "double"]);
    assert_eq!(model.header.as_deref(), Some("app/Contact.h"));
}
