// Shared fixtures for metaclassify integration tests
#![allow(dead_code)]

use metaclassify::frontend::{MethodFlags, TranslationUnit, TypeKind};
use metaclassify::testkit::TuBuilder;
use metaclassify::AnalysisOptions;

pub const HEADER_ROOT: &str = "include";
pub const CONTACT_H: &str = "include/app/Contact.h";
pub const COLOR_H: &str = "include/app/Color.h";
pub const SERVICE_H: &str = "include/app/ContactService.h";

pub fn inputs() -> Vec<String> {
    vec![
        CONTACT_H.to_string(),
        COLOR_H.to_string(),
        SERVICE_H.to_string(),
    ]
}

pub fn options() -> AnalysisOptions {
    AnalysisOptions {
        header_root: Some(HEADER_ROOT.to_string()),
        input_headers: inputs(),
        ..AnalysisOptions::default()
    }
}

/// A small application header tree:
///
/// ```cpp
/// namespace app {
///   struct Contact { int id = 0; std::string name; double score; };
///   enum Color { RED, GREEN, BLUE };
///   class ContactService : public IService {
///     [[generate_binds]] virtual void sync() = 0;
///     virtual void reset() = 0;
///   };
/// }
/// ```
///
/// `IService` and the standard library live outside the header root.
pub fn contacts_unit() -> TranslationUnit {
    let mut b = TuBuilder::new();
    let root = b.root();

    b.in_file("/usr/include/c++/string");
    let std_ns = b.namespace(root, "std");
    let char_ty = b.primitive(TypeKind::CharS, "char");
    let traits = b.class(std_ns, "char_traits");
    let alloc = b.class(std_ns, "allocator");
    let (tt, at) = (b.type_of(traits), b.type_of(alloc));
    let string = b.specialization(std_ns, "basic_string", &[char_ty, tt, at]);
    let string_ty = b.type_of(string);

    b.in_file("/usr/include/spark/IService.h");
    let iservice = b.class(root, "IService");
    let iservice_ty = b.type_of(iservice);

    let int = b.primitive(TypeKind::Int, "int");
    let double = b.primitive(TypeKind::Double, "double");
    let void = b.primitive(TypeKind::Void, "void");

    b.in_file(CONTACT_H);
    let app = b.namespace(root, "app");
    let contact = b.class(app, "Contact");
    let id = b.field(contact, "id", int);
    b.init_value(id, "0");
    b.field(contact, "name", string_ty);
    b.field(contact, "score", double);

    b.in_file(COLOR_H);
    b.enumeration(app, "Color", &[("RED", 0), ("GREEN", 1), ("BLUE", 2)]);

    b.in_file(SERVICE_H);
    let service = b.class(app, "ContactService");
    b.base(service, iservice_ty);
    let sync = b.pure_virtual_method(service, "sync", void);
    b.annotate(sync, "generate_binds");
    b.pure_virtual_method(service, "reset", void);

    b.build()
}

/// `struct Draft { int id = 0; void validate(); };` in `include/app/Draft.h`
pub fn model_with_method_unit() -> TranslationUnit {
    let mut b = TuBuilder::new();
    let root = b.root();
    let int = b.primitive(TypeKind::Int, "int");
    let void = b.primitive(TypeKind::Void, "void");

    b.in_file("include/app/Draft.h");
    let app = b.namespace(root, "app");
    let draft = b.class(app, "Draft");
    let id = b.field(draft, "id", int);
    b.init_value(id, "0");
    let validate = b.method(draft, "validate", void);
    b.set_method_flags(validate, MethodFlags::default());

    b.build()
}
