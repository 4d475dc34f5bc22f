//! Type resolution: from a frontend type reference to the declaration that
//! should back it in the semantic model.
//!
//! Resolution strips pointer and reference layers, follows typedef and
//! `using` aliases, and unwraps single-argument templates
//! (`std::shared_ptr<T>`, `std::vector<T>`, `spark::handle<T>`) into a
//! payload declaration plus a container annotation.

pub mod headers;

pub use headers::HeaderPolicy;

use crate::frontend::matchers::{children_matching, get_namespace};
use crate::frontend::{Cursor, CursorId, CursorKind, TranslationUnit, TypeId, TypeKind};
use crate::model::{qualified_name, RefType, TypeTraits};

/// Bound on alias and indirection chains, so a malformed arena with a
/// self-referencing alias cannot hang resolution.
const MAX_CHAIN_DEPTH: usize = 64;

/// Template whose trailing arguments are defaulted traits and allocator.
const BASIC_STRING: &str = "std::basic_string";

/// Spelling of a supported fundamental kind.
pub fn primitive_name(kind: TypeKind) -> Option<&'static str> {
    match kind {
        TypeKind::Void => Some("void"),
        TypeKind::Bool => Some("bool"),
        TypeKind::Int => Some("int"),
        TypeKind::UInt => Some("unsigned int"),
        TypeKind::UShort => Some("unsigned short"),
        TypeKind::UChar => Some("unsigned char"),
        TypeKind::CharS => Some("char"),
        TypeKind::Double => Some("double"),
        TypeKind::Float => Some("float"),
        TypeKind::WChar => Some("wchar_t"),
        _ => None,
    }
}

pub fn reference_qualifier(kind: TypeKind) -> Option<RefType> {
    match kind {
        TypeKind::LValueReference => Some(RefType::Lvalue),
        TypeKind::RValueReference => Some(RefType::Rvalue),
        TypeKind::Pointer => Some(RefType::Pointer),
        _ => None,
    }
}

/// `std` name and remaining container for a character payload of a string
/// container, e.g. `char` in `std::basic_string` is just `std::string`.
pub fn string_rewrite(
    name: &str,
    container: &str,
) -> Option<(&'static str, Option<&'static str>)> {
    match (name, container) {
        ("char", "std::basic_string" | "std::string") => Some(("string", None)),
        ("basic_string", "std::vector") => Some(("string", Some("std::vector"))),
        ("wchar_t", "std::basic_string" | "std::wstring") => Some(("wstring", None)),
        _ => None,
    }
}

/// What a type reference resolves to, independent of the entity graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// `None` for a fundamental kind outside the supported table.
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub header: Option<String>,
    /// Fully qualified container, e.g. `std::vector`.
    pub container_type: Option<String>,
    pub is_enum: bool,
    pub traits: TypeTraits,
}

impl ResolvedType {
    fn primitive(kind: TypeKind, traits: TypeTraits, container_type: Option<String>) -> Self {
        let mut resolved = Self {
            name: primitive_name(kind).map(str::to_string),
            namespace: None,
            header: None,
            container_type,
            is_enum: false,
            traits,
        };
        resolved.rewrite_strings();
        resolved
    }

    pub fn full_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(|name| qualified_name(self.namespace.as_deref(), name))
    }

    /// Character payloads of string containers become `std::string`
    /// and `std::wstring`.
    fn rewrite_strings(&mut self) {
        let (Some(name), Some(container)) = (self.name.as_deref(), self.container_type.as_deref())
        else {
            return;
        };

        if let Some((name, container)) = string_rewrite(name, container) {
            self.name = Some(name.to_string());
            self.namespace = Some("std".to_string());
            self.container_type = container.map(str::to_string);
        }
    }
}

/// A resolved type plus the cursors the extractor continues from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: ResolvedType,
    /// Declaration of the final (payload) type; `None` for primitives.
    pub definition: Option<CursorId>,
    /// The container template instantiation, when one was unwrapped.
    pub container: Option<CursorId>,
}

pub struct TypeResolver<'tu> {
    tu: &'tu TranslationUnit,
    headers: HeaderPolicy,
}

impl<'tu> TypeResolver<'tu> {
    pub fn new(tu: &'tu TranslationUnit, headers: HeaderPolicy) -> Self {
        Self { tu, headers }
    }

    pub fn headers(&self) -> &HeaderPolicy {
        &self.headers
    }

    pub fn header_of(&self, decl: CursorId) -> Option<String> {
        self.headers.header_of(&self.tu.cursor(decl).location)
    }

    /// Walk pointer/reference layers down to the innermost type, keeping
    /// only the outermost layer's kind.
    pub fn strip_indirection(&self, ty: TypeId) -> (TypeId, Option<RefType>) {
        let ref_type = reference_qualifier(self.tu.ty(ty).kind);
        let mut base = ty;
        for _ in 0..MAX_CHAIN_DEPTH {
            match self.tu.pointee(base) {
                Some(pointee) => base = pointee,
                None => break,
            }
        }
        (base, ref_type)
    }

    pub fn resolve(&self, ty: TypeId) -> Resolution {
        let (base, outer_ref) = self.strip_indirection(ty);
        let is_const = self.tu.ty(base).is_const;

        if self.tu.is_primitive(base) {
            return Resolution::primitive(
                self.tu.ty(base).kind,
                TypeTraits::new(is_const, outer_ref),
                None,
                None,
            );
        }

        let mut container = self
            .tu
            .declaration(base)
            .and_then(|decl| self.template_class(decl));
        let (target, inner_ref) = self.follow_aliases(base);
        let traits = TypeTraits::new(is_const, outer_ref.or(inner_ref));

        let Some(target_decl) = self.tu.declaration(target) else {
            return Resolution::primitive(self.tu.ty(target).kind, traits, None, None);
        };

        if container.is_none() {
            container = self.template_class(target_decl);
        }

        let ending = match container {
            Some(template) => {
                let payload = self
                    .tu
                    .cursor(template)
                    .ty
                    .and_then(|t| self.tu.template_args(t).first().copied());
                match payload.map(|p| self.follow_aliases(p).0) {
                    Some(payload) if self.tu.is_primitive(payload) => {
                        return Resolution::primitive(
                            self.tu.ty(payload).kind,
                            traits,
                            Some(self.container_name(template)),
                            Some(template),
                        );
                    }
                    Some(payload) => self.tu.declaration(payload).unwrap_or(target_decl),
                    None => target_decl,
                }
            }
            None => target_decl,
        };

        let cursor = self.tu.cursor(ending);
        let is_enum = cursor.kind == CursorKind::EnumDecl
            || cursor
                .ty
                .is_some_and(|t| self.tu.ty(t).kind == TypeKind::Enum);

        let mut resolved = ResolvedType {
            name: Some(cursor.spelling.clone()),
            namespace: get_namespace(self.tu, ending),
            header: self.header_of(ending),
            container_type: container.map(|c| self.container_name(c)),
            is_enum,
            traits,
        };
        resolved.rewrite_strings();

        Resolution {
            resolved,
            definition: Some(ending),
            container,
        }
    }

    /// Follow typedef and `using` declarations to the aliased type.
    ///
    /// A missing alias target is tolerated: the alias's own type is kept.
    /// Returns the first reference kind met while unwrapping.
    pub fn follow_aliases(&self, ty: TypeId) -> (TypeId, Option<RefType>) {
        let mut current = ty;
        let mut ref_type = None;

        for _ in 0..MAX_CHAIN_DEPTH {
            let Some(decl) = self.tu.declaration(current) else {
                break;
            };
            let aliased = self.typedef_target(decl);
            let cursor = self.tu.cursor(aliased);

            if !cursor.kind.is_alias() {
                if let Some(own) = cursor.ty {
                    current = own;
                }
                break;
            }

            let Some(underlying) = cursor.underlying_type else {
                current = cursor.ty.unwrap_or(current);
                break;
            };
            let (stripped, layer) = self.strip_indirection(underlying);
            ref_type = ref_type.or(layer);
            current = stripped;
        }

        (current, ref_type)
    }

    /// Follow nested `TYPE_REF` children that name typedefs, returning the
    /// declaration of the innermost one (or `decl` when there is none).
    fn typedef_target(&self, decl: CursorId) -> CursorId {
        let is_typedef_ref = |c: &Cursor| {
            c.kind == CursorKind::TypeRef
                && c.ty.is_some_and(|t| self.tu.ty(t).kind == TypeKind::Typedef)
        };

        let mut node = decl;
        for _ in 0..MAX_CHAIN_DEPTH {
            match children_matching(self.tu, node, is_typedef_ref).first() {
                Some(next) => node = *next,
                None => break,
            }
        }

        if node == decl {
            return decl;
        }
        self.tu
            .cursor(node)
            .ty
            .and_then(|t| self.tu.declaration(t))
            .unwrap_or(decl)
    }

    /// The instantiation to unwrap, if `decl` is container-shaped.
    fn template_class(&self, decl: CursorId) -> Option<CursorId> {
        let cursor = self.tu.cursor(decl);
        let template = if cursor.kind == CursorKind::TypeAliasDecl {
            cursor.underlying_type.and_then(|u| self.tu.declaration(u))?
        } else {
            decl
        };

        match self.tu.num_template_args(template) {
            0 => None,
            1 => Some(template),
            _ if self.container_name(template) == BASIC_STRING => Some(template),
            _ => None,
        }
    }

    fn container_name(&self, template: CursorId) -> String {
        qualified_name(
            get_namespace(self.tu, template).as_deref(),
            &self.tu.cursor(template).spelling,
        )
    }
}

impl Resolution {
    fn primitive(
        kind: TypeKind,
        traits: TypeTraits,
        container_type: Option<String>,
        container: Option<CursorId>,
    ) -> Self {
        Self {
            resolved: ResolvedType::primitive(kind, traits, container_type),
            definition: None,
            container,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::TuBuilder;

    fn resolve(tu: &TranslationUnit, ty: TypeId) -> Resolution {
        TypeResolver::new(tu, HeaderPolicy::unrestricted()).resolve(ty)
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(primitive_name(TypeKind::UInt), Some("unsigned int"));
        assert_eq!(primitive_name(TypeKind::CharS), Some("char"));
        assert_eq!(primitive_name(TypeKind::WChar), Some("wchar_t"));
        assert_eq!(primitive_name(TypeKind::Long), None);
        assert_eq!(primitive_name(TypeKind::Record), None);
    }

    #[test]
    fn test_unsupported_fundamental_resolves_to_absent_name() {
        let mut b = TuBuilder::new();
        let long = b.primitive(TypeKind::Long, "long");
        let tu = b.build();

        let resolution = resolve(&tu, long);
        assert_eq!(resolution.resolved.name, None);
        assert_eq!(resolution.definition, None);
    }

    #[test]
    fn test_only_outermost_indirection_is_kept() {
        let mut b = TuBuilder::new();
        let int = b.primitive(TypeKind::Int, "int");
        let ptr = b.pointer_to(int);
        let ptr_ptr = b.pointer_to(ptr);
        let ref_to_ptr = b.lvalue_ref_to(ptr);
        let tu = b.build();

        let r = resolve(&tu, ptr_ptr).resolved;
        assert_eq!(r.name.as_deref(), Some("int"));
        assert_eq!(r.traits.ref_type, Some(RefType::Pointer));

        let r = resolve(&tu, ref_to_ptr).resolved;
        assert_eq!(r.traits.ref_type, Some(RefType::Lvalue));
    }

    #[test]
    fn test_const_reference_to_class() {
        let mut b = TuBuilder::new();
        let ns = b.namespace(b.root(), "app");
        let widget = b.class(ns, "Widget");
        let wt = b.type_of(widget);
        let cwt = b.const_of(wt);
        let cref = b.lvalue_ref_to(cwt);
        let tu = b.build();

        let resolution = resolve(&tu, cref);
        assert_eq!(resolution.definition, Some(widget));
        assert_eq!(resolution.container, None);
        let r = resolution.resolved;
        assert_eq!(r.full_name().as_deref(), Some("app::Widget"));
        assert_eq!(r.traits, TypeTraits::new(true, Some(RefType::Lvalue)));
        assert!(!r.is_enum);
    }

    #[test]
    fn test_single_argument_template_is_unwrapped() {
        let mut b = TuBuilder::new();
        let ns = b.namespace(b.root(), "app");
        let widget = b.class(ns, "Widget");
        let wt = b.type_of(widget);
        let std_ns = b.namespace(b.root(), "std");
        let sp = b.specialization(std_ns, "shared_ptr", &[wt]);
        let spt = b.type_of(sp);
        let tu = b.build();

        let resolution = resolve(&tu, spt);
        assert_eq!(resolution.definition, Some(widget));
        assert_eq!(resolution.container, Some(sp));
        assert_eq!(
            resolution.resolved.container_type.as_deref(),
            Some("std::shared_ptr")
        );
        assert_eq!(resolution.resolved.name.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_container_of_primitive_keeps_container_cursor() {
        let mut b = TuBuilder::new();
        let int = b.primitive(TypeKind::Int, "int");
        let std_ns = b.namespace(b.root(), "std");
        let vec = b.specialization(std_ns, "vector", &[int]);
        let vt = b.type_of(vec);
        let tu = b.build();

        let resolution = resolve(&tu, vt);
        assert_eq!(resolution.definition, None);
        assert_eq!(resolution.container, Some(vec));
        assert_eq!(resolution.resolved.name.as_deref(), Some("int"));
        assert_eq!(
            resolution.resolved.container_type.as_deref(),
            Some("std::vector")
        );
    }

    #[test]
    fn test_basic_string_of_char_becomes_std_string() {
        let mut b = TuBuilder::new();
        let char_ty = b.primitive(TypeKind::CharS, "char");
        let std_ns = b.namespace(b.root(), "std");
        let traits = b.class(std_ns, "char_traits");
        let alloc = b.class(std_ns, "allocator");
        let (tt, at) = (b.type_of(traits), b.type_of(alloc));
        let string = b.specialization(std_ns, "basic_string", &[char_ty, tt, at]);
        let st = b.type_of(string);
        let tu = b.build();

        let r = resolve(&tu, st).resolved;
        assert_eq!(r.full_name().as_deref(), Some("std::string"));
        assert_eq!(r.container_type, None);
    }

    #[test]
    fn test_multi_argument_template_is_an_ordinary_type() {
        let mut b = TuBuilder::new();
        let int = b.primitive(TypeKind::Int, "int");
        let double = b.primitive(TypeKind::Double, "double");
        let std_ns = b.namespace(b.root(), "std");
        let map = b.specialization(std_ns, "map", &[int, double]);
        let mt = b.type_of(map);
        let tu = b.build();

        let resolution = resolve(&tu, mt);
        assert_eq!(resolution.definition, Some(map));
        assert_eq!(resolution.container, None);
        assert_eq!(resolution.resolved.full_name().as_deref(), Some("std::map"));
    }

    #[test]
    fn test_typedef_chains_resolve_to_target() {
        let mut b = TuBuilder::new();
        let int = b.primitive(TypeKind::Int, "int");
        let first = b.typedef(b.root(), "first_t", int);
        let second = b.typedef(b.root(), "second_t", first);
        let widget = b.class(b.root(), "Widget");
        let wt = b.type_of(widget);
        let alias = b.type_alias(b.root(), "WidgetAlias", wt);
        let alias_ptr = b.pointer_to(alias);
        let tu = b.build();

        let r = resolve(&tu, second);
        assert_eq!(r.resolved.name.as_deref(), Some("int"));
        assert_eq!(r.definition, None);

        let r = resolve(&tu, alias_ptr);
        assert_eq!(r.definition, Some(widget));
        assert_eq!(r.resolved.traits.ref_type, Some(RefType::Pointer));
    }

    #[test]
    fn test_alias_to_pointer_contributes_reference_kind() {
        let mut b = TuBuilder::new();
        let widget = b.class(b.root(), "Widget");
        let wt = b.type_of(widget);
        let ptr = b.pointer_to(wt);
        let alias = b.typedef(b.root(), "WidgetPtr", ptr);
        let tu = b.build();

        let r = resolve(&tu, alias);
        assert_eq!(r.definition, Some(widget));
        assert_eq!(r.resolved.traits.ref_type, Some(RefType::Pointer));
    }

    #[test]
    fn test_enum_and_header_are_reported() {
        let mut b = TuBuilder::new();
        b.in_file("/work/scf/models/Color.h");
        let color = b.enumeration(b.root(), "Color", &[("RED", 0)]);
        let ct = b.type_of(color);
        let tu = b.build();

        let resolver = TypeResolver::new(&tu, HeaderPolicy::new(Some("/work/scf")));
        let r = resolver.resolve(ct).resolved;
        assert!(r.is_enum);
        assert_eq!(r.header.as_deref(), Some("models/Color.h"));
    }
}
