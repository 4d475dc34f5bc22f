use crate::frontend::{
    Cursor, CursorId, CursorKind, CxxAccess, CxxType, Diagnostic, DiagnosticSeverity,
    MethodFlags, TranslationUnit, TypeId, TypeKind,
};
use crate::model::Location;

const DEFAULT_FILE: &str = "include/test.h";

/// Fluent builder for in-memory translation units.
///
/// Every cursor gets a distinct line in the current file so diagnostics
/// from different declarations never share a location by accident.
#[derive(Debug)]
pub struct TuBuilder {
    cursors: Vec<Cursor>,
    types: Vec<CxxType>,
    diagnostics: Vec<Diagnostic>,
    file: String,
    next_line: u32,
}

impl Default for TuBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TuBuilder {
    pub fn new() -> Self {
        Self {
            cursors: vec![Cursor::new(CursorKind::TranslationUnit, "all-src.cpp")],
            types: Vec::new(),
            diagnostics: Vec::new(),
            file: DEFAULT_FILE.to_string(),
            next_line: 1,
        }
    }

    pub fn root(&self) -> CursorId {
        CursorId(0)
    }

    /// Place subsequently created cursors in `file`.
    pub fn in_file(&mut self, file: impl Into<String>) -> &mut Self {
        self.file = file.into();
        self
    }

    pub fn build(self) -> TranslationUnit {
        TranslationUnit {
            root: CursorId(0),
            cursors: self.cursors,
            types: self.types,
            diagnostics: self.diagnostics,
        }
    }

    fn add_cursor(&mut self, parent: CursorId, kind: CursorKind, spelling: &str) -> CursorId {
        let id = CursorId(self.cursors.len());
        let mut cursor = Cursor::new(kind, spelling);
        cursor.location = Location::new(self.file.clone(), self.next_line, 1);
        cursor.semantic_parent = Some(parent);
        self.next_line += 1;
        self.cursors.push(cursor);
        self.cursors[parent.0].children.push(id);
        id
    }

    fn add_type(&mut self, ty: CxxType) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(ty);
        id
    }

    /// `ns::Outer::Name` for a cursor, following namespaces and records.
    fn qualified(&self, node: CursorId) -> String {
        let mut parts = vec![self.cursors[node.0].spelling.clone()];
        let mut parent = self.cursors[node.0].semantic_parent;
        while let Some(id) = parent {
            let cursor = &self.cursors[id.0];
            if cursor.kind == CursorKind::Namespace || cursor.kind.is_record() {
                parts.push(cursor.spelling.clone());
            }
            parent = cursor.semantic_parent;
        }
        parts.reverse();
        parts.join("::")
    }

    fn spelling_of(&self, ty: TypeId) -> String {
        self.types[ty.0].spelling.clone()
    }

    pub fn primitive(&mut self, kind: TypeKind, spelling: &str) -> TypeId {
        self.add_type(CxxType::new(kind, spelling))
    }

    pub fn namespace(&mut self, parent: CursorId, name: &str) -> CursorId {
        self.add_cursor(parent, CursorKind::Namespace, name)
    }

    fn record(&mut self, parent: CursorId, name: &str, definition: bool) -> CursorId {
        let id = self.add_cursor(parent, CursorKind::ClassDecl, name);
        let qualified = self.qualified(id);
        let mut ty = CxxType::new(TypeKind::Record, qualified.clone());
        ty.declaration = Some(id);
        let ty = self.add_type(ty);
        let cursor = &mut self.cursors[id.0];
        cursor.usr = Some(format!("c:@S@{}", qualified));
        cursor.ty = Some(ty);
        cursor.is_definition = definition;
        id
    }

    /// A class definition with its own record type.
    pub fn class(&mut self, parent: CursorId, name: &str) -> CursorId {
        self.record(parent, name, true)
    }

    /// A class that is declared but never defined.
    pub fn forward_declaration(&mut self, parent: CursorId, name: &str) -> CursorId {
        self.record(parent, name, false)
    }

    /// A template instantiation `name<args...>`.
    pub fn specialization(&mut self, parent: CursorId, name: &str, args: &[TypeId]) -> CursorId {
        let id = self.add_cursor(parent, CursorKind::ClassDecl, name);
        let arg_spellings: Vec<String> = args.iter().map(|a| self.spelling_of(*a)).collect();
        let spelling = format!("{}<{}>", self.qualified(id), arg_spellings.join(", "));
        let mut ty = CxxType::new(TypeKind::Record, spelling.clone());
        ty.declaration = Some(id);
        ty.template_args = args.to_vec();
        let ty = self.add_type(ty);
        let cursor = &mut self.cursors[id.0];
        cursor.usr = Some(format!("c:@S@{}", spelling));
        cursor.ty = Some(ty);
        cursor.is_definition = true;
        id
    }

    /// The record (or enum) type declared by a cursor.
    pub fn type_of(&self, decl: CursorId) -> TypeId {
        self.cursors[decl.0]
            .ty
            .expect("declaration created by the builder has a type")
    }

    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        self.indirection(TypeKind::Pointer, pointee, "*")
    }

    pub fn lvalue_ref_to(&mut self, pointee: TypeId) -> TypeId {
        self.indirection(TypeKind::LValueReference, pointee, "&")
    }

    pub fn rvalue_ref_to(&mut self, pointee: TypeId) -> TypeId {
        self.indirection(TypeKind::RValueReference, pointee, "&&")
    }

    fn indirection(&mut self, kind: TypeKind, pointee: TypeId, sigil: &str) -> TypeId {
        let mut ty = CxxType::new(kind, format!("{} {}", self.spelling_of(pointee), sigil));
        ty.pointee = Some(pointee);
        self.add_type(ty)
    }

    /// A const-qualified copy of `ty`.
    pub fn const_of(&mut self, ty: TypeId) -> TypeId {
        let mut qualified = self.types[ty.0].clone();
        qualified.is_const = true;
        qualified.spelling = format!("const {}", qualified.spelling);
        self.add_type(qualified)
    }

    /// `typedef <underlying> name;`
    pub fn typedef(&mut self, parent: CursorId, name: &str, underlying: TypeId) -> TypeId {
        self.alias(parent, name, underlying, CursorKind::TypedefDecl)
    }

    /// `using name = <underlying>;`
    pub fn type_alias(&mut self, parent: CursorId, name: &str, underlying: TypeId) -> TypeId {
        self.alias(parent, name, underlying, CursorKind::TypeAliasDecl)
    }

    fn alias(
        &mut self,
        parent: CursorId,
        name: &str,
        underlying: TypeId,
        kind: CursorKind,
    ) -> TypeId {
        let id = self.add_cursor(parent, kind, name);
        let qualified = self.qualified(id);

        // Aliases of aliases reference their target through a TYPE_REF child.
        if self.types[underlying.0].kind == TypeKind::Typedef {
            let target = self.spelling_of(underlying);
            let type_ref = self.add_cursor(id, CursorKind::TypeRef, &target);
            self.cursors[type_ref.0].ty = Some(underlying);
        }

        let mut ty = CxxType::new(TypeKind::Typedef, qualified.clone());
        ty.declaration = Some(id);
        let ty = self.add_type(ty);
        let cursor = &mut self.cursors[id.0];
        cursor.usr = Some(format!("c:@T@{}", qualified));
        cursor.ty = Some(ty);
        cursor.underlying_type = Some(underlying);
        cursor.is_definition = true;
        ty
    }

    pub fn enumeration(
        &mut self,
        parent: CursorId,
        name: &str,
        constants: &[(&str, i64)],
    ) -> CursorId {
        let id = self.add_cursor(parent, CursorKind::EnumDecl, name);
        let qualified = self.qualified(id);
        let mut ty = CxxType::new(TypeKind::Enum, qualified.clone());
        ty.declaration = Some(id);
        let ty = self.add_type(ty);
        {
            let cursor = &mut self.cursors[id.0];
            cursor.usr = Some(format!("c:@E@{}", qualified));
            cursor.ty = Some(ty);
            cursor.is_definition = true;
        }
        for (constant, value) in constants {
            let c = self.add_cursor(id, CursorKind::EnumConstantDecl, constant);
            self.cursors[c.0].enum_value = Some(*value);
        }
        id
    }

    /// A public data member.
    pub fn field(&mut self, class: CursorId, name: &str, ty: TypeId) -> CursorId {
        let id = self.add_cursor(class, CursorKind::FieldDecl, name);
        let cursor = &mut self.cursors[id.0];
        cursor.ty = Some(ty);
        cursor.access = CxxAccess::Public;
        id
    }

    /// Attach a literal initializer whose first token is `token`.
    pub fn init_value(&mut self, field: CursorId, token: &str) -> CursorId {
        let id = self.add_cursor(field, CursorKind::IntegerLiteral, "");
        self.cursors[id.0].tokens = vec![token.to_string()];
        id
    }

    /// A public, non-virtual method.
    pub fn method(&mut self, class: CursorId, name: &str, returns: TypeId) -> CursorId {
        let id = self.add_cursor(class, CursorKind::CxxMethod, name);
        let cursor = &mut self.cursors[id.0];
        cursor.result_type = Some(returns);
        cursor.access = CxxAccess::Public;
        id
    }

    /// A public `virtual ... = 0` method.
    pub fn pure_virtual_method(&mut self, class: CursorId, name: &str, returns: TypeId) -> CursorId {
        let id = self.method(class, name, returns);
        self.set_method_flags(
            id,
            MethodFlags {
                is_virtual: true,
                is_pure_virtual: true,
                ..MethodFlags::default()
            },
        );
        id
    }

    pub fn set_method_flags(&mut self, method: CursorId, flags: MethodFlags) -> &mut Self {
        self.cursors[method.0].method = flags;
        self
    }

    pub fn param(&mut self, method: CursorId, name: &str, ty: TypeId) -> CursorId {
        let id = self.add_cursor(method, CursorKind::ParmDecl, name);
        self.cursors[id.0].ty = Some(ty);
        id
    }

    pub fn base(&mut self, class: CursorId, ty: TypeId) -> CursorId {
        let spelling = self.spelling_of(ty);
        let id = self.add_cursor(class, CursorKind::CxxBaseSpecifier, &spelling);
        let cursor = &mut self.cursors[id.0];
        cursor.ty = Some(ty);
        cursor.access = CxxAccess::Public;
        id
    }

    pub fn annotate(&mut self, node: CursorId, text: &str) -> CursorId {
        self.add_cursor(node, CursorKind::AnnotateAttr, text)
    }

    pub fn set_access(&mut self, node: CursorId, access: CxxAccess) -> &mut Self {
        self.cursors[node.0].access = access;
        self
    }

    pub fn diagnostic(&mut self, severity: DiagnosticSeverity, text: &str) -> &mut Self {
        self.diagnostics.push(Diagnostic {
            severity,
            spelling: text.to_string(),
            location: Location::new(self.file.clone(), self.next_line, 1),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_unit_passes_validation() {
        let mut b = TuBuilder::new();
        let ns = b.namespace(b.root(), "app");
        let a = b.class(ns, "A");
        let int = b.primitive(TypeKind::Int, "int");
        let ptr = b.pointer_to(int);
        b.field(a, "p", ptr);
        let tu = b.build();
        assert!(tu.validate().is_ok());
    }

    #[test]
    fn test_type_spellings_follow_frontend_conventions() {
        let mut b = TuBuilder::new();
        let ns = b.namespace(b.root(), "app");
        let widget = b.class(ns, "Widget");
        let wt = b.type_of(widget);
        let cwt = b.const_of(wt);
        let cref = b.lvalue_ref_to(cwt);
        let std_ns = b.namespace(b.root(), "std");
        let sp = b.specialization(std_ns, "shared_ptr", &[wt]);
        let tu = b.build();

        assert_eq!(tu.ty(cref).spelling, "const app::Widget &");
        assert_eq!(
            tu.ty(tu.cursor(sp).ty.unwrap()).spelling,
            "std::shared_ptr<app::Widget>"
        );
    }

    #[test]
    fn test_alias_of_alias_gets_type_ref_child() {
        let mut b = TuBuilder::new();
        let int = b.primitive(TypeKind::Int, "int");
        let first = b.typedef(b.root(), "first_t", int);
        let second = b.typedef(b.root(), "second_t", first);
        let tu = b.build();

        let decl = tu.declaration(second).unwrap();
        let children = &tu.cursor(decl).children;
        assert_eq!(children.len(), 1);
        assert_eq!(tu.cursor(children[0]).kind, CursorKind::TypeRef);
        assert_eq!(tu.cursor(children[0]).ty, Some(first));
    }
}
