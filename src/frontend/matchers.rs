//! Small predicate-driven queries over the cursor tree.
//!
//! Direct-children queries only look one level down; the `walk_*` family
//! visits the cursor itself and then every descendant in pre-order.

use super::{Cursor, CursorId, CursorKind, TranslationUnit, TypeKind};

/// Pre-order traversal starting at (and including) a cursor.
pub struct Preorder<'tu> {
    tu: &'tu TranslationUnit,
    stack: Vec<CursorId>,
}

impl Iterator for Preorder<'_> {
    type Item = CursorId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tu.cursor(id).children.iter().rev().copied());
        Some(id)
    }
}

pub fn walk_preorder(tu: &TranslationUnit, start: CursorId) -> Preorder<'_> {
    Preorder {
        tu,
        stack: vec![start],
    }
}

/// Direct children satisfying `pred`, in declaration order.
pub fn children_matching<P>(tu: &TranslationUnit, node: CursorId, pred: P) -> Vec<CursorId>
where
    P: Fn(&Cursor) -> bool,
{
    tu.cursor(node)
        .children
        .iter()
        .copied()
        .filter(|id| pred(tu.cursor(*id)))
        .collect()
}

/// Cursor and descendants satisfying `pred`, in pre-order.
pub fn nodes_matching<P>(tu: &TranslationUnit, root: CursorId, pred: P) -> Vec<CursorId>
where
    P: Fn(&Cursor) -> bool,
{
    walk_preorder(tu, root)
        .filter(|id| pred(tu.cursor(*id)))
        .collect()
}

/// Semantic ancestors satisfying `pred`, outermost first.
pub fn parents_matching<P>(tu: &TranslationUnit, node: CursorId, pred: P) -> Vec<CursorId>
where
    P: Fn(&Cursor) -> bool,
{
    let mut matching = Vec::new();
    let mut parent = tu.cursor(node).semantic_parent;
    while let Some(id) = parent {
        let cursor = tu.cursor(id);
        if pred(cursor) {
            matching.push(id);
        }
        parent = cursor.semantic_parent;
    }
    matching.reverse();
    matching
}

pub fn is_class(cursor: &Cursor) -> bool {
    cursor.kind.is_record() && cursor.is_definition
}

pub fn is_enum(cursor: &Cursor) -> bool {
    cursor.kind == CursorKind::EnumDecl && cursor.is_definition
}

pub fn is_method(cursor: &Cursor) -> bool {
    cursor.kind == CursorKind::CxxMethod
}

pub fn is_field(cursor: &Cursor) -> bool {
    cursor.kind == CursorKind::FieldDecl
}

pub fn is_base_class(cursor: &Cursor) -> bool {
    cursor.kind == CursorKind::CxxBaseSpecifier
}

fn is_initializer_expr(cursor: &Cursor) -> bool {
    matches!(
        cursor.kind,
        CursorKind::IntegerLiteral
            | CursorKind::CxxBoolLiteralExpr
            | CursorKind::UnexposedExpr
            | CursorKind::CharacterLiteral
            | CursorKind::CxxNullPtrLiteralExpr
    )
}

/// Class and struct definitions under `root` accepted by `filter`.
pub fn get_classes<F>(tu: &TranslationUnit, root: CursorId, filter: F) -> Vec<CursorId>
where
    F: Fn(&Cursor) -> bool,
{
    nodes_matching(tu, root, |c| is_class(c) && filter(c))
}

/// Enum definitions under `root` accepted by `filter`.
pub fn get_enums<F>(tu: &TranslationUnit, root: CursorId, filter: F) -> Vec<CursorId>
where
    F: Fn(&Cursor) -> bool,
{
    nodes_matching(tu, root, |c| is_enum(c) && filter(c))
}

pub fn get_params(tu: &TranslationUnit, method: CursorId) -> Vec<CursorId> {
    nodes_matching(tu, method, |c| c.kind == CursorKind::ParmDecl)
}

/// First literal-like expression below a field declaration.
pub fn get_initializer_expr(tu: &TranslationUnit, field: CursorId) -> Option<CursorId> {
    walk_preorder(tu, field).find(|id| is_initializer_expr(tu.cursor(*id)))
}

/// Spelling of the first annotation attribute attached directly to `node`.
pub fn get_annotation(tu: &TranslationUnit, node: CursorId) -> Option<String> {
    children_matching(tu, node, |c| c.kind == CursorKind::AnnotateAttr)
        .first()
        .map(|id| tu.cursor(*id).spelling.clone())
}

/// Enclosing namespace of a declaration, `::`-joined.
///
/// Inline implementation namespaces (`std::__1`, `__detail`) are skipped.
/// Enums take their namespace from the qualified type spelling instead.
pub fn get_namespace(tu: &TranslationUnit, node: CursorId) -> Option<String> {
    let cursor = tu.cursor(node);

    if let Some(ty) = cursor.ty.map(|id| tu.ty(id)) {
        if ty.kind == TypeKind::Enum {
            return ty
                .spelling
                .rsplit_once("::")
                .map(|(ns, _)| ns.to_string());
        }
    }

    let namespaces: Vec<&str> =
        parents_matching(tu, node, |c| c.kind == CursorKind::Namespace)
            .into_iter()
            .map(|id| tu.cursor(id).spelling.as_str())
            .filter(|name| !name.contains("__"))
            .collect();

    if namespaces.is_empty() {
        None
    } else {
        Some(namespaces.join("::"))
    }
}
