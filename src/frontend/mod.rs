//! Boundary model for the external compiler frontend.
//!
//! The frontend (a libclang driver living outside this crate) walks the
//! translation unit built from the analysed headers and dumps it as an arena
//! of cursors and types that reference each other by index. Everything the
//! extractor needs is read from this arena; nothing here knows about the
//! semantic model.
//!
//! ```json
//! {
//!   "root": 0,
//!   "cursors": [{ "kind": "TRANSLATION_UNIT", "spelling": "all-src.cpp", "children": [1] }, ...],
//!   "types": [{ "kind": "INT", "spelling": "int" }, ...],
//!   "diagnostics": []
//! }
//! ```

pub mod diagnostics;
pub mod matchers;

pub use diagnostics::{check_fatal_diagnostics, Diagnostic, DiagnosticSeverity};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{Error, Result};
use crate::model::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursorId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CursorKind {
    TranslationUnit,
    Namespace,
    ClassDecl,
    StructDecl,
    ClassTemplate,
    EnumDecl,
    EnumConstantDecl,
    FieldDecl,
    CxxMethod,
    Constructor,
    Destructor,
    ParmDecl,
    CxxBaseSpecifier,
    TypeRef,
    TemplateRef,
    TypedefDecl,
    TypeAliasDecl,
    TypeAliasTemplateDecl,
    AnnotateAttr,
    IntegerLiteral,
    FloatingLiteral,
    CxxBoolLiteralExpr,
    CharacterLiteral,
    StringLiteral,
    CxxNullPtrLiteralExpr,
    UnexposedExpr,
    #[serde(other)]
    Other,
}

impl CursorKind {
    pub fn is_record(self) -> bool {
        matches!(self, Self::ClassDecl | Self::StructDecl)
    }

    pub fn is_alias(self) -> bool {
        matches!(self, Self::TypedefDecl | Self::TypeAliasDecl)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Invalid,
    Void,
    Bool,
    Int,
    #[serde(rename = "UINT")]
    UInt,
    #[serde(rename = "USHORT")]
    UShort,
    #[serde(rename = "UCHAR")]
    UChar,
    CharS,
    Short,
    Long,
    #[serde(rename = "ULONG")]
    ULong,
    #[serde(rename = "LONGLONG")]
    LongLong,
    #[serde(rename = "ULONGLONG")]
    ULongLong,
    Double,
    Float,
    #[serde(rename = "WCHAR")]
    WChar,
    Pointer,
    #[serde(rename = "LVALUEREFERENCE")]
    LValueReference,
    #[serde(rename = "RVALUEREFERENCE")]
    RValueReference,
    Record,
    Enum,
    Typedef,
    Elaborated,
    Unexposed,
    #[serde(other)]
    Other,
}

/// Raw access specifier as the frontend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CxxAccess {
    Invalid,
    Public,
    Protected,
    Private,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodFlags {
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_pure_virtual: bool,
    #[serde(default)]
    pub is_static: bool,
}

/// One AST node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub kind: CursorKind,
    #[serde(default)]
    pub spelling: String,
    /// Unified symbol resolution id, stable across the translation unit.
    #[serde(default)]
    pub usr: Option<String>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub access: CxxAccess,
    #[serde(default)]
    pub semantic_parent: Option<CursorId>,
    #[serde(default)]
    pub children: Vec<CursorId>,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeId>,
    #[serde(default)]
    pub result_type: Option<TypeId>,
    #[serde(default)]
    pub underlying_type: Option<TypeId>,
    #[serde(default)]
    pub is_definition: bool,
    #[serde(default)]
    pub method: MethodFlags,
    #[serde(default)]
    pub enum_value: Option<i64>,
    /// Token spellings covering the cursor's extent.
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl Cursor {
    pub fn new(kind: CursorKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            usr: None,
            location: Location::default(),
            access: CxxAccess::None,
            semantic_parent: None,
            children: Vec::new(),
            ty: None,
            result_type: None,
            underlying_type: None,
            is_definition: false,
            method: MethodFlags::default(),
            enum_value: None,
            tokens: Vec::new(),
        }
    }
}

/// One type as seen by the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxType {
    pub kind: TypeKind,
    #[serde(default)]
    pub spelling: String,
    /// Declaring cursor; absent for fundamental types.
    #[serde(default)]
    pub declaration: Option<CursorId>,
    #[serde(default)]
    pub pointee: Option<TypeId>,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub template_args: Vec<TypeId>,
}

impl CxxType {
    pub fn new(kind: TypeKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            declaration: None,
            pointee: None,
            is_const: false,
            template_args: Vec::new(),
        }
    }
}

/// Arena holding a whole parsed translation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub root: CursorId,
    pub cursors: Vec<Cursor>,
    pub types: Vec<CxxType>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl TranslationUnit {
    /// Parse and validate a JSON dump.
    pub fn from_json(json: &str) -> Result<Self> {
        let tu: Self = serde_json::from_str(json)?;
        tu.validate()?;
        Ok(tu)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::file_system("Failed to read AST dump", path.to_path_buf(), e)
        })?;
        Self::from_json(&contents)
    }

    /// Check that every id in the arena points inside it.
    pub fn validate(&self) -> Result<()> {
        self.check_cursor(self.root, "root")?;

        for (index, cursor) in self.cursors.iter().enumerate() {
            let owner = format!("cursor {}", index);
            for child in &cursor.children {
                self.check_cursor(*child, &owner)?;
            }
            if let Some(parent) = cursor.semantic_parent {
                self.check_cursor(parent, &owner)?;
            }
            for ty in [cursor.ty, cursor.result_type, cursor.underlying_type]
                .into_iter()
                .flatten()
            {
                self.check_type(ty, &owner)?;
            }
        }

        for (index, ty) in self.types.iter().enumerate() {
            let owner = format!("type {}", index);
            if let Some(decl) = ty.declaration {
                self.check_cursor(decl, &owner)?;
            }
            if let Some(pointee) = ty.pointee {
                self.check_type(pointee, &owner)?;
            }
            for arg in &ty.template_args {
                self.check_type(*arg, &owner)?;
            }
        }

        Ok(())
    }

    fn check_cursor(&self, id: CursorId, owner: &str) -> Result<()> {
        if id.0 < self.cursors.len() {
            Ok(())
        } else {
            Err(Error::malformed(format!(
                "{} references missing cursor {}",
                owner, id.0
            )))
        }
    }

    fn check_type(&self, id: TypeId, owner: &str) -> Result<()> {
        if id.0 < self.types.len() {
            Ok(())
        } else {
            Err(Error::malformed(format!(
                "{} references missing type {}",
                owner, id.0
            )))
        }
    }

    pub fn cursor(&self, id: CursorId) -> &Cursor {
        &self.cursors[id.0]
    }

    pub fn ty(&self, id: TypeId) -> &CxxType {
        &self.types[id.0]
    }

    pub fn root_cursor(&self) -> &Cursor {
        self.cursor(self.root)
    }

    /// Declaring cursor of a type, if it has one.
    pub fn declaration(&self, ty: TypeId) -> Option<CursorId> {
        self.ty(ty).declaration
    }

    /// A type is primitive when no declaration can be found for it.
    pub fn is_primitive(&self, ty: TypeId) -> bool {
        self.declaration(ty).is_none()
    }

    pub fn pointee(&self, ty: TypeId) -> Option<TypeId> {
        self.ty(ty).pointee
    }

    pub fn template_args(&self, ty: TypeId) -> &[TypeId] {
        &self.ty(ty).template_args
    }

    /// Number of template arguments of a cursor's own type.
    pub fn num_template_args(&self, cursor: CursorId) -> usize {
        self.cursor(cursor)
            .ty
            .map(|ty| self.template_args(ty).len())
            .unwrap_or(0)
    }
}
