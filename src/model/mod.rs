//! Semantic model of the C++ declarations under analysis.
//!
//! A [`SemanticType`] is a closed sum over the five shapes a type reference
//! can take once the extractor is done with it. Defined classes own their
//! members, methods and bases; referenced types are shared through [`Rc`]
//! so that every reference to the same real-world type within one extraction
//! run points at one canonical node. Cycles are broken with
//! [`SemanticType::Recursive`] placeholders, never with back pointers, so the
//! graph is always a finite tree of shared nodes.

mod members;

pub use members::{
    AccessSpecifier, Accessible, Api, ApiReturns, ApiTraits, EnumConstant, Field, Param, RefType,
    Subject, TypeTraits, Typed,
};

use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// A source position as reported by the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, serde::Deserialize, Default)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Join a namespace and a name with `::`, skipping an empty namespace.
pub fn qualified_name(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}::{}", ns, name),
        _ => name.to_string(),
    }
}

/// A built-in scalar. `name` is `None` when the frontend reported a
/// fundamental kind outside the supported table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveType {
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_typedef: Option<String>,
}

/// Stand-in for a type that is still being extracted further up the
/// resolution stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecursiveType {
    pub name: String,
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_typedef: Option<String>,
}

/// A class known only by name: forward declared, or defined outside the
/// analysed header tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredClass {
    pub name: String,
    pub namespace: Option<String>,
    pub template_args: Vec<Rc<SemanticType>>,
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_typedef: Option<String>,
}

/// A fully resolved class or struct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefinedClass {
    pub name: String,
    pub namespace: Option<String>,
    pub template_args: Vec<Rc<SemanticType>>,
    pub members: Vec<Field>,
    pub methods: Vec<Api>,
    pub bases: Vec<Rc<SemanticType>>,
    pub header: Option<String>,
    pub location: Location,
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_typedef: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefinedEnum {
    pub name: String,
    pub namespace: Option<String>,
    pub constants: Vec<EnumConstant>,
    pub header: Option<String>,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_typedef: Option<String>,
}

/// The resolved shape of one type reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SemanticType {
    Primitive(PrimitiveType),
    Recursive(RecursiveType),
    DeclaredOnly(DeclaredClass),
    Defined(DefinedClass),
    Enum(DefinedEnum),
}

impl SemanticType {
    pub fn primitive(name: Option<impl Into<String>>) -> Self {
        Self::Primitive(PrimitiveType {
            name: name.map(Into::into),
            original_typedef: None,
        })
    }

    pub fn recursive(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self::Recursive(RecursiveType {
            name: name.into(),
            namespace,
            original_typedef: None,
        })
    }

    pub fn declared(
        name: impl Into<String>,
        namespace: Option<String>,
        template_args: Vec<Rc<SemanticType>>,
    ) -> Self {
        Self::DeclaredOnly(DeclaredClass {
            name: name.into(),
            namespace,
            template_args,
            header: None,
            original_typedef: None,
        })
    }

    /// Unqualified name; empty for an unresolved primitive.
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(p) => p.name.as_deref().unwrap_or(""),
            Self::Recursive(r) => &r.name,
            Self::DeclaredOnly(d) => &d.name,
            Self::Defined(d) => &d.name,
            Self::Enum(e) => &e.name,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Primitive(_) => None,
            Self::Recursive(r) => r.namespace.as_deref(),
            Self::DeclaredOnly(d) => d.namespace.as_deref(),
            Self::Defined(d) => d.namespace.as_deref(),
            Self::Enum(e) => e.namespace.as_deref(),
        }
    }

    /// `namespace::name`, without template arguments.
    pub fn qualified_name(&self) -> String {
        qualified_name(self.namespace(), self.name())
    }

    /// Canonical spelling: the qualified name, followed by the first
    /// template argument in angle brackets for templated classes.
    pub fn complete_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.name.clone().unwrap_or_default(),
            Self::Recursive(_) | Self::Enum(_) => self.qualified_name(),
            Self::DeclaredOnly(_) | Self::Defined(_) => match self.template_args().first() {
                Some(arg) => format!("{}<{}>", self.qualified_name(), arg.complete_name()),
                None => self.qualified_name(),
            },
        }
    }

    pub fn template_args(&self) -> &[Rc<SemanticType>] {
        match self {
            Self::DeclaredOnly(d) => &d.template_args,
            Self::Defined(d) => &d.template_args,
            _ => &[],
        }
    }

    pub fn members(&self) -> &[Field] {
        match self {
            Self::Defined(d) => &d.members,
            _ => &[],
        }
    }

    pub fn methods(&self) -> &[Api] {
        match self {
            Self::Defined(d) => &d.methods,
            _ => &[],
        }
    }

    pub fn bases(&self) -> &[Rc<SemanticType>] {
        match self {
            Self::Defined(d) => &d.bases,
            _ => &[],
        }
    }

    pub fn constants(&self) -> &[EnumConstant] {
        match self {
            Self::Enum(e) => &e.constants,
            _ => &[],
        }
    }

    pub fn header(&self) -> Option<&str> {
        match self {
            Self::DeclaredOnly(d) => d.header.as_deref(),
            Self::Defined(d) => d.header.as_deref(),
            Self::Enum(e) => e.header.as_deref(),
            Self::Primitive(_) | Self::Recursive(_) => None,
        }
    }

    pub fn annotation(&self) -> Option<&str> {
        match self {
            Self::Defined(d) => d.annotation.as_deref(),
            _ => None,
        }
    }

    pub fn original_typedef(&self) -> Option<&str> {
        match self {
            Self::Primitive(p) => p.original_typedef.as_deref(),
            Self::Recursive(r) => r.original_typedef.as_deref(),
            Self::DeclaredOnly(d) => d.original_typedef.as_deref(),
            Self::Defined(d) => d.original_typedef.as_deref(),
            Self::Enum(e) => e.original_typedef.as_deref(),
        }
    }

    pub fn set_original_typedef(&mut self, alias: impl Into<String>) {
        let alias = Some(alias.into());
        match self {
            Self::Primitive(p) => p.original_typedef = alias,
            Self::Recursive(r) => r.original_typedef = alias,
            Self::DeclaredOnly(d) => d.original_typedef = alias,
            Self::Defined(d) => d.original_typedef = alias,
            Self::Enum(e) => e.original_typedef = alias,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::Recursive(_))
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Recursive(_) => "recursive",
            Self::DeclaredOnly(_) => "declared",
            Self::Defined(_) => "defined",
            Self::Enum(_) => "enum",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.complete_name())
    }
}

impl Subject for SemanticType {
    fn subject_name(&self) -> &str {
        self.name()
    }

    fn location(&self) -> Option<&Location> {
        match self {
            Self::Defined(d) => Some(&d.location),
            Self::Enum(e) => Some(&e.location),
            _ => None,
        }
    }
}
