use serde::Serialize;
use std::rc::Rc;

use super::{Location, SemanticType};

/// Anything a validator can report on: it has a name and, usually, a
/// source position.
pub trait Subject {
    fn subject_name(&self) -> &str;
    fn location(&self) -> Option<&Location>;
}

/// Members and methods carry an access specifier.
pub trait Accessible {
    fn access_specifier(&self) -> AccessSpecifier;
}

/// Fields and parameters: a name bound to a type with const/reference traits.
pub trait Typed: Subject {
    fn type_info(&self) -> &SemanticType;
    fn traits(&self) -> &TypeTraits;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Lvalue,
    Rvalue,
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessSpecifier {
    Private,
    Protected,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TypeTraits {
    pub is_const: bool,
    pub ref_type: Option<RefType>,
}

impl TypeTraits {
    pub fn new(is_const: bool, ref_type: Option<RefType>) -> Self {
        Self { is_const, ref_type }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumConstant {
    pub name: String,
    pub value: i64,
}

impl EnumConstant {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A data member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub access_specifier: AccessSpecifier,
    pub type_info: Rc<SemanticType>,
    pub traits: TypeTraits,
    /// First token of a literal in-class initializer, e.g. `0` or `false`.
    pub init_value: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub type_info: Rc<SemanticType>,
    pub traits: TypeTraits,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiReturns {
    pub type_info: Rc<SemanticType>,
    pub traits: TypeTraits,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ApiTraits {
    pub is_const: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_static: bool,
    pub annotation: Option<String>,
}

/// A member function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Api {
    pub name: String,
    pub access_specifier: AccessSpecifier,
    pub returns: ApiReturns,
    pub params: Vec<Param>,
    pub traits: ApiTraits,
    pub location: Location,
}

impl Api {
    /// Whether the method is tagged for binding generation.
    pub fn has_codegen_tag(&self, tag: &str) -> bool {
        self.traits.annotation.as_deref() == Some(tag)
    }
}

impl Subject for Field {
    fn subject_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<&Location> {
        Some(&self.location)
    }
}

impl Subject for Param {
    fn subject_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<&Location> {
        Some(&self.location)
    }
}

impl Subject for Api {
    fn subject_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<&Location> {
        Some(&self.location)
    }
}

impl Accessible for Field {
    fn access_specifier(&self) -> AccessSpecifier {
        self.access_specifier
    }
}

impl Accessible for Api {
    fn access_specifier(&self) -> AccessSpecifier {
        self.access_specifier
    }
}

impl Typed for Field {
    fn type_info(&self) -> &SemanticType {
        &self.type_info
    }

    fn traits(&self) -> &TypeTraits {
        &self.traits
    }
}

impl Typed for Param {
    fn type_info(&self) -> &SemanticType {
        &self.type_info
    }

    fn traits(&self) -> &TypeTraits {
        &self.traits
    }
}
