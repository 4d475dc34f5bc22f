//! Entity extraction: builds the shared, cycle-safe semantic graph for a
//! declaration.
//!
//! Each extraction carries an ancestor stack of fully qualified names. A
//! declaration whose name is already on the stack becomes a
//! [`SemanticType::Recursive`] placeholder before any of its members are
//! visited, which is the only way cycles are broken. Everything reached
//! through a type reference goes through the session's [`EntityCache`], so
//! repeated references share one node.

pub mod cache;
pub mod typedef;

pub use cache::{CacheStats, EntityCache, EntityKey};

use std::rc::Rc;

use crate::errors::{Error, Result};
use crate::frontend::matchers::{
    children_matching, get_annotation, get_initializer_expr, get_namespace, get_params,
    is_base_class, is_field, is_method,
};
use crate::frontend::{CursorId, CursorKind, CxxAccess, TranslationUnit, TypeId};
use crate::model::{
    qualified_name, AccessSpecifier, Api, ApiReturns, ApiTraits, DeclaredClass, DefinedClass,
    DefinedEnum, EnumConstant, Field, Param, SemanticType, TypeTraits,
};
use crate::resolver::{primitive_name, HeaderPolicy, TypeResolver};
use typedef::typedef_present;

/// One extraction run over a translation unit.
///
/// The cache lives as long as the session; create a new session for an
/// independent run.
pub struct ExtractionSession<'tu> {
    tu: &'tu TranslationUnit,
    resolver: TypeResolver<'tu>,
    cache: EntityCache,
}

impl<'tu> ExtractionSession<'tu> {
    pub fn new(tu: &'tu TranslationUnit, headers: HeaderPolicy) -> Self {
        Self {
            tu,
            resolver: TypeResolver::new(tu, headers),
            cache: EntityCache::new(),
        }
    }

    pub fn resolver(&self) -> &TypeResolver<'tu> {
        &self.resolver
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Extract a top-level class, struct or enum definition.
    pub fn extract(&mut self, decl: CursorId) -> Result<Rc<SemanticType>> {
        let _span = tracing::debug_span!("extract", decl = %self.tu.cursor(decl).spelling).entered();
        let mut ancestors = Vec::new();
        let entity = self.entity(decl, &mut ancestors)?;
        log::debug!("Extracted {} ({})", entity, entity.kind_label());
        Ok(Rc::new(entity))
    }

    fn entity(&mut self, decl: CursorId, ancestors: &mut Vec<String>) -> Result<SemanticType> {
        let cursor = self.tu.cursor(decl);
        let namespace = get_namespace(self.tu, decl);
        let full_name = qualified_name(namespace.as_deref(), &cursor.spelling);

        if ancestors.contains(&full_name) {
            return Ok(SemanticType::recursive(cursor.spelling.clone(), namespace));
        }

        if cursor.kind == CursorKind::EnumDecl {
            return self.enumeration(decl, namespace).map(SemanticType::Enum);
        }

        ancestors.push(full_name);
        let class = self.class(decl, namespace, ancestors);
        ancestors.pop();
        class
    }

    fn enumeration(&self, decl: CursorId, namespace: Option<String>) -> Result<DefinedEnum> {
        let cursor = self.tu.cursor(decl);
        let constants = children_matching(self.tu, decl, |c| {
            c.kind == CursorKind::EnumConstantDecl
        })
        .into_iter()
        .map(|id| {
            let constant = self.tu.cursor(id);
            constant
                .enum_value
                .map(|value| EnumConstant::new(constant.spelling.clone(), value))
                .ok_or_else(|| {
                    Error::malformed(format!(
                        "enum constant {}::{} at {} has no value",
                        cursor.spelling, constant.spelling, constant.location
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;

        Ok(DefinedEnum {
            name: cursor.spelling.clone(),
            namespace,
            constants,
            header: self.resolver.header_of(decl),
            location: cursor.location.clone(),
            original_typedef: None,
        })
    }

    /// Class body; the caller has pushed this class onto `ancestors`.
    fn class(
        &mut self,
        decl: CursorId,
        namespace: Option<String>,
        ancestors: &mut Vec<String>,
    ) -> Result<SemanticType> {
        let cursor = self.tu.cursor(decl);
        let name = cursor.spelling.clone();

        let template_args = match cursor.ty {
            Some(ty) => self.template_args(ty, ancestors)?,
            None => Vec::new(),
        };

        let header = self.resolver.header_of(decl);
        if !self.resolver.headers().counts_as_defined(header.as_deref()) {
            return Ok(SemanticType::DeclaredOnly(DeclaredClass {
                name,
                namespace,
                template_args,
                header: None,
                original_typedef: None,
            }));
        }

        let bases = children_matching(self.tu, decl, is_base_class)
            .into_iter()
            .map(|base| self.base(base, ancestors))
            .collect::<Result<Vec<_>>>()?;

        let members = children_matching(self.tu, decl, is_field)
            .into_iter()
            .map(|field| self.field(field, ancestors))
            .collect::<Result<Vec<_>>>()?;

        let methods = children_matching(self.tu, decl, is_method)
            .into_iter()
            .map(|method| self.api(method, ancestors))
            .collect::<Result<Vec<_>>>()?;

        Ok(SemanticType::Defined(DefinedClass {
            name,
            namespace,
            template_args,
            members,
            methods,
            bases,
            header,
            location: self.tu.cursor(decl).location.clone(),
            annotation: get_annotation(self.tu, decl),
            original_typedef: None,
        }))
    }

    fn template_args(
        &mut self,
        ty: TypeId,
        ancestors: &mut Vec<String>,
    ) -> Result<Vec<Rc<SemanticType>>> {
        self.tu
            .template_args(ty)
            .to_vec()
            .into_iter()
            .map(|arg| {
                let (target, _) = self.resolver.follow_aliases(arg);
                let entity = match self.tu.declaration(target) {
                    Some(decl) => self.entity(decl, ancestors)?,
                    None => SemanticType::primitive(primitive_name(self.tu.ty(target).kind)),
                };
                Ok(Rc::new(entity))
            })
            .collect()
    }

    /// Resolve a type reference and fetch or build the entity behind it.
    fn type_reference(
        &mut self,
        ty: TypeId,
        ancestors: &mut Vec<String>,
    ) -> Result<(Rc<SemanticType>, TypeTraits)> {
        let resolution = self.resolver.resolve(ty);
        let spelling = self.tu.ty(ty).spelling.clone();

        let key = EntityKey::new(
            resolution.resolved.name.as_deref(),
            &spelling,
            resolution
                .definition
                .and_then(|d| self.tu.cursor(d).usr.as_deref()),
            resolution
                .container
                .and_then(|c| self.tu.cursor(c).usr.as_deref()),
        );

        if let Some(shared) = self.cache.get(&key) {
            return Ok((shared, resolution.resolved.traits));
        }

        let mut entity = match (resolution.container, resolution.definition) {
            (Some(container), _) => self.entity(container, ancestors)?,
            (None, Some(definition)) => self.entity(definition, ancestors)?,
            (None, None) => SemanticType::primitive(resolution.resolved.name.clone()),
        };

        if typedef_present(&entity.complete_name(), &spelling) {
            entity.set_original_typedef(spelling);
        }

        Ok((self.cache.insert(key, entity), resolution.resolved.traits))
    }

    fn base(&mut self, base: CursorId, ancestors: &mut Vec<String>) -> Result<Rc<SemanticType>> {
        let ty = self.declared_type(base)?;
        let (entity, _) = self.type_reference(ty, ancestors)?;
        Ok(entity)
    }

    fn field(&mut self, field: CursorId, ancestors: &mut Vec<String>) -> Result<Field> {
        let ty = self.declared_type(field)?;
        let (type_info, traits) = self.type_reference(ty, ancestors)?;
        let cursor = self.tu.cursor(field);

        let init_value = get_initializer_expr(self.tu, field)
            .and_then(|init| self.tu.cursor(init).tokens.first().cloned());

        Ok(Field {
            name: cursor.spelling.clone(),
            access_specifier: self.access_specifier(field)?,
            type_info,
            traits,
            init_value,
            location: cursor.location.clone(),
        })
    }

    fn param(&mut self, param: CursorId, ancestors: &mut Vec<String>) -> Result<Param> {
        let ty = self.declared_type(param)?;
        let (type_info, traits) = self.type_reference(ty, ancestors)?;
        let cursor = self.tu.cursor(param);

        Ok(Param {
            name: cursor.spelling.clone(),
            type_info,
            traits,
            location: cursor.location.clone(),
        })
    }

    fn api(&mut self, method: CursorId, ancestors: &mut Vec<String>) -> Result<Api> {
        let params = get_params(self.tu, method)
            .into_iter()
            .map(|param| self.param(param, ancestors))
            .collect::<Result<Vec<_>>>()?;

        let cursor = self.tu.cursor(method);
        let result_type = cursor.result_type.ok_or_else(|| {
            Error::malformed(format!(
                "method {} at {} has no result type",
                cursor.spelling, cursor.location
            ))
        })?;
        let (type_info, traits) = self.type_reference(result_type, ancestors)?;

        let cursor = self.tu.cursor(method);
        let flags = cursor.method;

        Ok(Api {
            name: cursor.spelling.clone(),
            access_specifier: self.access_specifier(method)?,
            returns: ApiReturns { type_info, traits },
            params,
            traits: ApiTraits {
                is_const: flags.is_const,
                is_virtual: flags.is_virtual,
                is_abstract: flags.is_pure_virtual,
                is_static: flags.is_static,
                annotation: get_annotation(self.tu, method),
            },
            location: cursor.location.clone(),
        })
    }

    fn declared_type(&self, node: CursorId) -> Result<TypeId> {
        let cursor = self.tu.cursor(node);
        cursor.ty.ok_or_else(|| {
            Error::malformed(format!(
                "{:?} {} at {} has no type",
                cursor.kind, cursor.spelling, cursor.location
            ))
        })
    }

    fn access_specifier(&self, node: CursorId) -> Result<AccessSpecifier> {
        let cursor = self.tu.cursor(node);
        match cursor.access {
            CxxAccess::Public => Ok(AccessSpecifier::Public),
            CxxAccess::Protected => Ok(AccessSpecifier::Protected),
            CxxAccess::Private => Ok(AccessSpecifier::Private),
            CxxAccess::Invalid | CxxAccess::None => Err(Error::InvalidAccessSpecifier {
                name: cursor.spelling.clone(),
                location: cursor.location.clone(),
            }),
        }
    }
}
