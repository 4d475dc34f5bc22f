//! Renderable view of a run: one entry per generated entity, shaped by
//! its role.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::analysis::AnalysisResults;
use crate::classification::rules::NOTIFICATION_HELPER;
use crate::classification::{ClassifiedEntity, MetaClass};
use crate::model::{
    qualified_name, AccessSpecifier, Api, EnumConstant, Field, Param, RefType, SemanticType,
    TypeTraits,
};
use crate::resolver::string_rewrite;
use crate::validation::Diagnostic;

/// A type as generated code sees it: containers unwrapped to their payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeReport {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub traits: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_enum: bool,
    /// Header defining the (payload) type, relative to the header root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

struct TypeParts {
    name: String,
    namespace: Option<String>,
    container: Option<String>,
    alias: Option<String>,
    is_enum: bool,
    header: Option<String>,
}

impl TypeParts {
    fn of(ty: &SemanticType) -> Self {
        let plain = |is_enum: bool| Self {
            name: ty.name().to_string(),
            namespace: ty.namespace().map(str::to_string),
            container: None,
            alias: ty.original_typedef().map(str::to_string),
            is_enum,
            header: ty.header().map(str::to_string),
        };

        match ty {
            SemanticType::Enum(_) => plain(true),
            SemanticType::Primitive(_) | SemanticType::Recursive(_) => plain(false),
            SemanticType::DeclaredOnly(_) | SemanticType::Defined(_) => {
                match ty.template_args().first() {
                    Some(payload) => {
                        let mut parts = Self::of(payload);
                        parts.contained_in(ty.qualified_name());
                        if let Some(alias) = ty.original_typedef() {
                            parts.alias = Some(alias.to_string());
                        }
                        parts
                    }
                    None => plain(false),
                }
            }
        }
    }

    fn contained_in(&mut self, container: String) {
        match string_rewrite(&self.name, &container) {
            Some((name, remaining)) => {
                self.name = name.to_string();
                self.namespace = Some("std".to_string());
                self.container = remaining.map(str::to_string);
            }
            None => self.container = Some(container),
        }
    }

    fn into_report(self, traits: Option<&TypeTraits>) -> TypeReport {
        TypeReport {
            type_name: qualified_name(self.namespace.as_deref(), &self.name),
            container: self.container,
            traits: traits.map(traits_label).unwrap_or_default(),
            alias: self.alias,
            is_enum: self.is_enum,
            header: self.header,
        }
    }
}

fn traits_label(traits: &TypeTraits) -> String {
    let mut parts = Vec::new();
    if traits.is_const {
        parts.push("const");
    }
    if traits.ref_type == Some(RefType::Lvalue) {
        parts.push("&");
    }
    parts.join(" ")
}

pub fn type_report(ty: &SemanticType, traits: Option<&TypeTraits>) -> TypeReport {
    TypeParts::of(ty).into_report(traits)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub name: String,
    #[serde(flatten)]
    pub type_info: TypeReport,
    pub access: AccessSpecifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamReport {
    pub name: String,
    #[serde(flatten)]
    pub type_info: TypeReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiReport {
    pub name: String,
    pub returns: TypeReport,
    pub params: Vec<ParamReport>,
    pub access: AccessSpecifier,
}

impl From<&Field> for FieldReport {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name.clone(),
            type_info: type_report(&field.type_info, Some(&field.traits)),
            access: field.access_specifier,
            init_value: field.init_value.clone(),
        }
    }
}

impl From<&Param> for ParamReport {
    fn from(param: &Param) -> Self {
        Self {
            name: param.name.clone(),
            type_info: type_report(&param.type_info, Some(&param.traits)),
        }
    }
}

impl From<&Api> for ApiReport {
    fn from(api: &Api) -> Self {
        Self {
            name: api.name.clone(),
            returns: type_report(&api.returns.type_info, Some(&api.returns.traits)),
            params: api.params.iter().map(ParamReport::from).collect(),
            access: api.access_specifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub role: MetaClass,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldReport>,
    /// Fields inherited along the first-base chain, nearest base first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub derived_fields: Vec<FieldReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apis: Vec<ApiReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub callback_apis: Vec<ApiReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<EnumConstant>,
    /// Headers the generated code for this entity has to include.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub dependent_headers: BTreeSet<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

fn is_notification_helper(base: &SemanticType) -> bool {
    base.name() == NOTIFICATION_HELPER
}

fn callback_payload(entity: &SemanticType) -> Option<&SemanticType> {
    entity
        .bases()
        .iter()
        .find(|base| is_notification_helper(base))
        .and_then(|helper| helper.template_args().first())
        .map(|payload| &**payload)
}

/// Members of every class along the `bases[0]` chain above `entity`.
fn inherited_fields(entity: &SemanticType) -> Vec<FieldReport> {
    std::iter::successors(entity.bases().first(), |base| base.bases().first())
        .flat_map(|base| base.members().iter().map(FieldReport::from))
        .collect()
}

fn api_headers(apis: &[ApiReport]) -> impl Iterator<Item = &String> {
    apis.iter().flat_map(|api| {
        api.params
            .iter()
            .filter_map(|p| p.type_info.header.as_ref())
            .chain(api.returns.header.as_ref())
    })
}

impl EntityReport {
    fn new(classified: &ClassifiedEntity, codegen_annotation: &str) -> Self {
        let entity = &*classified.entity;
        let mut report = Self {
            role: classified.meta_class,
            name: entity.complete_name(),
            namespace: entity.namespace().map(str::to_string),
            header: entity.header().map(str::to_string),
            base: None,
            fields: Vec::new(),
            apis: Vec::new(),
            derived_fields: Vec::new(),
            callback_apis: Vec::new(),
            constants: Vec::new(),
            dependent_headers: BTreeSet::new(),
            diagnostics: classified.diagnostics.clone(),
        };

        match classified.meta_class {
            MetaClass::Model => {
                report.base = entity.bases().first().map(|b| b.complete_name());
                report.fields = entity.members().iter().map(FieldReport::from).collect();
                report.derived_fields = inherited_fields(entity);

                let base_header = entity
                    .bases()
                    .first()
                    .and_then(|b| type_report(b, None).header);
                report.dependent_headers = report
                    .fields
                    .iter()
                    .chain(&report.derived_fields)
                    .filter_map(|f| f.type_info.header.clone())
                    .chain(base_header)
                    .collect();
            }
            MetaClass::Viewmodel => {
                report.base = entity
                    .bases()
                    .iter()
                    .find(|b| !is_notification_helper(b))
                    .map(|b| b.complete_name());
                report.apis = entity.methods().iter().map(ApiReport::from).collect();
                report.callback_apis = callback_payload(entity)
                    .map(|cb| cb.methods().iter().map(ApiReport::from).collect())
                    .unwrap_or_default();
            }
            MetaClass::Service => {
                report.apis = entity
                    .methods()
                    .iter()
                    .filter(|m| m.has_codegen_tag(codegen_annotation))
                    .map(ApiReport::from)
                    .collect();
                if let Some(callback) = callback_payload(entity) {
                    let (exposed, unexposed): (Vec<&Api>, Vec<&Api>) = callback
                        .methods()
                        .iter()
                        .partition(|m| m.has_codegen_tag(codegen_annotation));
                    report.callback_apis = exposed
                        .into_iter()
                        .chain(unexposed)
                        .map(ApiReport::from)
                        .collect();
                }
            }
            MetaClass::Enumeration => {
                report.constants = entity.constants().to_vec();
            }
            MetaClass::Unknown | MetaClass::Unused => {}
        }

        if matches!(report.role, MetaClass::Viewmodel | MetaClass::Service) {
            report.dependent_headers = api_headers(&report.apis).cloned().collect();
        }
        if let Some(own) = &report.header {
            report.dependent_headers.remove(own);
        }
        report
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub models: usize,
    pub enums: usize,
    pub viewmodels: usize,
    pub services: usize,
    pub unclassified: usize,
}

impl RoleCounts {
    /// `Parsed models: 2 enums: 1`, skipping roles with no entities.
    pub fn parsed_line(&self) -> String {
        let parts = [
            ("models", self.models),
            ("enums", self.enums),
            ("viewmodels", self.viewmodels),
            ("services", self.services),
        ];
        parts
            .iter()
            .filter(|(_, count)| *count > 0)
            .fold("Parsed".to_string(), |line, (label, count)| {
                format!("{} {}: {}", line, label, count)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: RoleCounts,
    /// Entities that produce generated code, in discovery order.
    pub entities: Vec<EntityReport>,
    /// Entities no role accepted, with their diagnostics.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unclassified: Vec<EntityReport>,
}

impl Report {
    pub fn build(results: &AnalysisResults, codegen_annotation: &str) -> Self {
        let summary = RoleCounts {
            models: results.count(MetaClass::Model),
            enums: results.count(MetaClass::Enumeration),
            viewmodels: results.count(MetaClass::Viewmodel),
            services: results.count(MetaClass::Service),
            unclassified: results.count(MetaClass::Unknown),
        };

        let (entities, unclassified): (Vec<EntityReport>, Vec<EntityReport>) = results
            .entities
            .iter()
            .filter(|e| e.meta_class != MetaClass::Unused)
            .map(|e| EntityReport::new(e, codegen_annotation))
            .partition(|r| r.role.is_generated());

        Self {
            summary,
            entities,
            unclassified,
        }
    }
}
