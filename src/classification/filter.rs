use super::ClassifiedEntity;

pub const DEFAULT_EXPLICIT_ANNOTATION: &str = "explicit_codegen";

/// Keep only explicitly annotated entities in headers that opt into
/// explicit mode.
///
/// Entities are grouped by consecutive definition header. A group with at
/// least one entity annotated `annotation` keeps just the annotated ones;
/// every other group is kept whole.
pub fn filter_explicit(entities: Vec<ClassifiedEntity>, annotation: &str) -> Vec<ClassifiedEntity> {
    let mut groups: Vec<Vec<ClassifiedEntity>> = Vec::new();
    for entity in entities {
        let starts_new_group = groups
            .last()
            .and_then(|group| group.first())
            .is_none_or(|first| first.entity.header() != entity.entity.header());
        if starts_new_group {
            groups.push(Vec::new());
        }
        if let Some(group) = groups.last_mut() {
            group.push(entity);
        }
    }

    groups
        .into_iter()
        .flat_map(|group| {
            let explicit = group.iter().any(|e| e.has_annotation(annotation));
            group
                .into_iter()
                .filter(move |e| !explicit || e.has_annotation(annotation))
        })
        .collect()
}
