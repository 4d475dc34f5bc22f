use std::collections::HashMap;
use std::rc::Rc;

use crate::model::SemanticType;

/// Identity of one type reference for memoization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    name: String,
    original_spelling: String,
    definition_usr: String,
    template_usr: String,
}

impl EntityKey {
    pub fn new(
        name: Option<&str>,
        original_spelling: &str,
        definition_usr: Option<&str>,
        template_usr: Option<&str>,
    ) -> Self {
        Self {
            name: name.unwrap_or_default().to_string(),
            original_spelling: original_spelling.to_string(),
            definition_usr: definition_usr.unwrap_or_default().to_string(),
            template_usr: template_usr.unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Run-scoped table of shared entities.
///
/// Recursive placeholders are only meaningful for the ancestor stack that
/// produced them and are never stored.
#[derive(Debug, Default)]
pub struct EntityCache {
    entries: HashMap<EntityKey, Rc<SemanticType>>,
    hits: usize,
    misses: usize,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, key: &EntityKey) -> Option<Rc<SemanticType>> {
        match self.entries.get(key) {
            Some(entity) => {
                self.hits += 1;
                Some(Rc::clone(entity))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Share `entity`, remembering it under `key` unless it is a placeholder.
    pub fn insert(&mut self, key: EntityKey, entity: SemanticType) -> Rc<SemanticType> {
        let entity = Rc::new(entity);
        if !entity.is_recursive() {
            self.entries.insert(key, Rc::clone(&entity));
        }
        entity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(spelling: &str) -> EntityKey {
        EntityKey::new(Some("Widget"), spelling, Some("c:@S@Widget"), None)
    }

    #[test]
    fn test_entities_are_shared_after_insert() {
        let mut cache = EntityCache::new();
        let stored = cache.insert(key("Widget *"), SemanticType::declared("Widget", None, vec![]));
        let fetched = cache.get(&key("Widget *")).unwrap();
        assert!(Rc::ptr_eq(&stored, &fetched));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 0,
                entries: 1
            }
        );
    }

    #[test]
    fn test_spelling_is_part_of_the_key() {
        let mut cache = EntityCache::new();
        cache.insert(key("Widget *"), SemanticType::declared("Widget", None, vec![]));
        assert!(cache.get(&key("WidgetPtr")).is_none());
    }

    #[test]
    fn test_recursive_placeholders_are_never_cached() {
        let mut cache = EntityCache::new();
        let placeholder = cache.insert(key("Widget *"), SemanticType::recursive("Widget", None));
        assert!(placeholder.is_recursive());
        assert!(cache.is_empty());
        assert!(cache.get(&key("Widget *")).is_none());
    }

    #[test]
    fn test_clear_resets_entries_and_counters() {
        let mut cache = EntityCache::new();
        cache.insert(key("A"), SemanticType::declared("A", None, vec![]));
        cache.get(&key("A"));
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
