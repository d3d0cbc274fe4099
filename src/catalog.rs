//! Template Catalog
//!
//! Cloneable object templates keyed by stable string identifiers. The
//! placement controller resolves a template on activation and again on each
//! commit; committed objects are always instantiated fresh from the template
//! rather than recycling the ghost preview, which carries placeholder
//! collision properties.

use std::collections::HashMap;

use glam::Vec3;

/// A placeable object template.
#[derive(Debug, Clone)]
pub struct ObjectTemplate {
    /// Stable identifier used by the catalog and by scene objects cloned
    /// from this template
    pub id: String,
    /// Display name
    pub name: String,
    /// Unrotated half extents of the object's bounds
    pub half_extents: Vec3,
}

impl ObjectTemplate {
    pub fn new(id: &str, half_extents: Vec3) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            half_extents,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Full bounding height, twice the vertical half extent.
    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }
}

/// Catalog of placeable templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: HashMap<String, ObjectTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous entry with the same id.
    pub fn register(&mut self, template: ObjectTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Look up a template by id.
    pub fn resolve(&self, id: &str) -> Option<&ObjectTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_template() {
        let mut catalog = TemplateCatalog::new();
        catalog.register(ObjectTemplate::new("crate", Vec3::splat(0.5)).with_name("Wooden Crate"));

        let t = catalog.resolve("crate").unwrap();
        assert_eq!(t.name, "Wooden Crate");
        assert_eq!(t.height(), 1.0);
    }

    #[test]
    fn test_resolve_unknown_is_none() {
        let catalog = TemplateCatalog::new();
        assert!(catalog.resolve("missing").is_none());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut catalog = TemplateCatalog::new();
        catalog.register(ObjectTemplate::new("crate", Vec3::splat(0.5)));
        catalog.register(ObjectTemplate::new("crate", Vec3::splat(1.0)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve("crate").unwrap().half_extents, Vec3::splat(1.0));
    }
}
