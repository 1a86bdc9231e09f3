//! Id-keyed store backing the concrete asset managers.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::{
    generate_instance_id, AssetDefinition, AssetError, AssetInstance, InstanceOverrides,
    SharedAssetInstance,
};

/// Definitions and live instances, each keyed by id
#[derive(Debug, Default)]
pub struct AssetRegistry {
    definitions: HashMap<String, AssetDefinition>,
    instances: HashMap<String, SharedAssetInstance>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one with the same id
    pub fn register_definition(&mut self, definition: AssetDefinition) -> Result<(), AssetError> {
        if definition.id.is_empty() {
            return Err(AssetError::InvalidDefinition(format!(
                "definition '{}' has an empty id",
                definition.name
            )));
        }
        let id = definition.id.clone();
        if self.definitions.insert(id.clone(), definition).is_some() {
            warn!(definition_id = %id, "Asset definition replaced");
        } else {
            debug!(definition_id = %id, "Asset definition registered");
        }
        Ok(())
    }

    pub fn definition(&self, definition_id: &str) -> Option<&AssetDefinition> {
        self.definitions.get(definition_id)
    }

    pub fn definition_ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn create_instance(
        &mut self,
        definition_id: &str,
        mut overrides: InstanceOverrides,
    ) -> Result<SharedAssetInstance, AssetError> {
        if !self.definitions.contains_key(definition_id) {
            return Err(AssetError::UnknownDefinition(definition_id.to_string()));
        }

        let instance_id = overrides
            .instance_id
            .take()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(generate_instance_id);
        if self.instances.contains_key(&instance_id) {
            return Err(AssetError::DuplicateInstance(instance_id));
        }

        let mut instance = AssetInstance::new(instance_id.clone(), definition_id);
        overrides.apply_to(&mut instance);

        let handle = instance.into_shared();
        self.instances.insert(instance_id.clone(), handle.clone());
        debug!(instance_id = %instance_id, definition_id, "Asset instance created");
        Ok(handle)
    }

    pub fn instance(&self, instance_id: &str) -> Option<SharedAssetInstance> {
        self.instances.get(instance_id).cloned()
    }

    /// Overwrite the state behind an existing handle so every holder sees it.
    ///
    /// Returns false when the id is unknown or the handle is currently
    /// borrowed elsewhere.
    pub fn update_instance(&mut self, instance: AssetInstance) -> bool {
        let Some(handle) = self.instances.get(&instance.instance_id) else {
            return false;
        };
        match handle.try_borrow_mut() {
            Ok(mut slot) => {
                *slot = instance;
                true
            }
            Err(_) => {
                warn!(instance_id = %instance.instance_id, "Asset instance busy, update skipped");
                false
            }
        }
    }

    pub fn remove_instance(&mut self, instance_id: &str) -> bool {
        self.instances.remove(instance_id).is_some()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn registry_with_wall() -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        registry
            .register_definition(AssetDefinition::new(
                "wall", "Wall", "sprite", "wall.png", "png",
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_replace_definition() {
        let mut registry = registry_with_wall();
        assert_eq!(registry.definition_count(), 1);

        let replacement = AssetDefinition::new("wall", "Mossy Wall", "sprite", "moss.png", "png");
        registry.register_definition(replacement).unwrap();
        assert_eq!(registry.definition_count(), 1);
        assert_eq!(registry.definition("wall").unwrap().name, "Mossy Wall");
    }

    #[test]
    fn test_register_rejects_empty_id() {
        let mut registry = AssetRegistry::new();
        let result = registry.register_definition(AssetDefinition::new("", "X", "sprite", "x", "png"));
        assert!(matches!(result, Err(AssetError::InvalidDefinition(_))));
        assert_eq!(registry.definition_count(), 0);
    }

    #[test]
    fn test_create_instance_requires_definition() {
        let mut registry = AssetRegistry::new();
        let result = registry.create_instance("missing", InstanceOverrides::default());
        assert!(matches!(result, Err(AssetError::UnknownDefinition(id)) if id == "missing"));
    }

    #[test]
    fn test_create_instance_is_retrievable() {
        let mut registry = registry_with_wall();
        let handle = registry
            .create_instance("wall", InstanceOverrides::default().with_position(1.0, 2.0, 0.0))
            .unwrap();
        let id = handle.borrow().instance_id.clone();

        let fetched = registry.instance(&id).unwrap();
        assert!(Rc::ptr_eq(&handle, &fetched));
        assert_eq!(fetched.borrow().x, 1.0);
        assert_eq!(fetched.borrow().asset_definition_id, "wall");
    }

    #[test]
    fn test_duplicate_instance_id_rejected() {
        let mut registry = registry_with_wall();
        registry
            .create_instance("wall", InstanceOverrides::default().with_id("w1"))
            .unwrap();
        let second = registry.create_instance("wall", InstanceOverrides::default().with_id("w1"));
        assert!(matches!(second, Err(AssetError::DuplicateInstance(_))));
        assert_eq!(registry.instance_count(), 1);
    }

    #[test]
    fn test_update_is_visible_through_existing_handles() {
        let mut registry = registry_with_wall();
        let handle = registry
            .create_instance("wall", InstanceOverrides::default().with_id("w1"))
            .unwrap();

        let mut updated = handle.borrow().clone();
        updated.opacity = 0.5;
        assert!(registry.update_instance(updated));
        assert_eq!(handle.borrow().opacity, 0.5);

        let unknown = AssetInstance::new("nope", "wall");
        assert!(!registry.update_instance(unknown));
    }

    #[test]
    fn test_update_while_borrowed_is_rejected() {
        let mut registry = registry_with_wall();
        let handle = registry
            .create_instance("wall", InstanceOverrides::default().with_id("w1"))
            .unwrap();

        // The temporary borrow lives until the end of the statement
        assert!(!registry.update_instance(handle.borrow().clone()));

        {
            let _reader = handle.borrow();
            let mut moved = AssetInstance::new("w1", "wall");
            moved.x = 9.0;
            assert!(!registry.update_instance(moved));
        }
        assert_eq!(handle.borrow().x, 0.0);

        let mut moved = handle.borrow().clone();
        moved.x = 9.0;
        assert!(registry.update_instance(moved));
        assert_eq!(handle.borrow().x, 9.0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = registry_with_wall();
        registry
            .create_instance("wall", InstanceOverrides::default().with_id("w1"))
            .unwrap();
        assert!(registry.remove_instance("w1"));
        assert!(!registry.remove_instance("w1"));
        assert!(registry.instance("w1").is_none());
    }
}
