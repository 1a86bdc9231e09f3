//! In-memory asset manager.
//!
//! Definition "files" are held as `(path, contents)` pairs, which makes this
//! manager suitable as a test double and for definitions embedded in the
//! host binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{
    parse_definition, AssetDefinition, AssetError, AssetInstance, AssetManager, AssetRegistry,
    InstanceOverrides, SharedAssetInstance,
};

#[derive(Debug, Default)]
pub struct InMemoryAssetManager {
    registry: AssetRegistry,
    sources: HashMap<PathBuf, String>,
}

impl InMemoryAssetManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.add_source(path, contents);
        self
    }

    pub fn add_source(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.sources.insert(path.into(), contents.into());
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }
}

impl AssetManager for InMemoryAssetManager {
    fn load_asset_definition(&mut self, path: &Path) -> Result<AssetDefinition, AssetError> {
        let contents = self
            .sources
            .get(path)
            .ok_or_else(|| AssetError::SourceNotFound(path.to_path_buf()))?;
        let definition = parse_definition(path, contents)?;
        self.registry.register_definition(definition.clone())?;
        Ok(definition)
    }

    fn create_asset_instance(
        &mut self,
        definition_id: &str,
        overrides: InstanceOverrides,
    ) -> Result<SharedAssetInstance, AssetError> {
        self.registry.create_instance(definition_id, overrides)
    }

    fn get_asset_definition(&self, definition_id: &str) -> Option<&AssetDefinition> {
        self.registry.definition(definition_id)
    }

    fn get_asset_instance(&self, instance_id: &str) -> Option<SharedAssetInstance> {
        self.registry.instance(instance_id)
    }

    fn update_asset_instance(&mut self, instance: AssetInstance) -> bool {
        self.registry.update_instance(instance)
    }

    fn remove_asset_instance(&mut self, instance_id: &str) -> bool {
        self.registry.remove_instance(instance_id)
    }

    fn register_asset_definition(&mut self, definition: AssetDefinition) -> Result<(), AssetError> {
        self.registry.register_definition(definition)
    }

    fn definition_count(&self) -> usize {
        self.registry.definition_count()
    }

    fn instance_count(&self) -> usize {
        self.registry.instance_count()
    }
}
